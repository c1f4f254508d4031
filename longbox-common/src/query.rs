//! Flat-field query matching
//!
//! The read surface filters its in-memory JSON collections with a
//! minimal expression language: `field='value'` and `field!='value'`
//! comparisons joined with ` and `. Paths may be dotted
//! (`namable.id`) to reach into nested objects; a missing field
//! compares as the empty string, which is what makes `id!=''` the
//! "has an id" probe. No joins, no ordering beyond source order.

use serde_json::Value;

use crate::{Error, Result};

/// Filter `collection` down to the elements matching `expression`.
pub fn filter(collection: &[Value], expression: &str) -> Result<Vec<Value>> {
    let comparisons = parse(expression)?;
    Ok(collection
        .iter()
        .filter(|value| comparisons.iter().all(|c| c.matches(value)))
        .cloned()
        .collect())
}

struct Comparison {
    path: Vec<String>,
    negated: bool,
    literal: String,
}

impl Comparison {
    fn matches(&self, value: &Value) -> bool {
        let field = lookup(value, &self.path);
        let equal = field == self.literal;
        if self.negated {
            !equal
        } else {
            equal
        }
    }
}

fn parse(expression: &str) -> Result<Vec<Comparison>> {
    expression.split(" and ").map(parse_comparison).collect()
}

fn parse_comparison(raw: &str) -> Result<Comparison> {
    let raw = raw.trim();
    let (lhs, rhs, negated) = if let Some((lhs, rhs)) = raw.split_once("!=") {
        (lhs, rhs, true)
    } else if let Some((lhs, rhs)) = raw.split_once('=') {
        (lhs, rhs, false)
    } else {
        return Err(Error::Query(format!("expected = or != in '{}'", raw)));
    };

    let literal = rhs
        .trim()
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .ok_or_else(|| Error::Query(format!("expected quoted literal in '{}'", raw)))?;

    let path: Vec<String> = lhs.trim().split('.').map(str::to_string).collect();
    if path.iter().any(String::is_empty) {
        return Err(Error::Query(format!("empty field name in '{}'", raw)));
    }

    Ok(Comparison {
        path,
        negated,
        literal: literal.to_string(),
    })
}

/// Resolve a dotted path against a JSON object; anything missing or
/// null is the empty string, scalars compare through their JSON form.
fn lookup(value: &Value, path: &[String]) -> String {
    let mut current = value;
    for segment in path {
        match current.get(segment) {
            Some(next) => current = next,
            None => return String::new(),
        }
    }
    match current {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn comics() -> Vec<Value> {
        vec![
            json!({"id": "100", "collection": "Amazing", "phaseid": "001", "sortid": "001"}),
            json!({"id": "101", "collection": "Amazing", "phaseid": "001", "sortid": "002"}),
            json!({"collection": "Thor", "phaseid": "002", "sortid": "001"}),
        ]
    }

    #[test]
    fn test_equality() {
        let result = filter(&comics(), "id='100'").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["id"], "100");
    }

    #[test]
    fn test_inequality_treats_missing_as_empty() {
        let result = filter(&comics(), "id!=''").unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_conjunction() {
        let result = filter(&comics(), "phaseid='001' and sortid='002'").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["id"], "101");
    }

    #[test]
    fn test_dotted_path() {
        let fissues = vec![
            json!({"namable": {"id": "001", "name": "Phase One"}}),
            json!({"namable": {"id": "002", "name": "Phase Two"}}),
        ];
        let result = filter(&fissues, "namable.id='002'").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["namable"]["name"], "Phase Two");
    }

    #[test]
    fn test_non_string_fields_compare_through_json_form() {
        let rows = vec![json!({"vol": 1}), json!({"vol": 2})];
        let result = filter(&rows, "vol='2'").unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_malformed_expressions_error() {
        assert!(filter(&comics(), "id").is_err());
        assert!(filter(&comics(), "id=100").is_err());
        assert!(filter(&comics(), "='x'").is_err());
    }
}
