//! Entity model for the reading order
//!
//! All entities are produced fresh on each derivation run and carry no
//! state across runs. Serialized field presence follows an
//! omit-if-empty rule: empty strings, zero numbers, `false` and empty
//! lists are left out of the JSON output. Decoding is strict — unknown
//! fields are an error.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Result;

/// A value that can be published as a pretty-printed JSON document.
///
/// The read surface uses `is_empty` to distinguish "nothing there"
/// (HTTP 404) from an actual payload.
pub trait Document {
    fn to_json(&self) -> Result<String>;
    fn is_empty(&self) -> bool;
}

impl<T: Serialize> Document for Vec<T> {
    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T: Document> Document for Option<T> {
    fn to_json(&self) -> Result<String> {
        match self {
            Some(doc) => doc.to_json(),
            None => Ok("null".to_string()),
        }
    }

    fn is_empty(&self) -> bool {
        self.as_ref().map_or(true, Document::is_empty)
    }
}

/// Issue number. Fractional values cover "X.1"-style issues; integral
/// values serialize and display without a decimal point.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct IssueNumber(pub f64);

impl IssueNumber {
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    pub fn is_integral(&self) -> bool {
        self.0.fract() == 0.0
    }
}

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integral() {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<f64> for IssueNumber {
    fn from(n: f64) -> Self {
        Self(n)
    }
}

impl Serialize for IssueNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_integral() {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for IssueNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Self(f64::deserialize(deserializer)?))
    }
}

/// Generic {id, name} entity shared by phases, events, characters and
/// creators. The ID is never empty once the entity is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Namable {
    pub id: String,
    pub name: String,
}

pub type NamableList = Vec<Namable>;

impl Document for Namable {
    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn is_empty(&self) -> bool {
        self.id.is_empty() && self.name.is_empty()
    }
}

/// One issue of the reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Comic {
    /// External metadata key, empty until enriched
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub collection: String,
    /// Arc title shared by all issues of a group
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "is_zero_vol")]
    pub vol: i64,
    #[serde(skip_serializing_if = "IssueNumber::is_zero")]
    pub num: IssueNumber,
    /// ISO calendar date, empty until enriched
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub event: String,
    #[serde(rename = "eventid", skip_serializing_if = "String::is_empty")]
    pub event_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub characters: NamableList,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub creators: NamableList,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pic: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub universe: String,
    /// Reading-priority flag
    #[serde(skip_serializing_if = "is_false")]
    pub essential: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    /// Owning sheet, denormalized
    #[serde(rename = "phaseid", skip_serializing_if = "String::is_empty")]
    pub phase_id: String,
    #[serde(rename = "phasename", skip_serializing_if = "String::is_empty")]
    pub phase_name: String,
    /// Group position within the phase, shared by all issues of a group
    #[serde(rename = "sortid", skip_serializing_if = "String::is_empty")]
    pub sort_id: String,
}

pub type ComicList = Vec<Comic>;

impl Document for Comic {
    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn is_empty(&self) -> bool {
        self.id.is_empty() && self.collection.is_empty()
    }
}

/// Minimal {collection, vol, num} triple recorded per row into its
/// owning group summary; the raw material of range compaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IssueRef {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub collection: String,
    #[serde(skip_serializing_if = "is_zero_vol")]
    pub vol: i64,
    #[serde(skip_serializing_if = "IssueNumber::is_zero")]
    pub num: IssueNumber,
}

/// Group summary record: one per distinct title group, snapshotted from
/// the row that started the group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FirstIssue {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pic: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(rename = "sortid", skip_serializing_if = "String::is_empty")]
    pub sort_id: String,
    #[serde(rename = "phaseid", skip_serializing_if = "String::is_empty")]
    pub phase_id: String,
    /// Representative character, the first one of the starting row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<Namable>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comics: Vec<IssueRef>,
}

/// First-appearance index: the group summaries a phase, event,
/// character or creator first shows up in, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Fissues {
    pub namable: Namable,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<FirstIssue>,
}

pub type FissuesList = Vec<Fissues>;

impl Document for Fissues {
    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn is_empty(&self) -> bool {
        self.namable.is_empty() && self.list.is_empty()
    }
}

fn is_zero_vol(vol: &i64) -> bool {
    *vol == 0
}

fn is_false(flag: &bool) -> bool {
    !*flag
}
