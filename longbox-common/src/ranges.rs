//! Issue-range compaction
//!
//! Turns the raw {collection, vol, num} triples of a title group into
//! compact display strings: consecutive issue numbers of the same
//! collection and volume merge into `"<collection> vol. <vol> #<first>
//! - #<last>"` runs, isolated numbers render alone. "Consecutive" means
//! an exact +1 step between integral numbers; fractional issues ("4.1")
//! never join a run and always render as isolated entries.

use crate::model::{IssueNumber, IssueRef};

/// Compact a group's issue triples into display strings.
///
/// Keys (`collection` + `vol`) are emitted in first-seen order; numbers
/// within a key are deduplicated and sorted ascending before runs are
/// formed.
pub fn compact(refs: &[IssueRef]) -> Vec<String> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for issue in refs {
        let key = format!("{} vol. {}", issue.collection, issue.vol);
        let index = match groups.iter().position(|(k, _)| *k == key) {
            Some(index) => index,
            None => {
                groups.push((key, Vec::new()));
                groups.len() - 1
            }
        };
        let numbers = &mut groups[index].1;
        if !numbers.contains(&issue.num.0) {
            numbers.push(issue.num.0);
        }
    }

    let mut out = Vec::new();
    for (key, mut numbers) in groups {
        numbers.sort_by(|a, b| a.total_cmp(b));
        let mut run_start = numbers[0];
        let mut prev = numbers[0];
        for &num in &numbers[1..] {
            if prev.fract() == 0.0 && num.fract() == 0.0 && num == prev + 1.0 {
                prev = num;
                continue;
            }
            out.push(render(&key, run_start, prev));
            run_start = num;
            prev = num;
        }
        out.push(render(&key, run_start, prev));
    }
    out
}

fn render(key: &str, first: f64, last: f64) -> String {
    if first == last {
        format!("{} #{}", key, IssueNumber(first))
    } else {
        format!("{} #{} - #{}", key, IssueNumber(first), IssueNumber(last))
    }
}
