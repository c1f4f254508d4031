//! Derivation engine
//!
//! Walks the workbook's typed rows and builds the normalized entity
//! collections: comics, phases, events, characters, creators and the
//! per-dimension first-issue indexes. Runs to completion synchronously;
//! every run starts from clean collections and allocates IDs in
//! first-seen order from per-category counters.

use std::collections::HashMap;

use tracing::debug;

use longbox_common::codes::code;
use longbox_common::model::{
    Comic, ComicList, FirstIssue, Fissues, FissuesList, IssueNumber, IssueRef, Namable,
    NamableList,
};
use longbox_common::Result;

use crate::workbook::SheetData;

/// Cell literal marking an issue as essential reading.
const ESSENTIAL_LITERAL: &str = "YES";

/// Everything one derivation run produces, one named field per
/// collection.
#[derive(Debug, Default)]
pub struct DerivedSet {
    pub comics: ComicList,
    pub phases: NamableList,
    pub events: NamableList,
    pub characters: NamableList,
    pub creators: NamableList,
    pub phase_fissues: FissuesList,
    pub event_fissues: FissuesList,
    pub character_fissues: FissuesList,
    pub creator_fissues: FissuesList,
}

/// First-seen interning for one namable dimension (events, characters
/// or creators). The first occurrence of a label allocates the next ID
/// from the dimension's own counter and a first-issue slot; repeats
/// resolve to the existing entity.
#[derive(Default)]
struct Dimension {
    by_name: HashMap<String, usize>,
    entries: NamableList,
    fissues: FissuesList,
    /// (entry, phase, sortid) triples that already own a group entry,
    /// mapped to the entry's position in that fissues list
    group_slots: HashMap<(usize, String, String), usize>,
}

impl Dimension {
    fn intern(&mut self, name: &str) -> Result<usize> {
        if let Some(&index) = self.by_name.get(name) {
            return Ok(index);
        }
        let namable = Namable {
            id: code(self.entries.len() + 1)?,
            name: name.to_string(),
        };
        self.fissues.push(Fissues {
            namable: namable.clone(),
            list: Vec::new(),
        });
        self.entries.push(namable);
        let index = self.entries.len() - 1;
        self.by_name.insert(name.to_string(), index);
        Ok(index)
    }

    fn get(&self, index: usize) -> Namable {
        self.entries[index].clone()
    }

    /// Record `issue` into this entity's entry for the current group.
    /// The entry is created lazily from the group prototype, so a label
    /// first seen mid-group still lands in the right group.
    fn record(&mut self, index: usize, prototype: &FirstIssue, issue: IssueRef) {
        let key = (
            index,
            prototype.phase_id.clone(),
            prototype.sort_id.clone(),
        );
        let slot = match self.group_slots.get(&key) {
            Some(&slot) => slot,
            None => {
                let list = &mut self.fissues[index].list;
                list.push(prototype.clone());
                let slot = list.len() - 1;
                self.group_slots.insert(key, slot);
                slot
            }
        };
        self.fissues[index].list[slot].comics.push(issue);
    }
}

/// Derive the full entity model from the workbook's sheets.
pub fn derive(sheets: &[SheetData]) -> Result<DerivedSet> {
    let mut set = DerivedSet::default();
    let mut events = Dimension::default();
    let mut characters = Dimension::default();
    let mut creators = Dimension::default();

    for (sheet_index, sheet) in sheets.iter().enumerate() {
        let phase = Namable {
            id: code(sheet_index + 1)?,
            name: sheet.name.clone(),
        };
        set.phases.push(phase.clone());

        let mut phase_groups = Fissues {
            namable: phase.clone(),
            list: Vec::new(),
        };
        let mut sort_counter = 0;
        let mut prototype: Option<FirstIssue> = None;

        for row in &sheet.rows {
            // Separator rows: no collection, skipped entirely without
            // interrupting the current title group.
            if row.collection.is_empty() {
                continue;
            }

            let character_names = split_list(&row.characters);
            let creator_names = split_list(&row.creators);
            let comments = row.comments.as_deref().map(split_list).unwrap_or_default();

            let event_index = if row.event.is_empty() {
                None
            } else {
                Some(events.intern(&row.event)?)
            };
            let mut character_indexes = Vec::with_capacity(character_names.len());
            for name in &character_names {
                character_indexes.push(characters.intern(name)?);
            }
            let mut creator_indexes = Vec::with_capacity(creator_names.len());
            for name in &creator_names {
                creator_indexes.push(creators.intern(name)?);
            }

            let starts_group = match &prototype {
                Some(group) => group.title != row.title,
                None => true,
            };
            if starts_group {
                sort_counter += 1;
                let summary = FirstIssue {
                    pic: row.pic.clone(),
                    title: row.title.clone(),
                    date: row.date.clone(),
                    sort_id: code(sort_counter)?,
                    phase_id: phase.id.clone(),
                    character: character_indexes.first().map(|&i| characters.get(i)),
                    comics: Vec::new(),
                };
                phase_groups.list.push(summary.clone());
                prototype = Some(summary);
            }
            let sort_id = code(sort_counter)?;

            let issue = IssueRef {
                collection: row.collection.clone(),
                vol: row.vol,
                num: IssueNumber(row.num),
            };
            if let Some(group) = phase_groups.list.last_mut() {
                group.comics.push(issue.clone());
            }
            if let Some(group) = &prototype {
                if let Some(index) = event_index {
                    events.record(index, group, issue.clone());
                }
                for &index in &character_indexes {
                    characters.record(index, group, issue.clone());
                }
                for &index in &creator_indexes {
                    creators.record(index, group, issue.clone());
                }
            }

            set.comics.push(Comic {
                id: row.id.clone(),
                collection: row.collection.clone(),
                title: row.title.clone(),
                vol: row.vol,
                num: IssueNumber(row.num),
                date: row.date.clone(),
                event: row.event.clone(),
                event_id: event_index.map(|i| events.get(i).id).unwrap_or_default(),
                characters: character_indexes.iter().map(|&i| characters.get(i)).collect(),
                creators: creator_indexes.iter().map(|&i| creators.get(i)).collect(),
                pic: row.pic.clone(),
                universe: row.universe.clone(),
                essential: row.essential == ESSENTIAL_LITERAL,
                comments,
                phase_id: phase.id.clone(),
                phase_name: phase.name.clone(),
                sort_id,
            });
        }

        set.phase_fissues.push(phase_groups);
    }

    set.events = events.entries;
    set.event_fissues = events.fissues;
    set.characters = characters.entries;
    set.character_fissues = characters.fissues;
    set.creators = creators.entries;
    set.creator_fissues = creators.fissues;

    debug!(
        comics = set.comics.len(),
        phases = set.phases.len(),
        events = set.events.len(),
        characters = set.characters.len(),
        creators = set.creators.len(),
        "derivation complete"
    );
    Ok(set)
}

/// Split a raw delimited cell on the literal `", "` separator. An empty
/// cell yields an empty list, not a single empty element.
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(", ").map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::RowRecord;

    fn row(collection: &str, vol: i64, num: f64, title: &str) -> RowRecord {
        RowRecord {
            collection: collection.to_string(),
            vol,
            num,
            title: title.to_string(),
            ..RowRecord::default()
        }
    }

    fn two_phase_sheets() -> Vec<SheetData> {
        vec![
            SheetData {
                name: "Phase One".to_string(),
                rows: vec![
                    row("Amazing", 1, 1.0, "Origins"),
                    row("Amazing", 1, 2.0, "Origins"),
                    row("Amazing", 1, 1.0, "Secret War"),
                ],
            },
            SheetData {
                name: "Phase Two".to_string(),
                rows: vec![row("Thor", 1, 1.0, "Ragnarok")],
            },
        ]
    }

    #[test]
    fn test_phase_ids_follow_sheet_order() {
        let set = derive(&two_phase_sheets()).unwrap();
        assert_eq!(
            set.phases,
            vec![
                Namable {
                    id: "001".to_string(),
                    name: "Phase One".to_string()
                },
                Namable {
                    id: "002".to_string(),
                    name: "Phase Two".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_sort_ids_increment_per_distinct_title() {
        let set = derive(&two_phase_sheets()).unwrap();
        let sort_ids: Vec<&str> = set.comics.iter().map(|c| c.sort_id.as_str()).collect();
        assert_eq!(sort_ids, vec!["001", "001", "002", "001"]);
    }

    #[test]
    fn test_phase_fissues_group_summaries() {
        let set = derive(&two_phase_sheets()).unwrap();
        let fissues = &set.phase_fissues[0];
        assert_eq!(fissues.namable.id, "001");
        assert_eq!(fissues.list.len(), 2);
        assert_eq!(fissues.list[0].title, "Origins");
        assert_eq!(fissues.list[0].sort_id, "001");
        assert_eq!(fissues.list[1].title, "Secret War");
        assert_eq!(fissues.list[1].sort_id, "002");
        // Range data covers every row of the group
        assert_eq!(fissues.list[0].comics.len(), 2);
        assert_eq!(fissues.list[0].comics[1].num, IssueNumber(2.0));
    }

    #[test]
    fn test_repeated_labels_share_one_id() {
        let mut first = row("Amazing", 1, 1.0, "Origins");
        first.characters = "Iron Man, Thor".to_string();
        first.event = "Infinity".to_string();
        let mut second = row("Amazing", 1, 2.0, "Origins");
        second.characters = "Thor".to_string();
        second.event = "Infinity".to_string();

        let sheets = vec![SheetData {
            name: "Phase One".to_string(),
            rows: vec![first, second],
        }];
        let set = derive(&sheets).unwrap();

        assert_eq!(set.events.len(), 1);
        assert_eq!(set.events[0].id, "001");
        assert_eq!(set.characters.len(), 2);
        let thor_first = &set.comics[0].characters[1];
        let thor_second = &set.comics[1].characters[0];
        assert_eq!(thor_first, thor_second);
        assert_eq!(set.comics[0].event_id, "001");
        assert_eq!(set.comics[1].event_id, "001");
    }

    #[test]
    fn test_label_seen_mid_group_joins_current_group() {
        let first = row("Amazing", 1, 1.0, "Origins");
        let mut second = row("Amazing", 1, 2.0, "Origins");
        second.characters = "Hulk".to_string();

        let sheets = vec![SheetData {
            name: "Phase One".to_string(),
            rows: vec![first, second],
        }];
        let set = derive(&sheets).unwrap();

        assert_eq!(set.character_fissues.len(), 1);
        let hulk = &set.character_fissues[0];
        assert_eq!(hulk.namable.name, "Hulk");
        assert_eq!(hulk.list.len(), 1);
        // The lazily created entry carries the group prototype...
        assert_eq!(hulk.list[0].title, "Origins");
        assert_eq!(hulk.list[0].sort_id, "001");
        // ...and the triples of the rows referencing the label
        assert_eq!(hulk.list[0].comics.len(), 1);
        assert_eq!(hulk.list[0].comics[0].num, IssueNumber(2.0));
    }

    #[test]
    fn test_entity_appearing_in_two_groups_gets_two_entries() {
        let mut first = row("Amazing", 1, 1.0, "Origins");
        first.characters = "Iron Man".to_string();
        let mut second = row("Thor", 1, 5.0, "Ragnarok");
        second.characters = "Iron Man".to_string();

        let sheets = vec![SheetData {
            name: "Phase One".to_string(),
            rows: vec![first, second],
        }];
        let set = derive(&sheets).unwrap();

        let iron_man = &set.character_fissues[0];
        assert_eq!(iron_man.list.len(), 2);
        assert_eq!(iron_man.list[0].sort_id, "001");
        assert_eq!(iron_man.list[1].sort_id, "002");
    }

    #[test]
    fn test_separator_rows_do_not_break_groups() {
        let sheets = vec![SheetData {
            name: "Phase One".to_string(),
            rows: vec![
                row("Amazing", 1, 1.0, "Origins"),
                row("", 0, 0.0, ""),
                row("Amazing", 1, 2.0, "Origins"),
            ],
        }];
        let set = derive(&sheets).unwrap();

        assert_eq!(set.comics.len(), 2);
        assert_eq!(set.comics[0].sort_id, "001");
        assert_eq!(set.comics[1].sort_id, "001");
        assert_eq!(set.phase_fissues[0].list.len(), 1);
    }

    #[test]
    fn test_essential_flag_is_exact_literal() {
        let mut yes = row("Amazing", 1, 1.0, "Origins");
        yes.essential = "YES".to_string();
        let mut lowercase = row("Amazing", 1, 2.0, "Origins");
        lowercase.essential = "yes".to_string();

        let sheets = vec![SheetData {
            name: "Phase One".to_string(),
            rows: vec![yes, lowercase],
        }];
        let set = derive(&sheets).unwrap();

        assert!(set.comics[0].essential);
        assert!(!set.comics[1].essential);
    }

    #[test]
    fn test_representative_character_comes_from_group_start() {
        let mut first = row("Amazing", 1, 1.0, "Origins");
        first.characters = "Iron Man, Thor".to_string();

        let sheets = vec![SheetData {
            name: "Phase One".to_string(),
            rows: vec![first],
        }];
        let set = derive(&sheets).unwrap();

        let group = &set.phase_fissues[0].list[0];
        assert_eq!(group.character.as_ref().unwrap().name, "Iron Man");
    }

    #[test]
    fn test_split_list_guards_empty_input() {
        assert!(split_list("").is_empty());
        assert_eq!(split_list("Iron Man"), vec!["Iron Man"]);
        assert_eq!(split_list("Iron Man, Thor"), vec!["Iron Man", "Thor"]);
    }

    #[test]
    fn test_comments_split_only_when_present() {
        let mut with = row("Amazing", 1, 1.0, "Origins");
        with.comments = Some("read first, then rest".to_string());
        let without = row("Amazing", 1, 2.0, "Origins");

        let sheets = vec![SheetData {
            name: "Phase One".to_string(),
            rows: vec![with, without],
        }];
        let set = derive(&sheets).unwrap();

        assert_eq!(set.comics[0].comments, vec!["read first", "then rest"]);
        assert!(set.comics[1].comments.is_empty());
    }
}
