//! Folder mirroring
//!
//! Creates one folder per phase (`"NNN - <name>"`) and one per title
//! group (`"NNN"`) under it. When a new comic opens a group at a
//! position whose code is already taken, the existing group folders
//! from that position on are renamed one code up first, keeping folder
//! order aligned with the reading order. A row counts as new when its
//! ID is empty and the user has not marked it resolved.

use std::fs;
use std::path::Path;

use tracing::info;

use longbox_common::codes::code;
use longbox_common::{Error, Result};

use crate::workbook::SheetData;

/// Mirror the workbook structure under `out`.
pub fn mirror(sheets: &[SheetData], out: &Path) -> Result<()> {
    for (sheet_index, sheet) in sheets.iter().enumerate() {
        let phase_dir = out.join(format!("{} - {}", code(sheet_index + 1)?, sheet.name));
        if !phase_dir.is_dir() {
            info!(dir = %phase_dir.display(), "creating phase folder");
            fs::create_dir_all(&phase_dir)?;
        }

        let mut groups = read_group_dirs(&phase_dir)?;
        let mut sort_counter = 0;
        let mut last_title = String::new();

        for row in &sheet.rows {
            if row.collection.is_empty() {
                continue;
            }
            let is_new = row.id.is_empty() && !row.resolved;
            let mut starts_new_group = false;
            if row.title != last_title {
                sort_counter += 1;
                last_title = row.title.clone();
                starts_new_group = is_new;
            }

            let group_code = code(sort_counter)?;
            let exists = groups
                .iter()
                .any(|name| name.starts_with(group_code.as_str()));
            let mut modified = false;

            if starts_new_group && exists {
                // Shift every group from this position on one code up,
                // highest first so nothing gets overwritten.
                for position in (sort_counter..=groups.len()).rev() {
                    let old_code = code(position)?;
                    let new_code = code(position + 1)?;
                    let found = groups
                        .iter()
                        .find(|name| name.starts_with(old_code.as_str()))
                        .cloned()
                        .ok_or_else(|| {
                            Error::NotFound(format!(
                                "group folder {} in {}",
                                old_code,
                                phase_dir.display()
                            ))
                        })?;
                    let from = phase_dir.join(&found);
                    let to = phase_dir.join(&new_code);
                    info!(from = %from.display(), to = %to.display(), "renaming group folder");
                    fs::rename(&from, &to)?;
                    modified = true;
                }
            }

            if (starts_new_group && exists) || !exists {
                let group_dir = phase_dir.join(&group_code);
                info!(
                    dir = %group_dir.display(),
                    collection = %row.collection,
                    "creating group folder"
                );
                fs::create_dir_all(&group_dir)?;
                modified = true;
            }

            if modified {
                groups = read_group_dirs(&phase_dir)?;
            }
        }
    }
    Ok(())
}

fn read_group_dirs(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::RowRecord;

    fn row(id: &str, collection: &str, title: &str) -> RowRecord {
        RowRecord {
            id: id.to_string(),
            collection: collection.to_string(),
            vol: 1,
            num: 1.0,
            title: title.to_string(),
            ..RowRecord::default()
        }
    }

    fn dirs_under(dir: &Path) -> Vec<String> {
        let mut names = read_group_dirs(dir).unwrap();
        names.sort();
        names
    }

    #[test]
    fn test_creates_phase_and_group_folders() {
        let out = tempfile::tempdir().unwrap();
        let sheets = vec![SheetData {
            name: "Phase One".to_string(),
            rows: vec![
                row("100", "Amazing", "Origins"),
                row("101", "Amazing", "Origins"),
                row("102", "Amazing", "Secret War"),
            ],
        }];

        mirror(&sheets, out.path()).unwrap();

        assert_eq!(dirs_under(out.path()), vec!["001 - Phase One"]);
        let phase_dir = out.path().join("001 - Phase One");
        assert_eq!(dirs_under(&phase_dir), vec!["001", "002"]);
    }

    #[test]
    fn test_new_group_shifts_existing_folders_up() {
        let out = tempfile::tempdir().unwrap();
        let phase_dir = out.path().join("001 - Phase One");
        fs::create_dir_all(phase_dir.join("001 Origins")).unwrap();
        fs::create_dir_all(phase_dir.join("002 Secret War")).unwrap();

        // A new (un-identified) comic now opens the reading order
        let sheets = vec![SheetData {
            name: "Phase One".to_string(),
            rows: vec![
                row("", "Tales", "Genesis"),
                row("100", "Amazing", "Origins"),
                row("102", "Amazing", "Secret War"),
            ],
        }];

        mirror(&sheets, out.path()).unwrap();

        assert_eq!(dirs_under(&phase_dir), vec!["001", "002", "003"]);
    }

    #[test]
    fn test_existing_folders_are_left_alone() {
        let out = tempfile::tempdir().unwrap();
        let phase_dir = out.path().join("001 - Phase One");
        fs::create_dir_all(phase_dir.join("001 Origins")).unwrap();

        let sheets = vec![SheetData {
            name: "Phase One".to_string(),
            rows: vec![row("100", "Amazing", "Origins")],
        }];

        mirror(&sheets, out.path()).unwrap();

        assert_eq!(dirs_under(&phase_dir), vec!["001 Origins"]);
    }
}
