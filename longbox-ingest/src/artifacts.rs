//! JSON artifact writing
//!
//! One pretty-printed array per collection. Output is deterministic:
//! deriving an unmodified workbook twice writes byte-identical files.

use std::fs;
use std::path::Path;

use tracing::info;

use longbox_common::artifacts::{
    CHARACTERS_FILE, CHARACTER_FISSUES_FILE, COMICS_FILE, CREATORS_FILE, CREATOR_FISSUES_FILE,
    EVENTS_FILE, EVENT_FISSUES_FILE, PHASES_FILE, PHASE_FISSUES_FILE,
};
use longbox_common::model::Document;
use longbox_common::Result;

use crate::derive::DerivedSet;

/// Write the full artifact set under `out_dir`, creating the directory
/// if needed.
pub fn write_artifacts(set: &DerivedSet, out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)?;
    write_document(out_dir, COMICS_FILE, &set.comics)?;
    write_document(out_dir, PHASES_FILE, &set.phases)?;
    write_document(out_dir, EVENTS_FILE, &set.events)?;
    write_document(out_dir, CHARACTERS_FILE, &set.characters)?;
    write_document(out_dir, CREATORS_FILE, &set.creators)?;
    write_document(out_dir, PHASE_FISSUES_FILE, &set.phase_fissues)?;
    write_document(out_dir, EVENT_FISSUES_FILE, &set.event_fissues)?;
    write_document(out_dir, CHARACTER_FISSUES_FILE, &set.character_fissues)?;
    write_document(out_dir, CREATOR_FISSUES_FILE, &set.creator_fissues)?;
    Ok(())
}

fn write_document(dir: &Path, name: &str, document: &impl Document) -> Result<()> {
    let path = dir.join(name);
    fs::write(&path, document.to_json()?)?;
    info!(file = %path.display(), "wrote artifact");
    Ok(())
}
