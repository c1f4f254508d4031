//! Artifact store and typed finders
//!
//! Loads the JSON collections written by the ingest tool once at
//! startup and answers the queries the read surface needs. Collections
//! are kept as parsed JSON arrays; the query matcher filters them and
//! matches decode strictly into the model types.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use longbox_common::artifacts::{
    CHARACTERS_FILE, CHARACTER_FISSUES_FILE, COMICS_FILE, CREATORS_FILE, CREATOR_FISSUES_FILE,
    EVENTS_FILE, EVENT_FISSUES_FILE, PHASES_FILE, PHASE_FISSUES_FILE,
};
use longbox_common::model::{Comic, ComicList, Fissues, FissuesList, Namable, NamableList};
use longbox_common::{query, Error, Result};

/// A namable dimension of the reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Phases,
    Events,
    Characters,
    Creators,
}

/// The loaded artifact collections.
pub struct Store {
    comics: Vec<Value>,
    phases: Vec<Value>,
    events: Vec<Value>,
    characters: Vec<Value>,
    creators: Vec<Value>,
    phase_fissues: Vec<Value>,
    event_fissues: Vec<Value>,
    character_fissues: Vec<Value>,
    creator_fissues: Vec<Value>,
}

impl Store {
    /// Load every artifact from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            comics: load_collection(dir, COMICS_FILE)?,
            phases: load_collection(dir, PHASES_FILE)?,
            events: load_collection(dir, EVENTS_FILE)?,
            characters: load_collection(dir, CHARACTERS_FILE)?,
            creators: load_collection(dir, CREATORS_FILE)?,
            phase_fissues: load_collection(dir, PHASE_FISSUES_FILE)?,
            event_fissues: load_collection(dir, EVENT_FISSUES_FILE)?,
            character_fissues: load_collection(dir, CHARACTER_FISSUES_FILE)?,
            creator_fissues: load_collection(dir, CREATOR_FISSUES_FILE)?,
        })
    }

    pub fn comic_count(&self) -> usize {
        self.comics.len()
    }

    // Comics

    pub fn find_comics(&self, expression: &str) -> Result<ComicList> {
        find(&self.comics, expression)
    }

    pub fn list_comics(&self) -> Result<ComicList> {
        self.find_comics("id!=''")
    }

    pub fn comic_by_id(&self, id: &str) -> Result<Option<Comic>> {
        Ok(self
            .find_comics(&format!("id='{}'", id))?
            .into_iter()
            .next())
    }

    pub fn comics_by_phase(&self, phase_id: &str) -> Result<ComicList> {
        self.find_comics(&format!("phaseid='{}'", phase_id))
    }

    pub fn comics_by_group(&self, phase_id: &str, sort_id: &str) -> Result<ComicList> {
        self.find_comics(&format!(
            "phaseid='{}' and sortid='{}'",
            phase_id, sort_id
        ))
    }

    // Namables

    pub fn list_namables(&self, dimension: Dimension) -> Result<NamableList> {
        find(self.namables(dimension), "id!=''")
    }

    pub fn namable_by_id(&self, dimension: Dimension, id: &str) -> Result<Option<Namable>> {
        Ok(
            find::<Namable>(self.namables(dimension), &format!("id='{}'", id))?
                .into_iter()
                .next(),
        )
    }

    // First issues

    pub fn list_fissues(&self, dimension: Dimension) -> Result<FissuesList> {
        find(self.fissues(dimension), "namable.id!=''")
    }

    pub fn fissues_by_id(&self, dimension: Dimension, id: &str) -> Result<Option<Fissues>> {
        Ok(
            find::<Fissues>(self.fissues(dimension), &format!("namable.id='{}'", id))?
                .into_iter()
                .next(),
        )
    }

    fn namables(&self, dimension: Dimension) -> &[Value] {
        match dimension {
            Dimension::Phases => &self.phases,
            Dimension::Events => &self.events,
            Dimension::Characters => &self.characters,
            Dimension::Creators => &self.creators,
        }
    }

    fn fissues(&self, dimension: Dimension) -> &[Value] {
        match dimension {
            Dimension::Phases => &self.phase_fissues,
            Dimension::Events => &self.event_fissues,
            Dimension::Characters => &self.character_fissues,
            Dimension::Creators => &self.creator_fissues,
        }
    }
}

fn load_collection(dir: &Path, name: &str) -> Result<Vec<Value>> {
    let path = dir.join(name);
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    match serde_json::from_str(&contents)? {
        Value::Array(items) => Ok(items),
        _ => Err(Error::Config(format!(
            "{} is not a JSON array",
            path.display()
        ))),
    }
}

/// Filter a collection and decode the matches strictly.
fn find<T: DeserializeOwned>(collection: &[Value], expression: &str) -> Result<Vec<T>> {
    query::filter(collection, expression)?
        .into_iter()
        .map(|value| serde_json::from_value(value).map_err(Error::from))
        .collect()
}
