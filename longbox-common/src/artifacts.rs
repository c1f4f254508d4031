//! Artifact file names
//!
//! Shared contract between the ingest writer and the web reader: one
//! JSON array per collection, plus one grouped-first-issue file per
//! dimension.

pub const COMICS_FILE: &str = "comics.json";
pub const PHASES_FILE: &str = "phases.json";
pub const EVENTS_FILE: &str = "events.json";
pub const CHARACTERS_FILE: &str = "characters.json";
pub const CREATORS_FILE: &str = "creators.json";
pub const PHASE_FISSUES_FILE: &str = "fissues-phases.json";
pub const EVENT_FISSUES_FILE: &str = "fissues-events.json";
pub const CHARACTER_FISSUES_FILE: &str = "fissues-characters.json";
pub const CREATOR_FISSUES_FILE: &str = "fissues-creators.json";

/// Every artifact a derivation run produces, in write order.
pub const ALL_FILES: [&str; 9] = [
    COMICS_FILE,
    PHASES_FILE,
    EVENTS_FILE,
    CHARACTERS_FILE,
    CREATORS_FILE,
    PHASE_FISSUES_FILE,
    EVENT_FISSUES_FILE,
    CHARACTER_FISSUES_FILE,
    CREATOR_FISSUES_FILE,
];
