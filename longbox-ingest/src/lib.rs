//! # Longbox Ingest Library
//!
//! Spreadsheet ingestion for the reading order: derives the normalized
//! JSON collections from the workbook, enriches missing issue data from
//! the Marvel API, and mirrors the workbook structure as folders.

pub mod artifacts;
pub mod derive;
pub mod enrich;
pub mod folders;
pub mod marvel;
pub mod workbook;
