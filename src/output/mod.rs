//! Output module for scrape results
//!
//! This module handles:
//! - The record types that make up a run's result document
//! - Writing `machines.json`
//! - Summarising a finished run for the terminal

mod json;
mod summary;
mod types;

pub use json::{write_result, RESULT_FILE_NAME};
pub use summary::{print_summary, RunSummary};
pub use types::{ImageRef, Location, MachineRecord, ScrapeError, ScrapeResult};
