//! URL handling module for Jihanki Scraper
//!
//! This module finds seed URLs in free text and turns them into validated
//! [`SeedUrl`]s carrying the numeric source id used as the record key.

mod extract;
mod seed;

pub use extract::{extract_seed_urls, UrlExtractor};
pub use seed::{SeedUrl, SourceIdPattern};
