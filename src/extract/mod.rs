//! Record extraction for machine pages
//!
//! This module turns a fetched page into a [`MachineRecord`]:
//! - The structured information table is the primary source for every field
//! - Name and address fall back to headings, the title, and postal-looking text
//! - Coordinates come from scripts, map iframes, and map element attributes
//! - Candidate photographs are collected for the downloader
//!
//! Each fallback chain is an explicit, ordered list of sources; the first one
//! that yields a value wins.

mod address;
mod coordinates;
mod images;
mod name;
mod table;
mod text;

pub use address::{extract_address, AddressSource};
pub use coordinates::{
    map_attribute_coordinates, resolve_coordinates, CoordinateSource, Coordinates,
};
pub use images::collect_images;
pub use name::{extract_name, NameSource};
pub use table::TableFields;

use crate::config::SiteConfig;
use crate::output::MachineRecord;
use crate::url::SeedUrl;
use scraper::Html;
use thiserror::Error;

/// Errors that prevent a page from yielding a record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("empty document")]
    EmptyDocument,

    #[error("document contains no markup")]
    NotMarkup,
}

/// What the field sources read from
pub struct PageContext<'a> {
    pub document: &'a Html,
    pub table: &'a TableFields,
}

/// Parses machine pages into records
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    uploads_path: String,
}

impl RecordExtractor {
    /// Creates an extractor for the configured site
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            uploads_path: site.uploads_path.clone(),
        }
    }

    /// Extracts a record from a page's HTML
    ///
    /// Malformed but parseable markup never fails; missing fields are left
    /// empty. Image references are collected with no local path yet.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineRecord)` - The record, ready for image download
    /// * `Err(ExtractError)` - The body cannot be treated as HTML at all
    pub fn extract(&self, html: &str, seed: &SeedUrl) -> Result<MachineRecord, ExtractError> {
        if html.trim().is_empty() {
            return Err(ExtractError::EmptyDocument);
        }
        if !html.contains('<') {
            return Err(ExtractError::NotMarkup);
        }

        let document = Html::parse_document(html);
        let table = TableFields::parse(&document);
        let page = PageContext {
            document: &document,
            table: &table,
        };

        let mut record = MachineRecord::new(seed.source_id(), seed.as_str());
        record.name = extract_name(&page);
        record.location.address = extract_address(&page);

        // Map element attributes override every other coordinate source
        let coordinates =
            map_attribute_coordinates(&document).or_else(|| resolve_coordinates(&document));
        record.location.set_coordinates(coordinates);

        record.images = collect_images(&document, seed.url(), &self.uploads_path);

        let TableFields {
            merchandise,
            categories,
            features,
            ..
        } = table;
        record.merchandise = merchandise;
        record.categories = categories;
        record.features = features;

        Ok(record)
    }
}
