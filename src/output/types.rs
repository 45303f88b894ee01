//! Result document types
//!
//! Field names follow the published `machines.json` schema.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Where a machine is
///
/// `latitude` and `longitude` are only ever set together; use
/// [`Location::set_coordinates`] rather than assigning them one by one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Location {
    /// Sets or clears both coordinates at once
    pub fn set_coordinates(&mut self, coordinates: Option<(f64, f64)>) {
        match coordinates {
            Some((lat, lng)) => {
                self.latitude = Some(lat);
                self.longitude = Some(lng);
            }
            None => {
                self.latitude = None;
                self.longitude = None;
            }
        }
    }

    /// Returns the coordinate pair, if both halves are known
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// A photograph referenced by a machine page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Absolute remote URL, unique within its record
    #[serde(rename = "url")]
    pub remote_url: String,

    /// Path relative to the output directory, set once the download succeeds
    pub local_path: Option<String>,
}

impl ImageRef {
    /// Creates a reference that has not been downloaded yet
    pub fn new(remote_url: impl Into<String>) -> Self {
        Self {
            remote_url: remote_url.into(),
            local_path: None,
        }
    }
}

/// One scraped vending machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    pub source_id: String,
    pub source_url: String,
    pub name: Option<String>,
    pub location: Location,
    pub merchandise: Vec<String>,
    pub categories: Vec<String>,
    pub features: Vec<String>,
    pub images: Vec<ImageRef>,
}

impl MachineRecord {
    /// Creates an empty record for a page
    pub fn new(source_id: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            source_url: source_url.into(),
            name: None,
            location: Location::default(),
            merchandise: Vec::new(),
            categories: Vec::new(),
            features: Vec::new(),
            images: Vec::new(),
        }
    }
}

/// A seed URL that did not yield a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeError {
    pub url: String,
    #[serde(rename = "error")]
    pub reason: String,
}

impl ScrapeError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// The root document written at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    /// ISO-8601 UTC timestamp of the run start
    #[serde(rename = "scraped_at")]
    pub scraped_at_utc: String,

    /// Host the records were scraped from
    #[serde(rename = "source")]
    pub source_site: String,

    pub machines: Vec<MachineRecord>,
    pub errors: Vec<ScrapeError>,
}

impl ScrapeResult {
    /// Starts an empty result stamped with the current UTC time
    pub fn new(source_site: impl Into<String>) -> Self {
        Self {
            scraped_at_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
            source_site: source_site.into(),
            machines: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Number of seed URLs accounted for
    pub fn processed(&self) -> usize {
        self.machines.len() + self.errors.len()
    }
}
