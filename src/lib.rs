//! Jihanki Scraper: a polite single-site venue scraper
//!
//! This crate extracts vending machine records, plus their photographs, from
//! jihanki.sagase.com pages whose URLs are listed in an arbitrary text document.
//! Requests are issued strictly one at a time with politeness delays, and a
//! failure on one page never aborts the rest of the run.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Jihanki Scraper operations
#[derive(Debug, Error)]
pub enum JihankiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors about the seed document
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No target-site URLs found in input")]
    EmptyInput,
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Could not extract machine ID")]
    MissingSourceId(String),
}

/// Result type alias for Jihanki Scraper operations
pub type Result<T> = std::result::Result<T, JihankiError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_scrape, scrape_file, Coordinator, Fetcher};
pub use output::{ImageRef, Location, MachineRecord, ScrapeError, ScrapeResult};
pub use url::{extract_seed_urls, SeedUrl};
