//! Configuration module for Jihanki Scraper
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a built-in default, so an empty file (or
//! no file at all) yields the production settings for jihanki.sagase.com.
//!
//! # Example
//!
//! ```no_run
//! use jihanki_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("jihanki.toml")).unwrap();
//! println!("Scraping host: {}", config.site.host);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, PolitenessConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
