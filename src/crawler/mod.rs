//! Scraping pipeline
//!
//! This module contains the request side of the scraper, including:
//! - HTTP fetching with bounded retries
//! - Politeness pacing between requests
//! - Image downloads into the output directory
//! - Overall run coordination, one seed URL at a time

mod coordinator;
mod fetcher;
mod images;
mod scheduler;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, retry_with_delay, FetchFailure, FetchResult, Fetcher};
pub use images::{image_extension, ImageDownloader, ImageFailure, IMAGES_DIR};
pub use scheduler::{pause, PolitenessDelays, Scheduler};

use crate::config::Config;
use crate::output::{write_result, ScrapeResult};
use crate::url::extract_seed_urls;
use crate::{InputError, JihankiError};
use std::path::{Path, PathBuf};

/// Scrapes every target-site URL found in `text`
///
/// A document without any target-site URL is not an error: the run ends
/// with an empty result.
///
/// # Arguments
///
/// * `text` - The seed document
/// * `config` - The scraper configuration
/// * `output_dir` - Where images are stored
///
/// # Returns
///
/// * `Ok(ScrapeResult)` - One record or error entry per seed URL
/// * `Err(JihankiError)` - The scraper could not be set up
pub async fn run_scrape(
    text: &str,
    config: &Config,
    output_dir: &Path,
) -> Result<ScrapeResult, JihankiError> {
    let urls = match extract_seed_urls(text, &config.site.host) {
        Ok(urls) => urls,
        Err(JihankiError::Input(InputError::EmptyInput)) => {
            tracing::warn!("No {} URLs found in input", config.site.host);
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    tracing::info!("Found {} unique URLs", urls.len());

    let mut coordinator = Coordinator::new(config, output_dir)?;
    Ok(coordinator.run(&urls).await)
}

/// Runs a complete scrape from a seed file
///
/// This is the main entry point. It will:
/// 1. Read the seed document
/// 2. Prepare the output and image directories
/// 3. Scrape every URL found in the document
/// 4. Write `machines.json`
///
/// # Returns
///
/// * `Ok((ScrapeResult, PathBuf))` - The result and the path it was written to
/// * `Err(JihankiError)` - The input is unreadable or the output could not be written
pub async fn scrape_file(
    input: &Path,
    config: &Config,
    output_dir: &Path,
) -> Result<(ScrapeResult, PathBuf), JihankiError> {
    if !input.exists() {
        return Err(InputError::NotFound(input.to_path_buf()).into());
    }

    let text = tokio::fs::read_to_string(input)
        .await
        .map_err(|source| InputError::Read {
            path: input.to_path_buf(),
            source,
        })?;

    tokio::fs::create_dir_all(output_dir.join(IMAGES_DIR)).await?;

    let result = run_scrape(&text, config, output_dir).await?;
    let path = write_result(&result, output_dir)?;

    tracing::info!("Results saved to {}", path.display());

    Ok((result, path))
}
