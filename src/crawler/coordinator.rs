//! Scrape coordinator
//!
//! Walks the seed URLs in order and folds every outcome into one
//! [`ScrapeResult`]. Each URL ends up as exactly one record or exactly one
//! error entry; nothing that goes wrong for one URL stops the run.

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::images::ImageDownloader;
use crate::crawler::scheduler::{PolitenessDelays, Scheduler};
use crate::extract::RecordExtractor;
use crate::output::{MachineRecord, ScrapeError, ScrapeResult};
use crate::url::{SeedUrl, SourceIdPattern};
use crate::JihankiError;
use std::path::{Path, PathBuf};

/// Main scrape coordinator structure
pub struct Coordinator {
    fetcher: Fetcher,
    extractor: RecordExtractor,
    scheduler: Scheduler,
    pattern: SourceIdPattern,
    output_dir: PathBuf,
    source_site: String,
}

impl Coordinator {
    /// Creates a coordinator that stores images under `output_dir`
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(JihankiError)` - The HTTP client or the id pattern could not be built
    pub fn new(config: &Config, output_dir: &Path) -> Result<Self, JihankiError> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
            extractor: RecordExtractor::new(&config.site),
            scheduler: Scheduler::new(PolitenessDelays::from_config(&config.politeness)),
            pattern: SourceIdPattern::new(&config.site.machine_path)?,
            output_dir: output_dir.to_path_buf(),
            source_site: config.site.host.clone(),
        })
    }

    /// Scrapes every URL, in order, one at a time
    pub async fn run(&mut self, urls: &[String]) -> ScrapeResult {
        let mut result = ScrapeResult::new(self.source_site.as_str());
        let total = urls.len();

        tracing::info!("Starting scrape of {} URLs", total);

        for (i, url) in urls.iter().enumerate() {
            tracing::info!("[{}/{}] Scraping: {}", i + 1, total, url);

            match self.process_url(url).await {
                Ok(record) => result.machines.push(record),
                Err(error) => {
                    tracing::warn!("Skipped {}: {}", error.url, error.reason);
                    result.errors.push(error);
                }
            }
        }

        tracing::info!(
            "Scrape complete: {} machines, {} errors",
            result.machines.len(),
            result.errors.len()
        );

        result
    }

    /// Takes one URL through fetch, extraction and image download
    async fn process_url(&mut self, url: &str) -> Result<MachineRecord, ScrapeError> {
        // No request is made for a URL without a source id
        let seed = SeedUrl::parse(url, &self.pattern)
            .map_err(|e| ScrapeError::new(url, e.to_string()))?;

        self.scheduler.wait_for_page().await;

        let html = self
            .fetcher
            .fetch_page(seed.as_str())
            .await
            .map_err(|f| ScrapeError::new(url, format!("Failed to fetch page: {}", f)))?;

        let mut record = self
            .extractor
            .extract(&html, &seed)
            .map_err(|e| ScrapeError::new(url, format!("Parse error: {}", e)))?;

        log_record(&record);

        if !record.images.is_empty() {
            let downloader = ImageDownloader::new(&self.fetcher, &self.scheduler, &self.output_dir);
            let stored = downloader
                .download_all(&record.source_id, &mut record.images)
                .await;
            tracing::debug!("  Downloaded {}/{} images", stored, record.images.len());
        }

        Ok(record)
    }
}

fn log_record(record: &MachineRecord) {
    tracing::info!("  Name: {}", record.name.as_deref().unwrap_or("-"));
    tracing::info!(
        "  Address: {}",
        record.location.address.as_deref().unwrap_or("-")
    );
    if let Some((lat, lng)) = record.location.coordinates() {
        tracing::info!("  Coordinates: {}, {}", lat, lng);
    }
    if !record.merchandise.is_empty() {
        tracing::info!("  Products: {}", record.merchandise.join(", "));
    }
    tracing::info!("  Images: {}", record.images.len());
    tracing::debug!(
        "  {} categories, {} features",
        record.categories.len(),
        record.features.len()
    );
}
