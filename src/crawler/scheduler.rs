//! Request pacing
//!
//! The scraper never has more than one request in flight. This module
//! decides how long to wait before each one:
//! - `D` between attempts of a failing page request
//! - `D + jitter(0, J)` between consecutive seed pages
//! - `D / 2` between images of one record, and between image retries

use crate::config::PolitenessConfig;
use rand::Rng;
use std::time::Duration;

/// Politeness delays derived from the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolitenessDelays {
    /// Base delay `D`
    pub request_delay: Duration,

    /// Upper bound of the jitter added between pages
    pub page_jitter: Duration,
}

impl PolitenessDelays {
    pub fn from_config(config: &PolitenessConfig) -> Self {
        Self {
            request_delay: Duration::from_millis(config.request_delay_ms),
            page_jitter: Duration::from_millis(config.page_jitter_ms),
        }
    }

    /// Wait between attempts of a page request
    pub fn page_retry(&self) -> Duration {
        self.request_delay
    }

    /// Wait between attempts of an image request
    pub fn image_retry(&self) -> Duration {
        self.request_delay / 2
    }

    /// Wait between two image downloads of one record
    pub fn between_images(&self) -> Duration {
        self.request_delay / 2
    }

    /// Wait between two seed pages, with fresh random jitter
    pub fn between_pages(&self) -> Duration {
        let jitter_ms = self.page_jitter.as_millis() as u64;
        let jitter = rand::rng().random_range(0..=jitter_ms);
        self.request_delay + Duration::from_millis(jitter)
    }
}

/// Sleeps for `delay`, returning at once for a zero delay
pub async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Gates page and image requests for one run
///
/// There is exactly one scheduler per run and it is driven sequentially, so
/// it holds plain counters rather than any synchronisation.
#[derive(Debug)]
pub struct Scheduler {
    delays: PolitenessDelays,
    pages_started: usize,
}

impl Scheduler {
    pub fn new(delays: PolitenessDelays) -> Self {
        Self {
            delays,
            pages_started: 0,
        }
    }

    /// Waits before fetching the next seed page
    ///
    /// The first page of a run goes out immediately.
    pub async fn wait_for_page(&mut self) {
        if self.pages_started > 0 {
            let delay = self.delays.between_pages();
            tracing::debug!("Waiting {:?} before next page", delay);
            pause(delay).await;
        }
        self.pages_started += 1;
    }

    /// Waits before downloading the image at `index` (0-based) of a record
    pub async fn wait_for_image(&self, index: usize) {
        if index > 0 {
            pause(self.delays.between_images()).await;
        }
    }

    /// Number of page fetches started so far
    pub fn pages_started(&self) -> usize {
        self.pages_started
    }
}
