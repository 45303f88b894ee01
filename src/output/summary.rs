use crate::output::ScrapeResult;
use std::path::Path;

/// Counts describing a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total_urls: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub images_downloaded: usize,
    pub images_failed: usize,
    pub errors: Vec<(String, String)>,
}

impl RunSummary {
    /// Tallies a result document
    pub fn from_result(result: &ScrapeResult) -> Self {
        let (images_downloaded, images_failed) = result
            .machines
            .iter()
            .flat_map(|m| m.images.iter())
            .fold((0, 0), |(ok, failed), image| {
                if image.local_path.is_some() {
                    (ok + 1, failed)
                } else {
                    (ok, failed + 1)
                }
            });

        Self {
            total_urls: result.processed(),
            succeeded: result.machines.len(),
            failed: result.errors.len(),
            images_downloaded,
            images_failed,
            errors: result
                .errors
                .iter()
                .map(|e| (e.url.clone(), e.reason.clone()))
                .collect(),
        }
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary, json_path: &Path) {
    println!("\n=== Summary ===\n");

    println!("Total URLs processed: {}", summary.total_urls);
    println!("Successfully scraped: {}", summary.succeeded);
    println!("Failed: {}", summary.failed);
    println!(
        "Images: {} downloaded, {} failed",
        summary.images_downloaded, summary.images_failed
    );
    println!("Output saved to: {}", json_path.display());

    if !summary.errors.is_empty() {
        println!("\nErrors:");
        for (url, error) in &summary.errors {
            println!("  - {}: {}", url, error);
        }
    }
}
