//! Photograph downloads
//!
//! Images of one record are stored as `images/<source_id>/<n><ext>` under the
//! output directory, numbered from 1 in the order the page listed them. A
//! failed download leaves its reference without a local path and never fails
//! the record.

use crate::crawler::fetcher::{FetchFailure, Fetcher};
use crate::crawler::scheduler::Scheduler;
use crate::output::ImageRef;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Directory under the output directory that holds every record's images
pub const IMAGES_DIR: &str = "images";

const KNOWN_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];
const DEFAULT_EXTENSION: &str = ".jpg";

/// Why a single image could not be stored
#[derive(Debug, Error)]
pub enum ImageFailure {
    #[error("download failed: {0}")]
    Fetch(#[from] FetchFailure),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Picks a file extension from the URL path
///
/// The lowercased path must end with one of `.jpg .jpeg .png .gif .webp`;
/// anything else is stored as `.jpg`. Query strings are ignored.
pub fn image_extension(url: &str) -> &'static str {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_lowercase(),
    };

    KNOWN_EXTENSIONS
        .iter()
        .find(|ext| path.ends_with(*ext))
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Relative path (`images/<source_id>/<n><ext>`) for the `index`-th image
pub fn image_relative_path(source_id: &str, index: usize, url: &str) -> String {
    format!(
        "{}/{}/{}{}",
        IMAGES_DIR,
        source_id,
        index + 1,
        image_extension(url)
    )
}

/// Downloads a record's images one at a time
pub struct ImageDownloader<'a> {
    fetcher: &'a Fetcher,
    scheduler: &'a Scheduler,
    output_dir: &'a Path,
}

impl<'a> ImageDownloader<'a> {
    pub fn new(fetcher: &'a Fetcher, scheduler: &'a Scheduler, output_dir: &'a Path) -> Self {
        Self {
            fetcher,
            scheduler,
            output_dir,
        }
    }

    /// Downloads every image of a record, filling in `local_path` on success
    ///
    /// File names are fixed by position before any download starts, so a
    /// failure never shifts the numbering of later images.
    ///
    /// # Returns
    ///
    /// The number of images stored.
    pub async fn download_all(&self, source_id: &str, images: &mut [ImageRef]) -> usize {
        let targets: Vec<String> = images
            .iter()
            .enumerate()
            .map(|(index, image)| image_relative_path(source_id, index, &image.remote_url))
            .collect();

        let mut stored = 0;
        for (index, (image, relative)) in images.iter_mut().zip(targets).enumerate() {
            self.scheduler.wait_for_image(index).await;
            tracing::debug!("Downloading image {}: {}", index + 1, image.remote_url);

            match self.download(&image.remote_url, &relative).await {
                Ok(()) => {
                    tracing::debug!("Saved {} to {}", image.remote_url, relative);
                    image.local_path = Some(relative);
                    stored += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to download image {}: {}", image.remote_url, e);
                }
            }
        }

        stored
    }

    async fn download(&self, url: &str, relative: &str) -> Result<(), ImageFailure> {
        let bytes = self.fetcher.fetch_bytes(url).await?;

        let path = self.output_dir.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ImageFailure::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| ImageFailure::Io { path, source })
    }
}
