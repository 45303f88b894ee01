//! Candidate photograph discovery
//!
//! Genuine machine photos live under the site's machine-uploads path. When a
//! page has none there, content-area images are taken instead, minus anything
//! that looks like decoration.

use crate::output::ImageRef;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ALL_IMAGES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid selector"));
static CONTENT_IMAGES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".post_content img, article img, .content img, main img")
        .expect("valid selector")
});

/// Attributes that may carry the image URL, lazy-loading ones included
const SOURCE_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src"];

/// URL fragments that mark icons, logos and other chrome
const DECORATIVE_KEYWORDS: &[&str] = &[
    "icon", "logo", "avatar", "button", "arrow", "sprite", "gravatar",
];

/// Declared sizes below this are thumbnails or decoration
const MIN_DIMENSION: i64 = 100;

/// Collects image references in document order, deduplicated by resolved URL
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `page_url` - Base for resolving relative image URLs
/// * `uploads_path` - Path segment identifying machine photographs
pub fn collect_images(document: &Html, page_url: &Url, uploads_path: &str) -> Vec<ImageRef> {
    let uploads: Vec<String> = resolved_sources(document.select(&ALL_IMAGES), page_url)
        .filter(|(_, url)| url.contains(uploads_path))
        .map(|(_, url)| url)
        .collect();

    if !uploads.is_empty() {
        return dedup(uploads);
    }

    let content: Vec<String> = resolved_sources(document.select(&CONTENT_IMAGES), page_url)
        .filter(|(img, url)| !is_decorative(url) && !is_undersized(*img))
        .map(|(_, url)| url)
        .collect();

    dedup(content)
}

fn resolved_sources<'a>(
    images: impl Iterator<Item = ElementRef<'a>> + 'a,
    page_url: &'a Url,
) -> impl Iterator<Item = (ElementRef<'a>, String)> + 'a {
    images.filter_map(move |img| {
        let src = image_source(img)?;
        let url = resolve_image_url(src, page_url)?;
        Some((img, url))
    })
}

fn dedup(urls: Vec<String>) -> Vec<ImageRef> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .map(ImageRef::new)
        .collect()
}

/// First source attribute that is neither empty nor a `data:` placeholder
fn image_source(img: ElementRef<'_>) -> Option<&str> {
    SOURCE_ATTRS
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(str::trim)
        .find(|src| !src.is_empty() && !src.starts_with("data:"))
}

/// Resolves an image reference against the page URL
///
/// Returns None for data URIs and anything that does not resolve to http(s).
fn resolve_image_url(src: &str, page_url: &Url) -> Option<String> {
    if src.starts_with("data:") {
        return None;
    }

    let absolute = page_url.join(src).ok()?;
    matches!(absolute.scheme(), "http" | "https").then(|| absolute.to_string())
}

fn is_decorative(url: &str) -> bool {
    let lower = url.to_lowercase();
    DECORATIVE_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// True when a numeric `width` or `height` attribute is below the minimum
fn is_undersized(img: ElementRef<'_>) -> bool {
    ["width", "height"].iter().any(|attr| {
        img.value()
            .attr(attr)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .is_some_and(|size| size < MIN_DIMENSION)
    })
}
