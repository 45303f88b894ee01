use crate::{InputError, UrlError};
use regex::Regex;
use std::collections::HashSet;

/// Sentence punctuation that is never part of a seed URL
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Finds target-site URLs in arbitrary text
///
/// Matching is purely syntactic: the site prefix followed by one or more
/// characters that are neither whitespace nor a closing bracket.
#[derive(Debug, Clone)]
pub struct UrlExtractor {
    pattern: Regex,
}

impl UrlExtractor {
    /// Builds an extractor for URLs on `host` (which may carry a `:port`)
    pub fn for_host(host: &str) -> Result<Self, UrlError> {
        let pattern = Regex::new(&format!(r"https?://{}/[^\s)\]]+", regex::escape(host)))
            .map_err(|e| UrlError::Parse(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Extracts seed URLs in first-seen order
    ///
    /// Trailing `.,;:!?` characters are stripped before deduplication, so
    /// `…/3492/.` and `…/3492/` count as the same URL.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - At least one URL, duplicates removed
    /// * `Err(InputError::EmptyInput)` - The text holds no target-site URL
    pub fn extract(&self, text: &str) -> Result<Vec<String>, InputError> {
        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        for found in self.pattern.find_iter(text) {
            let url = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            if seen.insert(url) {
                urls.push(url.to_string());
            }
        }

        if urls.is_empty() {
            return Err(InputError::EmptyInput);
        }

        Ok(urls)
    }
}

/// Convenience wrapper around [`UrlExtractor`]
///
/// # Example
///
/// ```
/// use jihanki_scraper::url::extract_seed_urls;
///
/// let text = "See https://jihanki.sagase.com/jihanki/3492/. Also (https://jihanki.sagase.com/jihanki/12/)";
/// let urls = extract_seed_urls(text, "jihanki.sagase.com").unwrap();
/// assert_eq!(urls, vec![
///     "https://jihanki.sagase.com/jihanki/3492/",
///     "https://jihanki.sagase.com/jihanki/12/",
/// ]);
/// ```
pub fn extract_seed_urls(text: &str, host: &str) -> crate::Result<Vec<String>> {
    let extractor = UrlExtractor::for_host(host)?;
    Ok(extractor.extract(text)?)
}
