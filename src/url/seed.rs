use crate::{UrlError, UrlResult};
use regex::Regex;
use std::fmt;
use url::Url;

/// Locates the numeric source id inside a seed URL's path
#[derive(Debug, Clone)]
pub struct SourceIdPattern {
    pattern: Regex,
}

impl SourceIdPattern {
    /// Builds the pattern `/<machine_path>/<digits>`
    pub fn new(machine_path: &str) -> UrlResult<Self> {
        let pattern = Regex::new(&format!(r"/{}/(\d+)", regex::escape(machine_path)))
            .map_err(|e| UrlError::Parse(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Returns the first source id found in `url`
    pub fn find<'a>(&self, url: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// A validated seed URL known to carry a source id
///
/// The original string is kept verbatim for the output document; the parsed
/// [`Url`] is used for requests and for resolving relative image paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUrl {
    raw: String,
    url: Url,
    source_id: String,
}

impl SeedUrl {
    /// Validates `raw` and extracts its source id
    ///
    /// # Returns
    ///
    /// * `Ok(SeedUrl)` - An http(s) URL with a numeric source id
    /// * `Err(UrlError::MissingSourceId)` - No `/<machine_path>/<digits>` segment
    /// * `Err(UrlError::Parse)` / `Err(UrlError::InvalidScheme)` - Not a usable URL
    ///
    /// # Example
    ///
    /// ```
    /// use jihanki_scraper::url::{SeedUrl, SourceIdPattern};
    ///
    /// let pattern = SourceIdPattern::new("jihanki").unwrap();
    /// let seed = SeedUrl::parse("https://jihanki.sagase.com/jihanki/3492/", &pattern).unwrap();
    /// assert_eq!(seed.source_id(), "3492");
    /// ```
    pub fn parse(raw: &str, pattern: &SourceIdPattern) -> UrlResult<Self> {
        let url = Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(url.scheme().to_string()));
        }

        let source_id = pattern
            .find(raw)
            .ok_or_else(|| UrlError::MissingSourceId(raw.to_string()))?
            .to_string();

        Ok(Self {
            raw: raw.to_string(),
            url,
            source_id,
        })
    }

    /// The URL exactly as it appeared in the seed document
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The numeric source id, as a string of digits
    pub fn source_id(&self) -> &str {
        &self.source_id
    }
}

impl fmt::Display for SeedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> SourceIdPattern {
        SourceIdPattern::new("jihanki").unwrap()
    }

    #[test]
    fn test_extracts_source_id() {
        let seed = SeedUrl::parse("https://jihanki.sagase.com/jihanki/3492/", &pattern()).unwrap();
        assert_eq!(seed.source_id(), "3492");
        assert_eq!(seed.as_str(), "https://jihanki.sagase.com/jihanki/3492/");
        assert_eq!(seed.url().host_str(), Some("jihanki.sagase.com"));
    }

    #[test]
    fn test_source_id_without_trailing_slash() {
        let seed = SeedUrl::parse("https://jihanki.sagase.com/jihanki/17", &pattern()).unwrap();
        assert_eq!(seed.source_id(), "17");
    }

    #[test]
    fn test_missing_source_id() {
        let result = SeedUrl::parse("https://jihanki.sagase.com/category/udon/", &pattern());
        assert!(matches!(result, Err(UrlError::MissingSourceId(_))));
    }

    #[test]
    fn test_non_numeric_source_id() {
        let result = SeedUrl::parse("https://jihanki.sagase.com/jihanki/abc/", &pattern());
        assert!(matches!(result, Err(UrlError::MissingSourceId(_))));
    }

    #[test]
    fn test_missing_source_id_message() {
        let err = SeedUrl::parse("https://jihanki.sagase.com/about/", &pattern()).unwrap_err();
        assert_eq!(err.to_string(), "Could not extract machine ID");
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = SeedUrl::parse("ftp://jihanki.sagase.com/jihanki/1/", &pattern());
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_rejects_unparseable_url() {
        let result = SeedUrl::parse("not a url", &pattern());
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_display_is_raw_string() {
        let seed = SeedUrl::parse("https://jihanki.sagase.com/jihanki/8/?ref=list", &pattern()).unwrap();
        assert_eq!(seed.to_string(), "https://jihanki.sagase.com/jihanki/8/?ref=list");
    }
}
