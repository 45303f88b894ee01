use serde::Deserialize;

/// Main configuration structure for Jihanki Scraper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub politeness: PolitenessConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Where the target site keeps its machine pages and photographs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Host (optionally with `:port`) that seed URLs must belong to
    pub host: String,

    /// Path segment preceding the numeric source id, e.g. `/jihanki/3492/`
    #[serde(rename = "machine-path")]
    pub machine_path: String,

    /// Path segment under which genuine machine photographs are hosted
    #[serde(rename = "uploads-path")]
    pub uploads_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: "jihanki.sagase.com".to_string(),
            machine_path: "jihanki".to_string(),
            uploads_path: "/uploads/jihanki/".to_string(),
        }
    }
}

/// Retry and pacing behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolitenessConfig {
    /// Base delay between requests (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Upper bound of the random jitter added between seed URLs (milliseconds)
    #[serde(rename = "page-jitter-ms")]
    pub page_jitter_ms: u64,

    /// Total attempts per request, including the first
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 2500,
            page_jitter_ms: 1500,
            max_attempts: 2,
            request_timeout_ms: 30_000,
        }
    }
}

/// Request identity sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub accept: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "ja,en-US;q=0.9,en;q=0.8".to_string(),
        }
    }
}
