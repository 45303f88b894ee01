//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building one connection-pooling client with a fixed browser identity
//! - Bounded retries with a fixed delay between attempts
//! - Fetching page HTML and raw image bytes

use crate::config::{Config, UserAgentConfig};
use crate::crawler::scheduler::{pause, PolitenessDelays};
use crate::{ConfigError, JihankiError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Terminal failure of a request after every attempt was spent
///
/// Displays as the description of the last attempt's error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct FetchFailure {
    /// The URL that could not be fetched
    pub url: String,

    /// How many attempts were made
    pub attempts: u32,

    /// Description of the last error
    pub reason: String,
}

/// Result of a fetch operation
pub type FetchResult<T> = Result<T, FetchFailure>;

/// Builds an HTTP client with the configured identity and timeout
///
/// # Arguments
///
/// * `config` - The request identity (user agent and accepted content)
/// * `timeout` - Per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(JihankiError)` - A header value is invalid or the client failed to build
pub fn build_http_client(config: &UserAgentConfig, timeout: Duration) -> Result<Client, JihankiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, header_value("accept", &config.accept)?);
    headers.insert(ACCEPT_LANGUAGE, header_value("accept-language", &config.accept_language)?);

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value)
        .map_err(|e| ConfigError::Validation(format!("invalid {} header: {}", name, e)))
}

/// Runs `operation` up to `max_attempts` times, sleeping `delay` between tries
///
/// Every error is retried; the delay is only spent after a failed attempt
/// that will be followed by another one.
///
/// # Returns
///
/// * `Ok(T)` - The first successful result
/// * `Err(FetchFailure)` - Every attempt failed; carries the last error
pub async fn retry_with_delay<T, E, F, Fut>(
    url: &str,
    max_attempts: u32,
    delay: Duration,
    mut operation: F,
) -> FetchResult<T>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::warn!(
                    "Attempt {}/{} failed for {}: {}",
                    attempt,
                    max_attempts,
                    url,
                    err
                );

                if attempt >= max_attempts {
                    return Err(FetchFailure {
                        url: url.to_string(),
                        attempts: attempt,
                        reason: err.to_string(),
                    });
                }
            }
        }

        pause(delay).await;
        attempt += 1;
    }
}

/// The scraper's one outbound HTTP capability
///
/// Owns the connection-pooling client and the retry policy; every component
/// that issues requests borrows it.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_attempts: u32,
    delays: PolitenessDelays,
}

impl Fetcher {
    /// Creates a fetcher from the configuration
    pub fn new(config: &Config) -> Result<Self, JihankiError> {
        let timeout = Duration::from_millis(config.politeness.request_timeout_ms);
        let client = build_http_client(&config.user_agent, timeout)?;

        Ok(Self {
            client,
            max_attempts: config.politeness.max_attempts,
            delays: PolitenessDelays::from_config(&config.politeness),
        })
    }

    /// Fetches a page's HTML
    ///
    /// Timeouts, connection failures and non-2xx statuses are retried after
    /// the page retry delay.
    pub async fn fetch_page(&self, url: &str) -> FetchResult<String> {
        retry_with_delay(url, self.max_attempts, self.delays.page_retry(), || {
            self.get_text(url)
        })
        .await
    }

    /// Fetches an image body
    ///
    /// Same policy as [`Fetcher::fetch_page`] with half the retry delay.
    pub async fn fetch_bytes(&self, url: &str) -> FetchResult<Vec<u8>> {
        retry_with_delay(url, self.max_attempts, self.delays.image_retry(), || {
            self.get_bytes(url)
        })
        .await
    }

    async fn get_text(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.politeness.request_delay_ms = 0;
        config.politeness.page_jitter_ms = 0;
        config.politeness.request_timeout_ms = 500;
        config
    }

    #[test]
    fn test_build_http_client() {
        let config = UserAgentConfig::default();
        assert!(build_http_client(&config, Duration::from_secs(30)).is_ok());
    }

    #[test]
    fn test_invalid_header_value_is_a_config_error() {
        let mut config = UserAgentConfig::default();
        config.accept_language = "ja\nen".to_string();
        let result = build_http_client(&config, Duration::from_secs(30));
        assert!(matches!(
            result,
            Err(JihankiError::Config(ConfigError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_retry_succeeds_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = retry_with_delay("https://example.com/", 2, Duration::ZERO, || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, String>(7)
            }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_recovers_on_second_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = retry_with_delay("https://example.com/", 2, Duration::ZERO, || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("connection reset".to_string())
                } else {
                    Ok(1u32)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_reports_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result: FetchResult<()> =
            retry_with_delay("https://example.com/x", 2, Duration::ZERO, || {
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    Err(format!("failure {}", n + 1))
                }
            })
            .await;

        let failure = result.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(failure.attempts, 2);
        assert_eq!(failure.url, "https://example.com/x");
        assert_eq!(failure.to_string(), "failure 2");
    }

    #[tokio::test]
    async fn test_retry_waits_between_attempts_only() {
        let start = std::time::Instant::now();
        let _: FetchResult<()> =
            retry_with_delay("https://example.com/", 3, Duration::from_millis(30), || async {
                Err::<(), _>("down")
            })
            .await;
        // Two waits between three attempts
        assert!(start.elapsed() >= Duration::from_millis(60));

        let start = std::time::Instant::now();
        let _ = retry_with_delay("https://example.com/", 3, Duration::from_millis(500), || async {
            Ok::<(), String>(())
        })
        .await;
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_fetch_page_sends_identity_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jihanki/1/"))
            .and(header_exists("user-agent"))
            .and(header_exists("accept-language"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&fast_config()).unwrap();
        let body = fetcher
            .fetch_page(&format!("{}/jihanki/1/", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_page_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jihanki/2/"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&fast_config()).unwrap();
        let failure = fetcher
            .fetch_page(&format!("{}/jihanki/2/", server.uri()))
            .await
            .unwrap_err();
        assert_eq!(failure.attempts, 2);
        assert!(failure.reason.contains("503"));
    }

    #[tokio::test]
    async fn test_fetch_page_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html>late</html>")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&fast_config()).unwrap();
        let result = fetcher.fetch_page(&format!("{}/jihanki/3/", server.uri())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&fast_config()).unwrap();
        let bytes = fetcher
            .fetch_bytes(&format!("{}/a.png", server.uri()))
            .await
            .unwrap();
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
    }
}
