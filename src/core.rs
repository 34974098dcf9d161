use reqwest::header::{FROM, HeaderMap, HeaderValue, USER_AGENT};
use std::sync::Arc;
use std::time::Duration;

use super::company::CikRegistry;
use super::config::{EdgarConfig, EdgarUrls};
use super::error::{EdgarError, Result};

#[derive(Debug, Clone)]
pub struct Edgar {
    /// HTTP client carrying the identification headers
    pub(crate) client: reqwest::Client,

    /// Name to CIK registry shared by every clone of this client
    pub(crate) cik_registry: Arc<CikRegistry>,

    /// Site root prefixed to relative EDGAR links
    pub(crate) edgar_www_url: String,

    /// Company browse endpoint
    pub(crate) edgar_browse_url: String,

    /// Location of the CIK lookup flat file
    pub(crate) edgar_cik_lookup_url: String,
}

/// HTTP client for the SEC EDGAR pages the clerk scrapes.
///
/// The `Edgar` client is the entry point of the crate. It owns a `reqwest` client
/// configured with the `User-Agent` and `From` headers the SEC requires from
/// automated tools, a request timeout, and the base URLs of the three EDGAR
/// endpoints involved: the company browse page, filing documents pages with their
/// XBRL instance documents, and the CIK lookup file.
///
/// Requests are issued one at a time and are never retried. A transport failure
/// (DNS, TLS, connection reset, timeout) is returned as
/// [`EdgarError::RequestError`]. How a non-success status is treated depends on
/// the caller: [`Edgar::get_bytes`] turns it into an error while [`Edgar::try_get`]
/// reports it as `None` so scraping loops can skip the page and move on.
///
/// # Examples
///
/// Basic client initialization:
///
/// ```rust
/// # use edgar_clerk::Edgar;
/// let edgar = Edgar::new("my_app/1.0", "me@example.com")?;
/// # Ok::<(), edgar_clerk::EdgarError>(())
/// ```
///
/// With custom configuration:
///
/// ```rust
/// # use edgar_clerk::{Edgar, EdgarConfig, EdgarUrls};
/// # use std::time::Duration;
/// let config = EdgarConfig {
///     user_agent: "custom_app/2.0".to_string(),
///     from: "me@example.com".to_string(),
///     timeout: Duration::from_secs(60),
///     base_urls: EdgarUrls::default(),
/// };
/// let edgar = Edgar::with_config(config)?;
/// # Ok::<(), edgar_clerk::EdgarError>(())
/// ```
impl Edgar {
    /// Creates a new Edgar client with sensible defaults.
    ///
    /// Uses a 30-second timeout and the standard SEC.gov URLs.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - A descriptive identifier for your application.
    /// * `from` - A contact email address. The SEC uses it to reach you if your
    ///   tool causes issues.
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::ConfigError` if either header value is not a valid
    /// HTTP header or the HTTP client cannot be constructed.
    pub fn new(user_agent: &str, from: &str) -> Result<Self> {
        let config = EdgarConfig {
            user_agent: user_agent.to_string(),
            from: from.to_string(),
            timeout: Duration::from_secs(30),
            base_urls: EdgarUrls::default(),
        };
        Self::with_config(config)
    }

    /// Creates an Edgar client with custom configuration settings.
    ///
    /// Use this constructor to change the timeout or to point the client at a
    /// different host, for example a mock server in tests.
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::ConfigError` if a header value is malformed or the HTTP
    /// client cannot be built with the provided configuration.
    pub fn with_config(config: EdgarConfig) -> Result<Self> {
        if config.from.trim().is_empty() {
            tracing::warn!(
                "No contact address configured for the From header; SEC.gov may reject requests"
            );
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| EdgarError::ConfigError(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(
            FROM,
            HeaderValue::from_str(&config.from)
                .map_err(|e| EdgarError::ConfigError(format!("Invalid From header: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| EdgarError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Edgar {
            client,
            cik_registry: Arc::new(CikRegistry::new()),
            edgar_www_url: config.base_urls.www.trim_end_matches('/').to_string(),
            edgar_browse_url: config.base_urls.browse,
            edgar_cik_lookup_url: config.base_urls.cik_lookup,
        })
    }

    /// Replaces the client's CIK registry with a shared one.
    ///
    /// Clones of a client already share their registry. Use this to share a single
    /// cache between clients that were configured independently.
    pub fn with_cik_registry(mut self, registry: Arc<CikRegistry>) -> Self {
        self.cik_registry = registry;
        self
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        tracing::debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .await
            .map_err(EdgarError::RequestError)
    }

    /// Fetches binary data from a URL, failing on any non-success status.
    ///
    /// Used for resources whose encoding is not declared reliably, such as the
    /// latin-1 CIK lookup file.
    ///
    /// # Errors
    ///
    /// * `EdgarError::NotFound` - Resource doesn't exist (HTTP 404)
    /// * `EdgarError::InvalidResponse` - Any other non-success status, with a preview of the body
    /// * `EdgarError::RequestError` - Transport failure
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.send(url).await?;
        let status = response.status();

        match status {
            s if s.is_success() => response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(EdgarError::RequestError),
            reqwest::StatusCode::NOT_FOUND => Err(EdgarError::NotFound),
            other_status => {
                let error_body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to read error body".to_string());

                Err(EdgarError::InvalidResponse(format!(
                    "Unexpected status code: {} for URL: {}. Response preview: {}",
                    other_status,
                    url,
                    error_body.chars().take(200).collect::<String>()
                )))
            }
        }
    }

    /// Fetches text content, reporting a non-success status as `Ok(None)`.
    ///
    /// Scraping loops use this to skip an unavailable page without aborting the
    /// whole run. Transport failures are still returned as errors.
    pub async fn try_get(&self, url: &str) -> Result<Option<String>> {
        let response = self.send(url).await?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!("Skipping {}: status {}", url, status);
            return Ok(None);
        }

        response
            .text()
            .await
            .map(Some)
            .map_err(EdgarError::RequestError)
    }

    /// Turns a site-relative href into an absolute URL.
    pub(crate) fn absolute_url(&self, href: &str) -> String {
        format!("{}{}", self.edgar_www_url, href)
    }

    /// Returns the site root prefixed to relative EDGAR links.
    pub fn www_url(&self) -> &str {
        &self.edgar_www_url
    }

    /// Returns the company browse endpoint.
    pub fn browse_url(&self) -> &str {
        &self.edgar_browse_url
    }

    /// Returns the location of the CIK lookup file.
    pub fn cik_lookup_url(&self) -> &str {
        &self.edgar_cik_lookup_url
    }
}
