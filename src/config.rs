use std::time::Duration;

/// Environment variable read by [`EdgarConfig::from_env`] for the `User-Agent` header.
pub const USER_AGENT_ENV: &str = "EDGAR_USER_AGENT";
/// Environment variable read by [`EdgarConfig::from_env`] for the `From` header.
pub const FROM_ENV: &str = "EDGAR_FROM";

/// Configuration for the Edgar client
#[derive(Debug, Clone)]
pub struct EdgarConfig {
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// Contact email sent in the `From` header
    pub from: String,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Base URLs for the EDGAR endpoints used by the clerk
    pub base_urls: EdgarUrls,
}

/// Base URLs for the EDGAR endpoints
#[derive(Debug, Clone)]
pub struct EdgarUrls {
    /// Site root, prefixed to the relative links found on EDGAR pages
    pub www: String,
    /// Company browse endpoint listing a filer's filings
    pub browse: String,
    /// Flat file mapping company names to CIKs
    pub cik_lookup: String,
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            user_agent: "edgar_clerk/0.1.0".to_string(),
            from: String::new(),
            timeout: Duration::from_secs(30),
            base_urls: EdgarUrls::default(),
        }
    }
}

impl EdgarConfig {
    /// Creates a new EdgarConfig with custom settings
    ///
    /// # Basic usage
    ///
    /// ```rust
    /// use edgar_clerk::{Edgar, EdgarConfig};
    /// use std::time::Duration;
    ///
    /// let config = EdgarConfig::new(
    ///     "YourAppName/1.0",
    ///     "contact@example.com",
    ///     Duration::from_secs(30),
    ///     None,
    /// );
    /// let edgar = Edgar::with_config(config)?;
    /// # Ok::<(), edgar_clerk::EdgarError>(())
    /// ```
    pub fn new(
        user_agent: impl Into<String>,
        from: impl Into<String>,
        timeout: Duration,
        base_urls: Option<EdgarUrls>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            from: from.into(),
            timeout,
            base_urls: base_urls.unwrap_or_default(),
        }
    }

    /// Builds a configuration from `EDGAR_USER_AGENT` and `EDGAR_FROM`.
    ///
    /// Missing variables fall back to the defaults, which the SEC will most likely
    /// reject. The client logs a warning when the `From` header ends up empty.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            user_agent: std::env::var(USER_AGENT_ENV).unwrap_or(defaults.user_agent),
            from: std::env::var(FROM_ENV).unwrap_or(defaults.from),
            ..defaults
        }
    }
}

impl Default for EdgarUrls {
    fn default() -> Self {
        Self {
            www: "https://www.sec.gov".to_string(),
            browse: "https://www.sec.gov/cgi-bin/browse-edgar".to_string(),
            cik_lookup: "https://www.sec.gov/Archives/edgar/cik-lookup-data.txt".to_string(),
        }
    }
}

impl EdgarUrls {
    /// Points every endpoint at the same host, keeping the sec.gov paths.
    ///
    /// Handy for running against a local mock server.
    pub fn from_base(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            browse: format!("{}/cgi-bin/browse-edgar", base),
            cik_lookup: format!("{}/Archives/edgar/cik-lookup-data.txt", base),
            www: base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_from_base() {
        let urls = EdgarUrls::from_base("http://127.0.0.1:8080/");
        assert_eq!(urls.www, "http://127.0.0.1:8080");
        assert_eq!(urls.browse, "http://127.0.0.1:8080/cgi-bin/browse-edgar");
        assert_eq!(
            urls.cik_lookup,
            "http://127.0.0.1:8080/Archives/edgar/cik-lookup-data.txt"
        );
    }

    #[test]
    fn test_default_urls_point_at_sec() {
        let urls = EdgarUrls::default();
        assert_eq!(urls.www, "https://www.sec.gov");
        assert!(urls.browse.starts_with(&urls.www));
        assert!(urls.cik_lookup.starts_with(&urls.www));
    }
}
