use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("XML parsing error: {0}")]
    XmlError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unsupported filing type '{0}': supported filing types are 10-K and 10-Q")]
    UnsupportedFilingType(String),

    #[error("Invalid date '{0}': expected YYYYMMDD")]
    InvalidDate(String),

    #[error("Query encoding error: {0}")]
    UrlEncodeError(#[from] serde_urlencoded::ser::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for EdgarError {
    fn from(error: quick_xml::Error) -> Self {
        EdgarError::XmlError(error.to_string())
    }
}

impl EdgarError {
    /// Returns true for errors raised while validating configuration, before any request.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            EdgarError::ConfigError(_)
                | EdgarError::UnsupportedFilingType(_)
                | EdgarError::InvalidDate(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EdgarError>;
