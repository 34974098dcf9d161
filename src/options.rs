use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use super::error::{EdgarError, Result};

/// Filing types whose documents pages carry a "Data Files" table with an XBRL
/// instance document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilingType {
    /// Annual report
    Form10K,
    /// Quarterly report
    Form10Q,
}

impl FilingType {
    pub const VARIANTS: &'static [(&'static str, FilingType)] =
        &[("10-K", FilingType::Form10K), ("10-Q", FilingType::Form10Q)];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilingType::Form10K => "10-K",
            FilingType::Form10Q => "10-Q",
        }
    }
}

impl Default for FilingType {
    fn default() -> Self {
        Self::Form10K
    }
}

impl fmt::Display for FilingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses an EDGAR form code. Only the exact codes in [`FilingType::VARIANTS`]
/// are accepted, ignoring surrounding whitespace and case.
impl FromStr for FilingType {
    type Err = EdgarError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        Self::VARIANTS
            .iter()
            .find(|(pattern, _)| pattern.eq_ignore_ascii_case(code))
            .map(|(_, variant)| *variant)
            .ok_or_else(|| EdgarError::UnsupportedFilingType(s.to_string()))
    }
}

/// How documents pages of amended filings (`10-K/A`, `10-Q/A`) are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmendmentPolicy {
    /// Keep amendments; for each reporting period the latest filed document wins.
    #[default]
    Supersede,
    /// Skip any documents page whose form name is marked `[Amend]`.
    Exclude,
}

/// Options for a [`FilingsClerk`](crate::FilingsClerk).
///
/// Codes are kept as strings here and validated when the clerk is built, so a
/// bad code fails before any request goes out.
#[derive(Debug, Clone, Default)]
pub struct ClerkOptions {
    pub filing_types: Vec<String>,
    pub limit: Option<usize>,
    /// "As of" date in `YYYYMMDD` form. Defaults to today.
    pub as_of: Option<String>,
    pub amendment_policy: AmendmentPolicy,
}

impl ClerkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filing_type(mut self, filing_type: impl Into<String>) -> Self {
        self.filing_types = vec![filing_type.into()];
        self
    }

    pub fn with_filing_types(mut self, filing_types: Vec<String>) -> Self {
        self.filing_types = filing_types;
        self
    }

    /// Stored on the clerk; filings are not truncated to it.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Stored on the clerk; filings are not filtered by it.
    pub fn with_as_of(mut self, as_of: impl Into<String>) -> Self {
        self.as_of = Some(as_of.into());
        self
    }

    pub fn with_amendment_policy(mut self, policy: AmendmentPolicy) -> Self {
        self.amendment_policy = policy;
        self
    }
}

/// Validates a list of form codes. An empty list selects 10-K.
pub(crate) fn parse_filing_types<S: AsRef<str>>(codes: &[S]) -> Result<Vec<FilingType>> {
    let mut filing_types = Vec::new();
    for code in codes.iter().map(AsRef::as_ref) {
        if code.trim().is_empty() {
            continue;
        }
        let filing_type = code.parse::<FilingType>()?;
        if !filing_types.contains(&filing_type) {
            filing_types.push(filing_type);
        }
    }
    if filing_types.is_empty() {
        filing_types.push(FilingType::default());
    }
    Ok(filing_types)
}

/// Parses a `YYYYMMDD` date, defaulting to today.
pub(crate) fn parse_as_of(as_of: Option<&str>) -> Result<NaiveDate> {
    match as_of {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y%m%d")
            .map_err(|_| EdgarError::InvalidDate(s.to_string())),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
