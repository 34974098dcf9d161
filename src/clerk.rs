//! Per-company façade over the filing pipeline.
//!
//! A [`FilingsClerk`] binds an [`Edgar`] client to one company and a set of filing
//! types. The expensive part of a run (walking every documents page) happens once,
//! on first use, and its result is reused by later calls on the same clerk.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::OnceCell;

use super::Edgar;
use super::error::{EdgarError, Result};
use super::filings::{ResolvedFilings, check_tags};
use super::options::{AmendmentPolicy, ClerkOptions, FilingType, parse_as_of, parse_filing_types};
use super::table::FilingTable;
use super::traits::FilingOperations;

/// Filing data for one company.
///
/// # Examples
///
/// ```ignore
/// use edgar_clerk::{ClerkOptions, Edgar, FilingType, FilingsClerk};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let edgar = Edgar::new("MyApp/1.0", "contact@example.com")?;
///     let options = ClerkOptions::new().with_filing_types(vec!["10-K".into(), "10-Q".into()]);
///     let clerk = FilingsClerk::new(edgar, "0000320193", options)?;
///
///     let annual = clerk.filing_data(Some(FilingType::Form10K), &["us-gaap:revenues"]).await?;
///     let quarterly = clerk.filing_data(Some(FilingType::Form10Q), &["us-gaap:revenues"]).await?;
///     println!("{} annual, {} quarterly", annual.len(), quarterly.len());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FilingsClerk {
    edgar: Edgar,
    cik: String,
    filing_types: Vec<FilingType>,
    limit: Option<usize>,
    as_of: NaiveDate,
    amendment_policy: AmendmentPolicy,
    resolved: OnceCell<HashMap<FilingType, ResolvedFilings>>,
}

impl FilingsClerk {
    /// Validates the options and builds a clerk. No request is made.
    ///
    /// # Errors
    ///
    /// `EdgarError::UnsupportedFilingType` for an unknown form code and
    /// `EdgarError::InvalidDate` for an "as of" date not in `YYYYMMDD` form.
    pub fn new(edgar: Edgar, cik: impl Into<String>, options: ClerkOptions) -> Result<Self> {
        let filing_types = parse_filing_types(&options.filing_types)?;
        let as_of = parse_as_of(options.as_of.as_deref())?;

        Ok(Self {
            edgar,
            cik: cik.into(),
            filing_types,
            limit: options.limit,
            as_of,
            amendment_policy: options.amendment_policy,
            resolved: OnceCell::new(),
        })
    }

    pub fn cik(&self) -> &str {
        &self.cik
    }

    pub fn filing_types(&self) -> &[FilingType] {
        &self.filing_types
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn amendment_policy(&self) -> AmendmentPolicy {
        self.amendment_policy
    }

    /// Replaces the configured filing types and drops any cached resolution.
    ///
    /// On error the clerk is left unchanged.
    pub fn set_filing_types<S: AsRef<str>>(&mut self, codes: &[S]) -> Result<()> {
        self.filing_types = parse_filing_types(codes)?;
        self.resolved = OnceCell::new();
        Ok(())
    }

    /// Resolved instance documents for every configured filing type.
    ///
    /// Resolved on first call; later calls return the cached result.
    pub async fn instance_documents(&self) -> Result<&HashMap<FilingType, ResolvedFilings>> {
        self.resolved
            .get_or_try_init(|| async {
                let links = self
                    .edgar
                    .documents_page_links_by_type(&self.cik, &self.filing_types)
                    .await?;

                let mut resolved = HashMap::with_capacity(self.filing_types.len());
                for filing_type in &self.filing_types {
                    let type_links = links.get(filing_type).map(Vec::as_slice).unwrap_or_default();
                    let filings = self
                        .edgar
                        .resolve_filings(type_links, self.amendment_policy)
                        .await?;
                    tracing::info!(
                        "Resolved {} {} filings for CIK {}",
                        filings.len(),
                        filing_type,
                        self.cik
                    );
                    resolved.insert(*filing_type, filings);
                }
                Ok::<_, EdgarError>(resolved)
            })
            .await
    }

    /// Resolved filings for one configured type (the first configured type when `None`).
    pub async fn resolved_filings(&self, filing_type: Option<FilingType>) -> Result<&ResolvedFilings> {
        let filing_type = self.configured(filing_type)?;
        let resolved = self.instance_documents().await?;
        resolved.get(&filing_type).ok_or_else(|| {
            EdgarError::ConfigError(format!("No filings resolved for {}", filing_type))
        })
    }

    /// Extracts `tags` from every resolved filing of one type into a table.
    ///
    /// # Errors
    ///
    /// `EdgarError::ConfigError` when `filing_type` is not one of the configured
    /// types or a tag is named `date`. Both checks happen before any request.
    pub async fn filing_data(
        &self,
        filing_type: Option<FilingType>,
        tags: &[&str],
    ) -> Result<FilingTable> {
        check_tags(tags)?;
        let filings = self.resolved_filings(filing_type).await?;
        self.edgar.filing_table(filings, tags).await
    }

    /// Distinct element names in the first `num_links` instance documents of one type.
    pub async fn unique_tags(
        &self,
        filing_type: Option<FilingType>,
        num_links: usize,
    ) -> Result<BTreeSet<String>> {
        let filings = self.resolved_filings(filing_type).await?;
        self.edgar.unique_tags(filings, num_links).await
    }

    fn configured(&self, filing_type: Option<FilingType>) -> Result<FilingType> {
        match filing_type {
            None => self.filing_types.first().copied().ok_or_else(|| {
                EdgarError::ConfigError("No filing types configured".to_string())
            }),
            Some(t) if self.filing_types.contains(&t) => Ok(t),
            Some(t) => Err(EdgarError::ConfigError(format!(
                "Filing type {} is not configured for this clerk",
                t
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edgar() -> Edgar {
        Edgar::new("test_agent", "me@example.com").unwrap()
    }

    #[test]
    fn test_defaults() {
        let clerk = FilingsClerk::new(edgar(), "0000320193", ClerkOptions::new()).unwrap();
        assert_eq!(clerk.cik(), "0000320193");
        assert_eq!(clerk.filing_types(), &[FilingType::Form10K]);
        assert_eq!(clerk.limit(), None);
        assert_eq!(clerk.amendment_policy(), AmendmentPolicy::Supersede);
    }

    #[test]
    fn test_invalid_options_fail_before_requests() {
        let bad_type = ClerkOptions::new().with_filing_types(vec!["10-K".into(), "8-K".into()]);
        assert!(matches!(
            FilingsClerk::new(edgar(), "0000320193", bad_type),
            Err(EdgarError::UnsupportedFilingType(code)) if code == "8-K"
        ));

        let bad_date = ClerkOptions::new().with_as_of("2023-01-01");
        let err = FilingsClerk::new(edgar(), "0000320193", bad_date).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_as_of_and_limit_are_kept() {
        let options = ClerkOptions::new().with_as_of("20230115").with_limit(5);
        let clerk = FilingsClerk::new(edgar(), "0000320193", options).unwrap();
        assert_eq!(clerk.as_of(), NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
        assert_eq!(clerk.limit(), Some(5));
    }

    #[test]
    fn test_set_filing_types() {
        let mut clerk = FilingsClerk::new(edgar(), "0000320193", ClerkOptions::new()).unwrap();
        clerk.set_filing_types(&["10-q", "10-K"]).unwrap();
        assert_eq!(clerk.filing_types(), &[FilingType::Form10Q, FilingType::Form10K]);

        assert!(clerk.set_filing_types(&["20-F"]).is_err());
        assert_eq!(clerk.filing_types(), &[FilingType::Form10Q, FilingType::Form10K]);
    }

    #[test]
    fn test_configured_type() {
        let clerk = FilingsClerk::new(edgar(), "0000320193", ClerkOptions::new()).unwrap();
        assert_eq!(clerk.configured(None).unwrap(), FilingType::Form10K);
        assert!(matches!(
            clerk.configured(Some(FilingType::Form10Q)),
            Err(EdgarError::ConfigError(_))
        ));
    }
}
