//! From a company's filing list to the values in its XBRL instance documents.
//!
//! The pipeline scrapes three kinds of EDGAR pages, one request at a time:
//!
//! 1. the company browse page, which links to every filing's documents page;
//! 2. each documents page, which gives the period of report, the filing date and
//!    the link to the XBRL instance document;
//! 3. each instance document, from which the requested facts are read.
//!
//! A page or document answering with a non-success status is skipped, as is a
//! page missing the structure we look for. Only transport failures abort a run.
//!
//! A period can be reported more than once when a filing is amended. While
//! resolving, the filing with the latest filing date wins for each period. Dates
//! are compared as the strings shown on the documents page, which EDGAR prints
//! in sortable `YYYY-MM-DD` form.

use super::Edgar;
use super::error::{EdgarError, Result};
use super::options::{AmendmentPolicy, FilingType};
use super::parsing::browse::documents_page_hrefs;
use super::parsing::documents::DocumentsPage;
use super::parsing::instance::{self, PERIOD_END_TAG};
use super::table::{DATE_COLUMN, FieldValue, FilingRecord, FilingTable};
use super::traits::FilingOperations;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// The instance document chosen for one reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFiling {
    pub period_of_report: String,
    pub instance_url: String,
    /// Empty when the documents page did not show a filing date.
    pub filing_date: String,
}

/// What happened to a documents page during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Unavailable (non-success status)
    Unavailable,
    /// No period of report on the page
    NoPeriod,
    /// Amended filing skipped under [`AmendmentPolicy::Exclude`]
    Amendment,
    /// A later filing for the same period was already resolved
    Superseded,
    /// No "Data Files" table, typically a pre-XBRL filing
    NoDataFiles,
    /// "Data Files" table without a linked instance document
    NoInstanceDocument,
    Resolved,
}

/// Resolved filings keyed by period of report, in first-seen order.
///
/// Replacing the filing of a period keeps the period's original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedFilings {
    filings: Vec<ResolvedFiling>,
}

impl ResolvedFilings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, period_of_report: &str) -> Option<&ResolvedFiling> {
        self.filings
            .iter()
            .find(|f| f.period_of_report == period_of_report)
    }

    /// True when the period already has a filing dated strictly after `filing_date`.
    pub fn is_superseded(&self, period_of_report: &str, filing_date: &str) -> bool {
        self.get(period_of_report)
            .is_some_and(|existing| filing_date < existing.filing_date.as_str())
    }

    /// Inserts a filing, replacing any filing already stored for its period.
    pub fn upsert(&mut self, filing: ResolvedFiling) {
        match self
            .filings
            .iter_mut()
            .find(|f| f.period_of_report == filing.period_of_report)
        {
            Some(existing) => *existing = filing,
            None => self.filings.push(filing),
        }
    }

    /// Applies one parsed documents page.
    ///
    /// `base_url` is prefixed to the instance document's site-relative href.
    pub fn apply(
        &mut self,
        page: &DocumentsPage,
        policy: AmendmentPolicy,
        base_url: &str,
    ) -> PageOutcome {
        let Some(period) = page.period_of_report.as_deref() else {
            return PageOutcome::NoPeriod;
        };
        if policy == AmendmentPolicy::Exclude && page.is_amendment() {
            return PageOutcome::Amendment;
        }
        let filing_date = page.filing_date.as_deref().unwrap_or_default();
        if self.is_superseded(period, filing_date) {
            return PageOutcome::Superseded;
        }
        if page.data_files.is_none() {
            return PageOutcome::NoDataFiles;
        }
        let Some(href) = page.instance_document_href() else {
            return PageOutcome::NoInstanceDocument;
        };

        self.upsert(ResolvedFiling {
            period_of_report: period.to_string(),
            instance_url: format!("{}{}", base_url, href),
            filing_date: filing_date.to_string(),
        });
        PageOutcome::Resolved
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedFiling> {
        self.filings.iter()
    }

    pub fn len(&self) -> usize {
        self.filings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filings.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResolvedFilings {
    type Item = &'a ResolvedFiling;
    type IntoIter = std::slice::Iter<'a, ResolvedFiling>;

    fn into_iter(self) -> Self::IntoIter {
        self.filings.iter()
    }
}

/// Removes repeated tags, keeping the first occurrence.
pub(crate) fn dedup_tags(tags: &[&str]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.iter().any(|t| t == tag) {
            unique.push(tag.to_string());
        }
    }
    unique
}

/// Rejects tags that would collide with the `date` column.
pub(crate) fn check_tags(tags: &[&str]) -> Result<()> {
    match tags.iter().find(|tag| **tag == DATE_COLUMN) {
        Some(tag) => Err(EdgarError::ConfigError(format!(
            "Tag '{}' is reserved for the period end date column",
            tag
        ))),
        None => Ok(()),
    }
}

/// Builds a record from an instance document.
///
/// Returns `Ok(None)` when the document has no period end date, or only
/// whitespace in it.
///
/// # Errors
///
/// `EdgarError::ConfigError` when a tag is named `date`, and
/// `EdgarError::XmlError` for a document the reader cannot get through.
pub fn record_from_instance(content: &str, tags: &[&str]) -> Result<Option<FilingRecord>> {
    check_tags(tags)?;
    let tags = dedup_tags(tags);
    let mut lookup: Vec<&str> = Vec::with_capacity(tags.len() + 1);
    lookup.push(PERIOD_END_TAG);
    lookup.extend(tags.iter().map(String::as_str));

    let texts = instance::first_texts(content, &lookup)?;

    let date = match texts.get(PERIOD_END_TAG).map(|d| d.trim()) {
        Some(date) if !date.is_empty() => date.to_string(),
        _ => return Ok(None),
    };

    let values = tags
        .into_iter()
        .map(|tag| {
            let value = FieldValue::parse(texts.get(&tag.to_ascii_lowercase()).map(String::as_str));
            (tag, value)
        })
        .collect();

    Ok(Some(FilingRecord { date, values }))
}

impl Edgar {
    fn browse_query(&self, cik: &str, filing_type: FilingType) -> Result<String> {
        let params = [
            ("action", "getcompany"),
            ("CIK", cik),
            ("type", filing_type.as_str()),
        ];
        Ok(format!(
            "{}?{}",
            self.edgar_browse_url,
            serde_urlencoded::to_string(params)?
        ))
    }
}

/// Filing operations for SEC EDGAR.
///
/// # Examples
///
/// ```ignore
/// use edgar_clerk::{Edgar, FilingOperations, FilingType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let edgar = Edgar::new("MyApp/1.0", "contact@example.com")?;
///     let table = edgar
///         .filing_data("0000320193", FilingType::Form10K, &["us-gaap:revenues"])
///         .await?;
///     println!("{}", table.to_json()?);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// Every method returns `EdgarError::RequestError` on transport failures.
/// Methods taking tags return `EdgarError::ConfigError`, before any request,
/// when a tag is named `date`. A
/// non-success status or a page that cannot be understood is logged and
/// skipped, never reported as an error.
#[async_trait]
impl FilingOperations for Edgar {
    /// Fetches the company browse page for one filing type.
    ///
    /// The "as of" date and count parameters of the browse endpoint are not sent,
    /// so EDGAR returns its first page of results (up to 40 filings).
    async fn documents_page_links(
        &self,
        cik: &str,
        filing_type: FilingType,
    ) -> Result<Vec<String>> {
        let url = self.browse_query(cik, filing_type)?;
        let Some(content) = self.try_get(&url).await? else {
            tracing::warn!(
                "Browse page for CIK {} ({}) unavailable; no filings listed",
                cik,
                filing_type
            );
            return Ok(Vec::new());
        };

        let links: Vec<String> = documents_page_hrefs(&content)
            .iter()
            .map(|href| self.absolute_url(href))
            .collect();
        tracing::info!(
            "Found {} {} documents pages for CIK {}",
            links.len(),
            filing_type,
            cik
        );
        Ok(links)
    }

    async fn documents_page_links_by_type(
        &self,
        cik: &str,
        filing_types: &[FilingType],
    ) -> Result<HashMap<FilingType, Vec<String>>> {
        let mut links = HashMap::new();
        for filing_type in filing_types {
            let type_links = self.documents_page_links(cik, *filing_type).await?;
            links.insert(*filing_type, type_links);
        }
        Ok(links)
    }

    async fn documents_page(&self, url: &str) -> Result<Option<DocumentsPage>> {
        Ok(self
            .try_get(url)
            .await?
            .map(|content| DocumentsPage::parse(&content)))
    }

    /// Walks the documents pages in order and keeps, for each period of report,
    /// the instance document of the latest filing.
    ///
    /// A page dated before the filing already kept for its period is skipped;
    /// a page dated the same or later replaces it.
    async fn resolve_filings(
        &self,
        links: &[String],
        policy: AmendmentPolicy,
    ) -> Result<ResolvedFilings> {
        let mut resolved = ResolvedFilings::new();

        for link in links {
            let outcome = match self.documents_page(link).await? {
                Some(page) => resolved.apply(&page, policy, &self.edgar_www_url),
                None => PageOutcome::Unavailable,
            };
            tracing::debug!("Documents page {}: {:?}", link, outcome);
        }

        tracing::info!(
            "Resolved {} filings from {} documents pages",
            resolved.len(),
            links.len()
        );
        Ok(resolved)
    }

    async fn extract_filing(&self, url: &str, tags: &[&str]) -> Result<Option<FilingRecord>> {
        check_tags(tags)?;
        let Some(content) = self.try_get(url).await? else {
            return Ok(None);
        };

        match record_from_instance(&content, tags) {
            Ok(Some(record)) => Ok(Some(record)),
            Ok(None) => {
                tracing::debug!("Skipping {}: no {} element", url, PERIOD_END_TAG);
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Skipping malformed instance document {}: {}", url, e);
                Ok(None)
            }
        }
    }

    async fn filing_table(&self, filings: &ResolvedFilings, tags: &[&str]) -> Result<FilingTable> {
        check_tags(tags)?;
        let mut rows = Vec::new();
        for filing in filings {
            if let Some(record) = self.extract_filing(&filing.instance_url, tags).await? {
                rows.push(record);
            }
        }

        tracing::info!(
            "Extracted {} of {} filings",
            rows.len(),
            filings.len()
        );
        Ok(FilingTable::from_records(&dedup_tags(tags), rows))
    }

    async fn filing_data(
        &self,
        cik: &str,
        filing_type: FilingType,
        tags: &[&str],
    ) -> Result<FilingTable> {
        check_tags(tags)?;
        let links = self.documents_page_links(cik, filing_type).await?;
        let filings = self
            .resolve_filings(&links, AmendmentPolicy::default())
            .await?;
        self.filing_table(&filings, tags).await
    }

    /// Collects element names from the first `num_links` instance documents
    /// (at least one). Unavailable or malformed documents are skipped.
    async fn unique_tags(
        &self,
        filings: &ResolvedFilings,
        num_links: usize,
    ) -> Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for filing in filings.iter().take(num_links.max(1)) {
            let Some(content) = self.try_get(&filing.instance_url).await? else {
                continue;
            };
            match instance::tag_names(&content) {
                Ok(found) => names.extend(found),
                Err(e) => tracing::warn!(
                    "Skipping malformed instance document {}: {}",
                    filing.instance_url,
                    e
                ),
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.sec.gov";

    fn page(period: Option<&str>, filing_date: Option<&str>, href: Option<&str>) -> DocumentsPage {
        DocumentsPage {
            period_of_report: period.map(str::to_string),
            filing_date: filing_date.map(str::to_string),
            form_name: Some("Form 10-K - Annual report".to_string()),
            data_files: href.map(|h| {
                vec![crate::parsing::documents::DataFileRow {
                    description: "XBRL INSTANCE DOCUMENT".to_string(),
                    href: Some(h.to_string()),
                }]
            }),
        }
    }

    #[test]
    fn test_amendment_filed_later_replaces_original() {
        let mut resolved = ResolvedFilings::new();
        let original = page(Some("2022-12-31"), Some("20230101"), Some("/original.xml"));
        let amendment = page(Some("2022-12-31"), Some("20230201"), Some("/amended.xml"));

        assert_eq!(
            resolved.apply(&original, AmendmentPolicy::Supersede, BASE),
            PageOutcome::Resolved
        );
        assert_eq!(
            resolved.apply(&amendment, AmendmentPolicy::Supersede, BASE),
            PageOutcome::Resolved
        );

        assert_eq!(resolved.len(), 1);
        let filing = resolved.get("2022-12-31").unwrap();
        assert_eq!(filing.instance_url, "https://www.sec.gov/amended.xml");
        assert_eq!(filing.filing_date, "20230201");
    }

    #[test]
    fn test_earlier_original_after_amendment_is_skipped() {
        let mut resolved = ResolvedFilings::new();
        let amendment = page(Some("2022-12-31"), Some("20230201"), Some("/amended.xml"));
        let original = page(Some("2022-12-31"), Some("20230101"), Some("/original.xml"));

        resolved.apply(&amendment, AmendmentPolicy::Supersede, BASE);
        assert_eq!(
            resolved.apply(&original, AmendmentPolicy::Supersede, BASE),
            PageOutcome::Superseded
        );

        let filing = resolved.get("2022-12-31").unwrap();
        assert_eq!(filing.instance_url, "https://www.sec.gov/amended.xml");
    }

    #[test]
    fn test_equal_dates_keep_later_scanned() {
        let mut resolved = ResolvedFilings::new();
        resolved.apply(
            &page(Some("2022-12-31"), Some("20230101"), Some("/first.xml")),
            AmendmentPolicy::Supersede,
            BASE,
        );
        resolved.apply(
            &page(Some("2022-12-31"), Some("20230101"), Some("/second.xml")),
            AmendmentPolicy::Supersede,
            BASE,
        );
        assert_eq!(
            resolved.get("2022-12-31").unwrap().instance_url,
            "https://www.sec.gov/second.xml"
        );
    }

    #[test]
    fn test_replacement_keeps_position() {
        let mut resolved = ResolvedFilings::new();
        for (period, date, href) in [
            ("2022-12-31", "20230101", "/a.xml"),
            ("2021-12-31", "20220101", "/b.xml"),
            ("2022-12-31", "20230301", "/c.xml"),
        ] {
            resolved.apply(
                &page(Some(period), Some(date), Some(href)),
                AmendmentPolicy::Supersede,
                BASE,
            );
        }
        let periods: Vec<&str> = resolved
            .iter()
            .map(|f| f.period_of_report.as_str())
            .collect();
        assert_eq!(periods, vec!["2022-12-31", "2021-12-31"]);
        assert_eq!(resolved.iter().next().unwrap().instance_url, "https://www.sec.gov/c.xml");
    }

    #[test]
    fn test_missing_filing_date_sorts_lowest() {
        let mut resolved = ResolvedFilings::new();
        resolved.apply(
            &page(Some("2022-12-31"), Some("20230101"), Some("/dated.xml")),
            AmendmentPolicy::Supersede,
            BASE,
        );
        assert_eq!(
            resolved.apply(
                &page(Some("2022-12-31"), None, Some("/undated.xml")),
                AmendmentPolicy::Supersede,
                BASE,
            ),
            PageOutcome::Superseded
        );
    }

    #[test]
    fn test_skip_outcomes() {
        let mut resolved = ResolvedFilings::new();
        assert_eq!(
            resolved.apply(&page(None, Some("20230101"), Some("/a.xml")), AmendmentPolicy::Supersede, BASE),
            PageOutcome::NoPeriod
        );
        assert_eq!(
            resolved.apply(&page(Some("2000-12-31"), Some("20010301"), None), AmendmentPolicy::Supersede, BASE),
            PageOutcome::NoDataFiles
        );

        let mut amended = page(Some("2022-12-31"), Some("20230201"), Some("/amended.xml"));
        amended.form_name = Some("Form 10-K/A - Annual report [Amend]".to_string());
        assert_eq!(
            resolved.apply(&amended, AmendmentPolicy::Exclude, BASE),
            PageOutcome::Amendment
        );

        let mut unlinked = page(Some("2022-12-31"), Some("20230201"), Some("/x.xml"));
        unlinked.data_files = Some(Vec::new());
        assert_eq!(
            resolved.apply(&unlinked, AmendmentPolicy::Supersede, BASE),
            PageOutcome::NoInstanceDocument
        );

        assert!(resolved.is_empty());
        assert_eq!(
            resolved.apply(&amended, AmendmentPolicy::Supersede, BASE),
            PageOutcome::Resolved
        );
    }

    #[test]
    fn test_record_from_instance() {
        let xml = r#"<xbrl>
            <dei:DocumentPeriodEndDate>2022-09-24</dei:DocumentPeriodEndDate>
            <us-gaap:Revenues>394328000000</us-gaap:Revenues>
            <dei:AmendmentFlag>false</dei:AmendmentFlag>
        </xbrl>"#;
        let record = record_from_instance(
            xml,
            &["us-gaap:revenues", "dei:amendmentflag", "us-gaap:assets", "us-gaap:revenues"],
        )
        .unwrap()
        .unwrap();

        assert_eq!(record.date, "2022-09-24");
        assert_eq!(record.values.len(), 3);
        assert_eq!(
            record.get("us-gaap:revenues"),
            Some(&FieldValue::Number(394328000000.0))
        );
        assert_eq!(
            record.get("dei:amendmentflag"),
            Some(&FieldValue::Text("false".to_string()))
        );
        assert_eq!(record.get("us-gaap:assets"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_record_without_period_end_is_dropped() {
        let xml = "<xbrl><us-gaap:Revenues>1</us-gaap:Revenues></xbrl>";
        assert!(record_from_instance(xml, &["us-gaap:revenues"]).unwrap().is_none());

        let empty = "<xbrl><dei:DocumentPeriodEndDate></dei:DocumentPeriodEndDate></xbrl>";
        assert!(record_from_instance(empty, &[]).unwrap().is_none());

        let blank = "<xbrl><dei:DocumentPeriodEndDate>  </dei:DocumentPeriodEndDate></xbrl>";
        assert!(record_from_instance(blank, &[]).unwrap().is_none());
    }

    #[test]
    fn test_date_tag_is_rejected() {
        let xml = "<xbrl><dei:DocumentPeriodEndDate>2022-09-24</dei:DocumentPeriodEndDate><date>x</date></xbrl>";
        assert!(matches!(
            record_from_instance(xml, &["us-gaap:revenues", "date"]),
            Err(EdgarError::ConfigError(_))
        ));

        let record = record_from_instance(xml, &["DATE"]).unwrap().unwrap();
        let table = FilingTable::from_records(&["DATE"], vec![record]);
        assert_eq!(table.columns().len(), 2);
        assert_eq!(table.to_json().unwrap(), r#"[{"date":"2022-09-24","DATE":"x"}]"#);
    }

    #[test]
    fn test_browse_query() {
        let edgar = Edgar::new("test_agent", "me@example.com").unwrap();
        let url = edgar.browse_query("0000320193", FilingType::Form10K).unwrap();
        assert_eq!(
            url,
            "https://www.sec.gov/cgi-bin/browse-edgar?action=getcompany&CIK=0000320193&type=10-K"
        );
    }
}
