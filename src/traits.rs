//! Trait definitions organizing EDGAR operations by area.
//!
//! The clerk's work splits into two domains: resolving company names to CIKs and
//! walking a company's filings down to the values in their XBRL instance
//! documents. The `Edgar` client implements both traits.
//!
//! Users typically interact with the `Edgar` struct or a
//! [`FilingsClerk`](crate::FilingsClerk) directly, but the traits make the API
//! surface easy to discover and to substitute in tests.

use super::company::CikMap;
use super::error::Result;
use super::filings::ResolvedFilings;
use super::options::{AmendmentPolicy, FilingType};
use super::parsing::documents::DocumentsPage;
use super::table::{FilingRecord, FilingTable};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Operations on the company name to CIK registry.
#[async_trait]
pub trait CompanyOperations {
    /// Returns the name to CIK mapping, downloading it on first use.
    async fn cik_registry(&self) -> Result<Arc<CikMap>>;
    /// Downloads the mapping again and replaces the cached copy.
    async fn reload_cik_registry(&self) -> Result<Arc<CikMap>>;
    /// Returns the entries whose name contains `query`, ignoring case.
    async fn cik_lookup(&self, query: &str) -> Result<CikMap>;
}

/// Operations for walking a company's filings down to their XBRL values.
///
/// The steps can be driven one by one or through
/// [`filing_data`](FilingOperations::filing_data), which runs the whole pipeline
/// for a single filing type.
#[async_trait]
pub trait FilingOperations {
    /// Absolute URLs of the documents pages listed on a company's browse page.
    async fn documents_page_links(&self, cik: &str, filing_type: FilingType)
    -> Result<Vec<String>>;
    /// Documents page links for several filing types, keyed by type.
    async fn documents_page_links_by_type(
        &self,
        cik: &str,
        filing_types: &[FilingType],
    ) -> Result<HashMap<FilingType, Vec<String>>>;
    /// Fetches and parses a documents page. `None` when the page is unavailable.
    async fn documents_page(&self, url: &str) -> Result<Option<DocumentsPage>>;
    /// Resolves documents pages to one instance document per reporting period.
    async fn resolve_filings(
        &self,
        links: &[String],
        policy: AmendmentPolicy,
    ) -> Result<ResolvedFilings>;
    /// Extracts the requested tags from an instance document.
    async fn extract_filing(&self, url: &str, tags: &[&str]) -> Result<Option<FilingRecord>>;
    /// Extracts the requested tags from every resolved filing into a table.
    async fn filing_table(&self, filings: &ResolvedFilings, tags: &[&str])
    -> Result<FilingTable>;
    /// Runs the full pipeline for one company and filing type.
    async fn filing_data(
        &self,
        cik: &str,
        filing_type: FilingType,
        tags: &[&str],
    ) -> Result<FilingTable>;
    /// Distinct element names found in the first `num_links` instance documents.
    async fn unique_tags(
        &self,
        filings: &ResolvedFilings,
        num_links: usize,
    ) -> Result<BTreeSet<String>>;
}
