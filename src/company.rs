//! Company name to CIK lookups.
//!
//! EDGAR identifies filers by their Central Index Key (CIK). The SEC publishes
//! `cik-lookup-data.txt`, a flat file of every filer name with its CIK. The file
//! is large and changes rarely, so it is downloaded once and kept in a
//! [`CikRegistry`] owned by the [`Edgar`] client. Every clone of the client shares
//! the same registry; call [`CompanyOperations::reload_cik_registry`] to pick up a
//! newer copy.

use super::CompanyOperations;
use super::Edgar;
use super::error::Result;
use crate::parsing::cik_lookup::parse_cik_lookup;
use crate::parsing::utils::decode_latin1;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Immutable snapshot of the lookup file, keyed by company name.
pub type CikMap = HashMap<String, String>;

/// Lazily loaded name to CIK mapping.
///
/// The cache starts empty and is filled by the first [`load`](CikRegistry::load).
/// The async mutex is held across the download, so concurrent first calls result
/// in a single request and all callers receive the same snapshot.
#[derive(Debug, Default)]
pub struct CikRegistry {
    entries: Mutex<Option<Arc<CikMap>>>,
}

impl CikRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached mapping, downloading it on first use.
    pub async fn load(&self, edgar: &Edgar) -> Result<Arc<CikMap>> {
        let mut entries = self.entries.lock().await;
        if let Some(cached) = entries.as_ref() {
            return Ok(Arc::clone(cached));
        }
        let fresh = Arc::new(fetch_cik_map(edgar).await?);
        *entries = Some(Arc::clone(&fresh));
        Ok(fresh)
    }

    /// Downloads the mapping again and replaces the cached copy.
    ///
    /// On failure the previous copy, if any, is kept.
    pub async fn reload(&self, edgar: &Edgar) -> Result<Arc<CikMap>> {
        let mut entries = self.entries.lock().await;
        let fresh = Arc::new(fetch_cik_map(edgar).await?);
        *entries = Some(Arc::clone(&fresh));
        Ok(fresh)
    }

    /// The cached mapping, without triggering a download.
    pub async fn cached(&self) -> Option<Arc<CikMap>> {
        self.entries.lock().await.clone()
    }

    /// Entries whose name contains `query`, ignoring case.
    pub fn search(map: &CikMap, query: &str) -> CikMap {
        let query = query.to_lowercase();
        map.iter()
            .filter(|(name, _)| name.to_lowercase().contains(&query))
            .map(|(name, cik)| (name.clone(), cik.clone()))
            .collect()
    }
}

async fn fetch_cik_map(edgar: &Edgar) -> Result<CikMap> {
    let bytes = edgar.get_bytes(edgar.cik_lookup_url()).await?;
    let content = decode_latin1(&bytes);
    let map: CikMap = parse_cik_lookup(&content)
        .into_iter()
        .map(|entry| (entry.name, entry.cik))
        .collect();
    tracing::info!("Loaded {} company names from the CIK lookup file", map.len());
    Ok(map)
}

/// Registry lookups for the Edgar client.
///
/// # Examples
///
/// ```ignore
/// # use edgar_clerk::{Edgar, CompanyOperations};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let edgar = Edgar::new("MyApp/1.0", "contact@example.com")?;
///
/// for (name, cik) in edgar.cik_lookup("apple inc").await? {
///     println!("{name}: {cik}");
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Loading fails with `EdgarError::RequestError` on transport failures and with
/// `EdgarError::NotFound` / `EdgarError::InvalidResponse` when the lookup file
/// cannot be downloaded. Nothing is retried.
#[async_trait]
impl CompanyOperations for Edgar {
    async fn cik_registry(&self) -> Result<Arc<CikMap>> {
        self.cik_registry.load(self).await
    }

    async fn reload_cik_registry(&self) -> Result<Arc<CikMap>> {
        self.cik_registry.reload(self).await
    }

    async fn cik_lookup(&self, query: &str) -> Result<CikMap> {
        let map = self.cik_registry().await?;
        Ok(CikRegistry::search(&map, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CikMap {
        [
            ("APPLE INC.", "0000320193"),
            ("APPLE HOSPITALITY REIT, INC.", "0001418121"),
            ("PINEAPPLE EXPRESS, INC.", "0001654672"),
            ("MICROSOFT CORP", "0000789019"),
        ]
        .into_iter()
        .map(|(name, cik)| (name.to_string(), cik.to_string()))
        .collect()
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let found = CikRegistry::search(&sample(), "Apple");
        assert_eq!(found.len(), 3);
        assert_eq!(found["APPLE INC."], "0000320193");
        assert!(found.contains_key("PINEAPPLE EXPRESS, INC."));
        assert!(!found.contains_key("MICROSOFT CORP"));
    }

    #[test]
    fn test_search_no_match() {
        assert!(CikRegistry::search(&sample(), "berkshire").is_empty());
    }

    #[tokio::test]
    async fn test_registry_starts_empty() {
        let registry = CikRegistry::new();
        assert!(registry.cached().await.is_none());
    }
}
