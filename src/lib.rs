//! # edgar-clerk - XBRL financial data from SEC EDGAR filings
//!
//! edgar-clerk walks a company's 10-K and 10-Q filings on
//! [EDGAR](https://www.sec.gov/edgar) and pulls selected XBRL facts out of each
//! filing's instance document, producing one dated row per reporting period.
//!
//! ## Features
//!
//! - **CIK registry** - Company name to CIK lookups from the SEC lookup file,
//!   downloaded once and shared by every clone of the client
//! - **Filing index** - Documents page links from the company browse page
//! - **Amendment resolution** - One instance document per reporting period, the
//!   latest filed one winning
//! - **Field extraction** - First value of each requested tag, coerced to a number
//!   when possible
//! - **Tables** - Ordered rows with a `date` column, serializable to JSON
//!
//! ## Requirements
//!
//! The SEC asks automated tools to identify themselves. Every request carries the
//! `User-Agent` and `From` headers given to [`Edgar::new`]. Requests are sent one
//! at a time and are not throttled by the client.
//!
//! ## Basic Usage
//!
//! ```ignore
//! use edgar_clerk::{CompanyOperations, Edgar, FilingOperations, FilingType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let edgar = Edgar::new("YourAppName/1.0", "contact@example.com")?;
//!
//!     for (name, cik) in edgar.cik_lookup("apple inc").await? {
//!         println!("{name}: {cik}");
//!     }
//!
//!     let table = edgar
//!         .filing_data("0000320193", FilingType::Form10K, &["us-gaap:revenues"])
//!         .await?;
//!     println!("{}", table.to_json()?);
//!
//!     Ok(())
//! }
//! ```

mod clerk;
mod company;
mod config;
mod core;
mod error;
mod filings;
mod options;
pub mod parsing;
mod table;
mod traits;

pub use clerk::FilingsClerk;
pub use company::{CikMap, CikRegistry};
pub use config::{EdgarConfig, EdgarUrls, FROM_ENV, USER_AGENT_ENV};
pub use core::Edgar;
pub use error::{EdgarError, Result};
pub use filings::{PageOutcome, ResolvedFiling, ResolvedFilings, record_from_instance};
pub use options::{AmendmentPolicy, ClerkOptions, FilingType};
pub use table::{Column, ColumnType, DATE_COLUMN, FieldValue, FilingRecord, FilingTable};

pub use traits::{CompanyOperations, FilingOperations};

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
