//! Filing data example
//!
//! This example walks the whole pipeline for one company:
//! - Resolve a company name to its CIK
//! - Resolve its 10-K and 10-Q filings to XBRL instance documents
//! - Extract a few facts from each filing into a dated table
//!
//! Set `EDGAR_USER_AGENT` and `EDGAR_FROM` to identify yourself to SEC.gov, then
//! run with: `cargo run --example filing_data -- "apple inc"`
//!
//! Use `RUST_LOG=edgar_clerk=debug` to follow every request.

use edgar_clerk::{
    ClerkOptions, CompanyOperations, Edgar, EdgarConfig, FilingType, FilingsClerk,
};
use std::error::Error;
use tracing_subscriber::EnvFilter;

const TAGS: &[&str] = &[
    "us-gaap:revenues",
    "us-gaap:netincomeloss",
    "us-gaap:assets",
    "dei:documenttype",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("edgar_clerk=info")),
        )
        .init();

    let query = std::env::args().nth(1).unwrap_or_else(|| "apple inc".to_string());
    let edgar = Edgar::with_config(EdgarConfig::from_env())?;

    println!("=== edgar-clerk Filing Data Example ===\n");

    println!("Looking up \"{}\"...", query);
    let matches = edgar.cik_lookup(&query).await?;
    let mut names: Vec<&String> = matches.keys().collect();
    names.sort();
    for name in names.iter().take(10) {
        println!("  {}: {}", name, matches[*name]);
    }
    let Some(name) = names.first() else {
        println!("No company matches \"{}\"", query);
        return Ok(());
    };
    let cik = matches[*name].clone();
    println!("\nUsing {} (CIK {})\n", name, cik);

    let options = ClerkOptions::new().with_filing_types(vec!["10-K".into(), "10-Q".into()]);
    let clerk = FilingsClerk::new(edgar, cik, options)?;

    for filing_type in [FilingType::Form10K, FilingType::Form10Q] {
        let table = clerk.filing_data(Some(filing_type), TAGS).await?;
        println!("{} filings: {} rows", filing_type, table.len());
        for row in table.rows() {
            println!("  {}", serde_json::to_string(row)?);
        }
        println!();
    }

    let tags = clerk.unique_tags(None, 1).await?;
    println!("The latest 10-K uses {} distinct elements", tags.len());

    Ok(())
}
