//! Parsers for the EDGAR pages and files the clerk scrapes.
//!
//! Every parser works on an already downloaded string so it can be exercised
//! against fixtures without touching the network.

pub mod browse;
pub mod cik_lookup;
pub mod documents;
pub mod instance;
pub(crate) mod utils;
