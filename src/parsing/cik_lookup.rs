//! Parser for `cik-lookup-data.txt`.
//!
//! The file lists every EDGAR filer as `NAME:CIK:` on its own line. A name may
//! appear several times (former names, subsidiaries sharing a name) and names
//! containing a colon cannot be split unambiguously; such lines are dropped.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CikLookupEntry {
    pub name: String,
    pub cik: String,
}

/// Parses the lookup file into entries, in file order.
///
/// The content is split on `\n` and the last record is discarded (it is the
/// empty string after the final newline). Only lines with exactly three
/// colon-separated fields are kept.
pub fn parse_cik_lookup(content: &str) -> Vec<CikLookupEntry> {
    let mut records: Vec<&str> = content.split('\n').collect();
    records.pop();

    records
        .into_iter()
        .filter_map(|record| {
            let fields: Vec<&str> = record.split(':').collect();
            match fields.as_slice() {
                [name, cik, _] => Some(CikLookupEntry {
                    name: name.to_string(),
                    cik: cik.to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}
