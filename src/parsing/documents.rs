//! Filing documents page parser.
//!
//! Every EDGAR filing has a documents page (`...-index.htm`) with a header block
//! describing the filing and one or two tables listing its files. The layout this
//! parser relies on:
//!
//! ```text
//! div#formDiv
//! ├── div#formHeader
//! │   └── div#formName            "Form 10-K/A - Annual report [amend]"
//! └── div.formContent
//!     ├── div.formGrouping        (1st child)
//!     │   ├── div.infoHead        "Filing Date"
//!     │   └── div.info            "2022-10-28"   <- filing date
//!     └── div.formGrouping        (2nd child)
//!         ├── div.infoHead        "Period of Report"
//!         └── div.info            "2022-09-24"   <- period of report
//! table.tableFile[summary="Data Files"]
//!     tr: Seq | Description | Document (link) | Type | Size
//! ```
//!
//! Filings predating XBRL have no "Data Files" table.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::utils::element_text;

/// Description marker of the instance document row. Inline XBRL filings label it
/// "EXTRACTED XBRL INSTANCE DOCUMENT", which contains this marker as well.
pub const INSTANCE_DOCUMENT_MARKER: &str = "XBRL INSTANCE DOCUMENT";

const AMENDMENT_MARKER: &str = "[amend]";

static PERIOD_OF_REPORT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("#formDiv > div.formContent > div:nth-child(2) > div.info")
        .expect("Failed to compile PERIOD_OF_REPORT_SELECTOR")
});

static FILING_DATE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("#formDiv > div.formContent > div:nth-child(1) > div:nth-child(2)")
        .expect("Failed to compile FILING_DATE_SELECTOR")
});

static FORM_NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div#formName").expect("Failed to compile FORM_NAME_SELECTOR"));

static DATA_FILES_TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"table.tableFile[summary="Data Files"]"#)
        .expect("Failed to compile DATA_FILES_TABLE_SELECTOR")
});

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Failed to compile CELL_SELECTOR"));

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("Failed to compile LINK_SELECTOR"));

/// A row of the "Data Files" table with more than three cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFileRow {
    /// Text of the second cell
    pub description: String,
    /// `href` of the first link in the third cell, as found on the page
    pub href: Option<String>,
}

impl DataFileRow {
    pub fn is_instance_document(&self) -> bool {
        self.description.contains(INSTANCE_DOCUMENT_MARKER)
    }
}

/// The parts of a documents page needed to locate a filing's instance document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentsPage {
    pub period_of_report: Option<String>,
    pub filing_date: Option<String>,
    pub form_name: Option<String>,
    /// `None` when the page has no "Data Files" table.
    pub data_files: Option<Vec<DataFileRow>>,
}

impl DocumentsPage {
    pub fn parse(content: &str) -> Self {
        let document = Html::parse_document(content);

        let first_text = |selector: &Selector| {
            document
                .select(selector)
                .next()
                .map(|element| element_text(element).trim().to_string())
        };

        let data_files = document
            .select(&DATA_FILES_TABLE_SELECTOR)
            .next()
            .map(data_file_rows);

        Self {
            period_of_report: first_text(&PERIOD_OF_REPORT_SELECTOR),
            filing_date: first_text(&FILING_DATE_SELECTOR),
            form_name: first_text(&FORM_NAME_SELECTOR),
            data_files,
        }
    }

    /// True when the form name carries the `[Amend]` marker.
    pub fn is_amendment(&self) -> bool {
        self.form_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(AMENDMENT_MARKER))
    }

    /// Raw href of the instance document. When several rows match, the last one wins.
    pub fn instance_document_href(&self) -> Option<&str> {
        self.data_files
            .as_ref()?
            .iter()
            .filter(|row| row.is_instance_document())
            .filter_map(|row| row.href.as_deref())
            .last()
    }
}

fn data_file_rows(table: ElementRef<'_>) -> Vec<DataFileRow> {
    table
        .select(&ROW_SELECTOR)
        .filter_map(|row| {
            let cells: Vec<ElementRef<'_>> = row.select(&CELL_SELECTOR).collect();
            if cells.len() <= 3 {
                return None;
            }
            let href = cells[2]
                .select(&LINK_SELECTOR)
                .next()
                .and_then(|link| link.value().attr("href"))
                .map(str::to_string);
            Some(DataFileRow {
                description: element_text(cells[1]),
                href,
            })
        })
        .collect()
}
