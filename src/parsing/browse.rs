//! Company browse page parser.
//!
//! The browse endpoint (`/cgi-bin/browse-edgar?action=getcompany`) returns an HTML
//! table of a filer's filings. Each row has a "Documents" button linking to the
//! filing's documents page; the button is an anchor with the id `documentsbutton`.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static DOCUMENTS_BUTTON_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a#documentsbutton").expect("Failed to compile DOCUMENTS_BUTTON_SELECTOR")
});

/// Extracts the raw `href` of every documents button, in page order.
///
/// The hrefs are site-relative (`/Archives/edgar/data/...-index.htm`). Anchors
/// without an `href` are ignored.
pub fn documents_page_hrefs(content: &str) -> Vec<String> {
    let document = Html::parse_document(content);
    document
        .select(&DOCUMENTS_BUTTON_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_page_hrefs() {
        let html = r#"
            <table class="tableFile2">
              <tr><td>10-K</td><td><a href="/Archives/edgar/data/320193/000032019322000108/0000320193-22-000108-index.htm" id="documentsbutton">&nbsp;Documents</a></td></tr>
              <tr><td>10-K</td><td><a href="/Archives/edgar/data/320193/000032019321000105/0000320193-21-000105-index.htm" id="documentsbutton">&nbsp;Documents</a>
                  <a href="/cgi-bin/viewer?action=view" id="interactiveDataBtn">Interactive Data</a></td></tr>
              <tr><td>10-K</td><td><a id="documentsbutton">&nbsp;Documents</a></td></tr>
            </table>"#;

        let hrefs = documents_page_hrefs(html);
        assert_eq!(
            hrefs,
            vec![
                "/Archives/edgar/data/320193/000032019322000108/0000320193-22-000108-index.htm",
                "/Archives/edgar/data/320193/000032019321000105/0000320193-21-000105-index.htm",
            ]
        );
    }

    #[test]
    fn test_no_documents_buttons() {
        let html = "<html><body><p>No matching Ticker Symbol.</p></body></html>";
        assert!(documents_page_hrefs(html).is_empty());
    }
}
