use edgar_clerk::{Edgar, EdgarConfig, EdgarUrls};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CIK: &str = "0000320193";
pub const USER_AGENT: &str = "test_agent";
pub const FROM: &str = "example@example.com";

pub const ORIGINAL_PAGE: &str =
    "/Archives/edgar/data/320193/000032019322000108/0000320193-22-000108-index.htm";
pub const ORIGINAL_INSTANCE: &str =
    "/Archives/edgar/data/320193/000032019322000108/aapl-20220924_htm.xml";
pub const AMENDMENT_PAGE: &str =
    "/Archives/edgar/data/320193/000032019323000004/0000320193-23-000004-index.htm";
pub const AMENDMENT_INSTANCE: &str =
    "/Archives/edgar/data/320193/000032019323000004/aapl-20220924a_htm.xml";

pub fn fixture_path(relative: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

pub fn read_fixture(relative: impl AsRef<Path>) -> String {
    fs::read_to_string(fixture_path(relative)).expect("fixture file should be readable")
}

/// Client pointed at the mock server.
#[allow(dead_code)]
pub fn edgar(server: &MockServer) -> Edgar {
    let config = EdgarConfig::new(
        USER_AGENT,
        FROM,
        Duration::from_secs(5),
        Some(EdgarUrls::from_base(server.uri())),
    );
    Edgar::with_config(config).unwrap()
}

/// Browse page listing the given documents pages, one row each.
#[allow(dead_code)]
pub fn browse_page(documents_pages: &[&str]) -> String {
    let rows: String = documents_pages
        .iter()
        .map(|href| {
            format!(
                r#"<tr><td>10-K</td><td><a href="{href}" id="documentsbutton">&nbsp;Documents</a></td></tr>"#
            )
        })
        .collect();
    format!(r#"<html><body><table class="tableFile2" summary="Results">{rows}</table></body></html>"#)
}

/// Serves `body` at `route` with a 200 status, expecting `hits` requests.
#[allow(dead_code)]
pub async fn serve(server: &MockServer, route: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(hits)
        .mount(server)
        .await;
}
