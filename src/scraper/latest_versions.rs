use super::locate::{attr_of, find_all, find_tag, text_of, AttrFilter};
use super::ScrapeContext;
use crate::client::fetch_document;
use crate::error::{Result, ScraperError};
use crate::log_info;
use crate::table::ResultTable;
use regex::Regex;
use std::sync::LazyLock;

pub const HEADER: [&str; 3] = ["Documentation link", "Version", "Status"];

const VERSIONS_MARKER: &str = "All versions";

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Python (?P<version>\d\.\d+) \((?P<status>.*)\)").unwrap()
});

/// Splits `"Python 3.11 (stable)"` into `("3.11", "stable")`. Anything else is
/// kept whole as the version with an empty status.
pub fn parse_version_label(label: &str) -> (String, String) {
    match VERSION_PATTERN.captures(label) {
        Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
        None => (label.trim().to_string(), String::new()),
    }
}

/// Version switcher links from the documentation sidebar. Returns `None`
/// when the documentation root cannot be fetched.
pub async fn scrape(ctx: &ScrapeContext<'_>) -> Result<Option<ResultTable>> {
    let Some(document) = fetch_document(ctx.session, &ctx.config.urls.docs_url).await else {
        return Ok(None);
    };

    let sidebar = find_tag(
        document.root_element(),
        "div",
        Some(&AttrFilter::class("sphinxsidebarwrapper")),
    )?;
    let versions = find_all(sidebar, "ul", None)
        .into_iter()
        .find(|ul| text_of(*ul).contains(VERSIONS_MARKER))
        .ok_or(ScraperError::VersionListNotFound)?;

    let mut results = ResultTable::new(&HEADER);
    for anchor in find_all(versions, "a", None) {
        let link = attr_of(anchor, "href")?;
        let (version, status) = parse_version_label(&text_of(anchor));
        results.push([link.to_string(), version, status])?;
    }

    log_info!("[latest-versions] Found {} versions", results.records().len());
    Ok(Some(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::StubFetch;
    use crate::config::Config;
    use crate::error::{AppError, ParseError};
    use crate::scraper::fixtures::context;

    const ROOT: &str = r#"
        <div class="sphinxsidebarwrapper">
          <ul><li><a href="/3/download.html">Download</a></li></ul>
          <ul>
            <li>All versions</li>
            <li><a href="https://docs.python.org/3.13/">Python 3.13 (in development)</a></li>
            <li><a href="https://docs.python.org/3.11/">Python 3.11 (stable)</a></li>
            <li><a href="https://www.python.org/doc/versions/"> Development </a></li>
          </ul>
        </div>"#;

    #[test]
    fn test_parse_version_label() {
        assert_eq!(
            parse_version_label("Python 3.11 (stable)"),
            ("3.11".to_string(), "stable".to_string())
        );
        assert_eq!(
            parse_version_label("Development"),
            ("Development".to_string(), String::new())
        );
        assert_eq!(
            parse_version_label("Python 3.13 (in development)").1,
            "in development"
        );
    }

    #[tokio::test]
    async fn test_rows_from_all_versions_list() {
        let stub = StubFetch::new().with_page("https://docs.python.org/3/", ROOT);
        let config = Config::default();

        let table = scrape(&context(&stub, &config)).await.unwrap().unwrap();

        assert_eq!(table.records().len(), 3);
        assert_eq!(
            table.records()[1],
            vec!["https://docs.python.org/3.11/", "3.11", "stable"]
        );
        assert_eq!(
            table.records()[2],
            vec!["https://www.python.org/doc/versions/", "Development", ""]
        );
    }

    #[tokio::test]
    async fn test_unreachable_root_yields_nothing() {
        let stub = StubFetch::new();
        let config = Config::default();
        assert!(scrape(&context(&stub, &config)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_versions_list_is_domain_error() {
        let stub = StubFetch::new().with_page(
            "https://docs.python.org/3/",
            r#"<div class="sphinxsidebarwrapper"><ul><li>Other</li></ul></div>"#,
        );
        let config = Config::default();
        let err = scrape(&context(&stub, &config)).await.unwrap_err();
        assert!(matches!(err, AppError::Scraper(ScraperError::VersionListNotFound)));
    }

    #[tokio::test]
    async fn test_missing_sidebar_is_structural_error() {
        let stub = StubFetch::new().with_page("https://docs.python.org/3/", "<div></div>");
        let config = Config::default();
        let err = scrape(&context(&stub, &config)).await.unwrap_err();
        assert!(matches!(err, AppError::Parse(ParseError::TagNotFound { .. })));
    }
}
