use super::extract::{extract_pep_link, extract_pep_status};
use super::locate::{find_all, find_tag, text_of, AttrFilter};
use super::ScrapeContext;
use crate::client::fetch_document;
use crate::error::{Result, ScraperError};
use crate::table::ResultTable;
use crate::{log_debug, log_info, log_warn};
use std::collections::BTreeMap;
use url::Url;

pub const HEADER: [&str; 2] = ["Status", "Count"];

/// Full statuses a PEP page may show for each preview code in the index.
pub fn expected_statuses(preview: &str) -> Option<&'static [&'static str]> {
    let statuses: &'static [&'static str] = match preview {
        "A" => &["Active", "Accepted"],
        "D" => &["Deferred"],
        "F" => &["Final"],
        "P" => &["Provisional"],
        "R" => &["Rejected"],
        "S" => &["Superseded"],
        "W" => &["Withdrawn"],
        "" => &["Draft", "Active"],
        _ => return None,
    };
    Some(statuses)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCheck {
    Consistent,
    Mismatch(&'static [&'static str]),
}

/// Compares a page's full status with its index preview code. An unknown
/// preview code is an error: the index uses a status this scraper does not know.
pub fn check_status(preview: &str, full: &str, url: &Url) -> Result<StatusCheck> {
    let expected = expected_statuses(preview).ok_or_else(|| ScraperError::UnknownPreviewStatus {
        code: preview.to_string(),
        url: url.to_string(),
    })?;
    if expected.iter().any(|status| *status == full) {
        Ok(StatusCheck::Consistent)
    } else {
        Ok(StatusCheck::Mismatch(expected))
    }
}

/// Occurrences of each full status.
#[derive(Debug, Default)]
pub struct StatusTally {
    counts: BTreeMap<String, usize>,
}

impl StatusTally {
    pub fn record(&mut self, status: &str) {
        *self.counts.entry(status.to_string()).or_default() += 1;
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// One row per status in name order, then the `Total` row.
    pub fn into_table(self) -> Result<ResultTable> {
        let mut table = ResultTable::new(&HEADER);
        let total = self.total();
        for (status, count) in self.counts {
            table.push([status, count.to_string()])?;
        }
        table.push(["Total".to_string(), total.to_string()])?;
        Ok(table)
    }
}

/// Preview status code from the first cell of an index row: the cell reads
/// type letter then status letter (`"SF"`, `"I"`), the type is dropped.
pub fn preview_code(cell_text: &str) -> String {
    cell_text.trim().chars().skip(1).collect()
}

/// Counts PEPs by the status shown on each PEP's own page.
pub async fn scrape(ctx: &ScrapeContext<'_>) -> Result<ResultTable> {
    let base = Url::parse(&ctx.config.urls.pep_url)
        .map_err(|e| ScraperError::InvalidUrl(format!("{}: {}", ctx.config.urls.pep_url, e)))?;
    let Some(index) = fetch_document(ctx.session, base.as_str()).await else {
        return Ok(ResultTable::new(&HEADER));
    };

    let section = find_tag(
        index.root_element(),
        "section",
        Some(&AttrFilter::id("numerical-index")),
    )?;
    let body = find_tag(section, "tbody", None)?;
    let rows = find_all(body, "tr", None);
    log_info!("[pep] Found {} PEPs in the index", rows.len());

    let mut tally = StatusTally::default();
    let mut progress = ctx.progress("pep");
    progress.begin(rows.len());

    for row in rows {
        progress.advance();
        let preview = preview_code(&text_of(find_tag(row, "td", None)?));
        let link = extract_pep_link(row, &base)?;

        let Some(page) = fetch_document(ctx.session, link.as_str()).await else {
            log_debug!("[pep] Skipping {}", link);
            continue;
        };

        let status = extract_pep_status(&page)?;
        tally.record(&status);

        if let StatusCheck::Mismatch(expected) = check_status(&preview, &status, &link)? {
            log_warn!(
                "[pep] Mismatched status for {}: page says {}, expected one of {:?}",
                link,
                status,
                expected
            );
        }
    }

    progress.finish();
    log_info!("[pep] Counted {} PEPs", tally.total());
    tally.into_table()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::StubFetch;
    use crate::config::Config;
    use crate::error::AppError;
    use crate::scraper::fixtures::context;
    use tracing_test::traced_test;

    fn index(rows: &[(&str, &str)]) -> String {
        let rows: String = rows
            .iter()
            .map(|(code, href)| {
                format!(
                    r#"<tr><td><abbr>{}</abbr></td><td><a href="{}">PEP</a></td></tr>"#,
                    code, href
                )
            })
            .collect();
        format!(
            r#"<section id="numerical-index"><table><tbody>{}</tbody></table></section>"#,
            rows
        )
    }

    fn pep_page(status: &str) -> String {
        format!(
            r#"<dl class="rfc2822 field-list simple">
                 <dt>Author:</dt>
                 <dd>Someone</dd>
                 <dt>Status:</dt>
                 <dd><abbr>{}</abbr></dd>
               </dl>"#,
            status
        )
    }

    #[test]
    fn test_preview_code_drops_type_letter() {
        assert_eq!(preview_code("SF"), "F");
        assert_eq!(preview_code(" IA "), "A");
        assert_eq!(preview_code("S"), "");
    }

    #[test]
    fn test_check_status() {
        let url = Url::parse("https://peps.python.org/pep-0001/").unwrap();
        assert_eq!(
            check_status("", "Active", &url).unwrap(),
            StatusCheck::Consistent
        );
        assert_eq!(
            check_status("F", "Draft", &url).unwrap(),
            StatusCheck::Mismatch(&["Final"])
        );
        assert!(matches!(
            check_status("X", "Final", &url),
            Err(AppError::Scraper(ScraperError::UnknownPreviewStatus { .. }))
        ));
    }

    #[test]
    fn test_tally_table_ends_with_total() {
        let mut tally = StatusTally::default();
        for status in ["Final", "Draft", "Final", "Active"] {
            tally.record(status);
        }
        let table = tally.into_table().unwrap();
        let rows = table.records();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec!["Active", "1"]);
        assert_eq!(rows[2], vec!["Final", "2"]);
        assert_eq!(rows[3], vec!["Total", "4"]);
    }

    #[tokio::test]
    async fn test_counts_processed_peps_and_skips_unreachable() {
        let stub = StubFetch::new()
            .with_page(
                "https://peps.python.org/",
                index(&[
                    ("PF", "pep-0001/"),
                    ("SF", "pep-0008/"),
                    ("S", "pep-0700/"),
                    ("SA", "pep-0999/"),
                    ("SF", "pep-0020/"),
                ]),
            )
            .with_page("https://peps.python.org/pep-0001/", pep_page("Final"))
            .with_page("https://peps.python.org/pep-0008/", pep_page("Draft"))
            .with_page("https://peps.python.org/pep-0700/", pep_page("Draft"))
            .with_page("https://peps.python.org/pep-0020/", pep_page("Final"));
        let config = Config::default();

        let table = scrape(&context(&stub, &config)).await.unwrap();

        let rows = table.records();
        assert_eq!(rows[0], vec!["Draft", "2"]);
        assert_eq!(rows[1], vec!["Final", "2"]);
        assert_eq!(rows[2], vec!["Total", "4"]);
        assert!(table.rows().iter().all(|row| row.len() == 2));
    }

    #[tokio::test]
    async fn test_unknown_preview_code_is_fatal() {
        let stub = StubFetch::new()
            .with_page("https://peps.python.org/", index(&[("SQ", "pep-0001/")]))
            .with_page("https://peps.python.org/pep-0001/", pep_page("Final"));
        let config = Config::default();

        let err = scrape(&context(&stub, &config)).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Scraper(ScraperError::UnknownPreviewStatus { ref code, .. }) if code == "Q"
        ));
    }

    #[tokio::test]
    async fn test_unreachable_index_yields_header_only() {
        let stub = StubFetch::new();
        let config = Config::default();
        let table = scrape(&context(&stub, &config)).await.unwrap();
        assert_eq!(table.header(), &vec!["Status", "Count"]);
        assert!(table.records().is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_final_code_with_draft_page_is_logged() {
        let stub = StubFetch::new()
            .with_page("https://peps.python.org/", index(&[("SF", "pep-0008/")]))
            .with_page("https://peps.python.org/pep-0008/", pep_page("Draft"));
        let config = Config::default();

        let table = scrape(&context(&stub, &config)).await.unwrap();

        assert_eq!(table.records()[0], vec!["Draft", "1"]);
        assert!(logs_contain("Mismatched status"));
        assert!(logs_contain("https://peps.python.org/pep-0008/"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_consistent_status_is_not_logged() {
        let stub = StubFetch::new()
            .with_page("https://peps.python.org/", index(&[("I", "pep-0020/")]))
            .with_page("https://peps.python.org/pep-0020/", pep_page("Active"));
        let config = Config::default();

        scrape(&context(&stub, &config)).await.unwrap();

        assert!(!logs_contain("Mismatched status"));
    }
}
