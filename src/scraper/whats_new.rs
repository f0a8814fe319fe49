use super::locate::{attr_of, find_all, find_tag, text_of, AttrFilter};
use super::ScrapeContext;
use crate::client::fetch_document;
use crate::error::{Result, ScraperError};
use crate::table::ResultTable;
use crate::{log_debug, log_info};

pub const HEADER: [&str; 3] = ["Article link", "Title", "Editor, author"];

/// One row per "What's New in Python X.Y" article: link, title and the
/// editor/author field list. Articles whose page cannot be fetched are skipped.
pub async fn scrape(ctx: &ScrapeContext<'_>) -> Result<ResultTable> {
    let mut results = ResultTable::new(&HEADER);
    let index_url = ctx.config.whats_new_url()?;

    let Some(index) = fetch_document(ctx.session, index_url.as_str()).await else {
        return Ok(results);
    };

    let section = find_tag(
        index.root_element(),
        "section",
        Some(&AttrFilter::id("what-s-new-in-python")),
    )?;
    let wrapper = find_tag(section, "div", Some(&AttrFilter::class("toctree-wrapper")))?;
    let entries = find_all(wrapper, "li", Some(&AttrFilter::class("toctree-l1")));
    log_info!("[whats-new] Found {} articles", entries.len());

    let mut progress = ctx.progress("whats-new");
    progress.begin(entries.len());

    for entry in entries {
        progress.advance();
        let anchor = find_tag(entry, "a", None)?;
        let href = attr_of(anchor, "href")?;
        let link = index_url
            .join(href)
            .map_err(|e| ScraperError::InvalidUrl(format!("{}: {}", href, e)))?;

        let Some(article) = fetch_document(ctx.session, link.as_str()).await else {
            log_debug!("[whats-new] Skipping {}", link);
            continue;
        };

        let title = text_of(find_tag(article.root_element(), "h1", None)?);
        let authors = text_of(find_tag(article.root_element(), "dl", None)?).replace('\n', " ");
        results.push([
            link.to_string(),
            title.trim().to_string(),
            authors.trim().to_string(),
        ])?;
    }

    progress.finish();
    Ok(results)
}
