use super::locate::{attr_of, find_tag, AttrFilter};
use super::ScrapeContext;
use crate::client::{fetch_bytes, fetch_document};
use crate::error::{Result, ScraperError};
use crate::utils::write_atomic;
use crate::{log_info, log_warn};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

static ARCHIVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+pdf-a4\.zip$").unwrap());

/// Last path segment of the archive URL.
pub fn archive_file_name(url: &Url) -> Result<String> {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ScraperError::InvalidUrl(format!("no file name in {}", url)).into())
}

/// Saves the A4 PDF documentation archive into the downloads directory.
///
/// Returns the saved path, or `None` when either request failed. Nothing is
/// left on disk unless the whole archive was written.
pub async fn scrape(ctx: &ScrapeContext<'_>) -> Result<Option<PathBuf>> {
    let downloads_url = ctx.config.downloads_url()?;

    let Some(document) = fetch_document(ctx.session, downloads_url.as_str()).await else {
        log_warn!("[download] Downloads page unavailable, nothing saved");
        return Ok(None);
    };

    let filter = AttrFilter::matches("href", ARCHIVE_PATTERN.clone());
    let anchor = find_tag(document.root_element(), "a", Some(&filter))?;
    let href = attr_of(anchor, "href")?;
    let archive_url = downloads_url
        .join(href)
        .map_err(|e| ScraperError::InvalidUrl(format!("{}: {}", href, e)))?;
    let file_name = archive_file_name(&archive_url)?;

    let Some(archive) = fetch_bytes(ctx.session, archive_url.as_str()).await else {
        log_warn!("[download] Archive {} unavailable, nothing saved", archive_url);
        return Ok(None);
    };

    let archive_path = write_atomic(&ctx.config.paths.downloads_dir, &file_name, &archive)?;
    log_info!(
        "[download] Archive downloaded and saved to {}",
        archive_path.display()
    );
    Ok(Some(archive_path))
}
