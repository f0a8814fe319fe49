use super::locate::{attr_of, find_tag, text_of, AttrFilter};
use crate::error::{ParseError, Result, ScraperError};
use scraper::{ElementRef, Html};
use url::Url;

/// Absolute URL of the first link in a PEP index row.
pub fn extract_pep_link(row: ElementRef, base: &Url) -> Result<Url> {
    let link = find_tag(row, "a", None)?;
    let href = attr_of(link, "href")?;
    base.join(href)
        .map_err(|e| ScraperError::InvalidUrl(format!("{}: {}", href, e)).into())
}

/// The word right after `Status:` in a PEP page's header field list.
pub fn extract_pep_status(document: &Html) -> Result<String> {
    let header = find_tag(
        document.root_element(),
        "dl",
        Some(&AttrFilter::class("rfc2822 field-list simple")),
    )?;
    let text = text_of(header);
    let mut words = text.split_whitespace();
    words
        .by_ref()
        .find(|word| *word == "Status:")
        .ok_or(ParseError::StatusLabelMissing)?;
    words
        .next()
        .map(str::to_string)
        .ok_or_else(|| ParseError::StatusLabelMissing.into())
}
