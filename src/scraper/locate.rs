use crate::error::{ParseError, Result};
use crate::log_error;
use regex::Regex;
use scraper::ElementRef;
use std::fmt;

/// Attribute predicate for [`find_tag`] and [`find_all`].
#[derive(Debug, Clone)]
pub enum AttrFilter {
    /// Attribute value equals the given string exactly.
    Equals(&'static str, String),
    /// `class` is exactly the given string, or contains it as one of its classes.
    Class(String),
    /// Attribute value matches the pattern anywhere.
    Matches(&'static str, Regex),
}

impl AttrFilter {
    pub fn id(value: impl Into<String>) -> Self {
        AttrFilter::Equals("id", value.into())
    }

    pub fn class(value: impl Into<String>) -> Self {
        AttrFilter::Class(value.into())
    }

    pub fn matches(attribute: &'static str, pattern: Regex) -> Self {
        AttrFilter::Matches(attribute, pattern)
    }

    fn accepts(&self, element: &ElementRef) -> bool {
        let value = element.value();
        match self {
            AttrFilter::Equals(name, expected) => value.attr(name) == Some(expected.as_str()),
            AttrFilter::Class(expected) => value.attr("class").is_some_and(|class| {
                class == expected || class.split_whitespace().any(|c| c == expected)
            }),
            AttrFilter::Matches(name, pattern) => {
                value.attr(name).is_some_and(|v| pattern.is_match(v))
            }
        }
    }
}

impl fmt::Display for AttrFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrFilter::Equals(name, value) => write!(f, "[{}={:?}]", name, value),
            AttrFilter::Class(value) => write!(f, "[class={:?}]", value),
            AttrFilter::Matches(name, pattern) => write!(f, "[{}~/{}/]", name, pattern),
        }
    }
}

fn is_match(element: &ElementRef, tag: &str, filter: Option<&AttrFilter>) -> bool {
    element.value().name() == tag && filter.map_or(true, |f| f.accepts(element))
}

/// First descendant of `node` named `tag` that passes `filter`.
///
/// A missing element means the page is not shaped the way the caller
/// expects, so it is an error rather than an `Option`.
pub fn find_tag<'a>(
    node: ElementRef<'a>,
    tag: &str,
    filter: Option<&AttrFilter>,
) -> Result<ElementRef<'a>> {
    let found = node
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| is_match(el, tag, filter));
    if let Some(found) = found {
        return Ok(found);
    }

    let err = ParseError::TagNotFound {
        tag: tag.to_string(),
        filter: filter.map(ToString::to_string).unwrap_or_default(),
    };
    log_error!("[locate] {}", err);
    Err(err.into())
}

/// Every descendant of `node` named `tag` that passes `filter`, in document order.
pub fn find_all<'a>(
    node: ElementRef<'a>,
    tag: &str,
    filter: Option<&AttrFilter>,
) -> Vec<ElementRef<'a>> {
    node.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| is_match(el, tag, filter))
        .collect()
}

/// Concatenated text of the element and all its descendants.
pub fn text_of(element: ElementRef) -> String {
    element.text().collect()
}

pub fn attr_of<'a>(element: ElementRef<'a>, attribute: &str) -> Result<&'a str> {
    element.value().attr(attribute).ok_or_else(|| {
        ParseError::MissingAttribute {
            tag: element.value().name().to_string(),
            attribute: attribute.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use scraper::Html;

    const PAGE: &str = r#"
        <html><body>
          <section id="intro"><p>skip</p></section>
          <section id="downloads">
            <div class="toctree-wrapper compound">
              <a href="archives/python-docs-pdf-letter.zip">Letter</a>
              <a href="archives/python-docs-pdf-a4.zip">A4</a>
            </div>
            <dl class="rfc2822 field-list simple"><dt>Status:</dt></dl>
          </section>
        </body></html>
    "#;

    #[test]
    fn test_find_by_id() {
        let doc = Html::parse_document(PAGE);
        let section = find_tag(doc.root_element(), "section", Some(&AttrFilter::id("downloads")))
            .unwrap();
        assert_eq!(section.value().attr("id"), Some("downloads"));
    }

    #[test]
    fn test_find_by_single_class_and_full_class_string() {
        let doc = Html::parse_document(PAGE);
        let root = doc.root_element();
        assert!(find_tag(root, "div", Some(&AttrFilter::class("toctree-wrapper"))).is_ok());
        assert!(find_tag(root, "dl", Some(&AttrFilter::class("rfc2822 field-list simple"))).is_ok());
        assert!(find_tag(root, "dl", Some(&AttrFilter::class("field"))).is_err());
    }

    #[test]
    fn test_find_by_pattern() {
        let doc = Html::parse_document(PAGE);
        let filter = AttrFilter::matches("href", Regex::new(r".+pdf-a4\.zip$").unwrap());
        let link = find_tag(doc.root_element(), "a", Some(&filter)).unwrap();
        assert_eq!(text_of(link), "A4");
        assert_eq!(attr_of(link, "href").unwrap(), "archives/python-docs-pdf-a4.zip");
    }

    #[test]
    fn test_missing_tag_names_the_tag() {
        let doc = Html::parse_document(PAGE);
        let err = find_tag(doc.root_element(), "table", None).unwrap_err();
        assert!(matches!(
            err,
            AppError::Parse(ParseError::TagNotFound { ref tag, .. }) if tag == "table"
        ));
        assert!(err.to_string().contains("table"));

        let err = find_tag(doc.root_element(), "section", Some(&AttrFilter::id("nope")))
            .unwrap_err();
        assert!(err.to_string().contains("section"));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_search_is_scoped_to_descendants() {
        let doc = Html::parse_document(PAGE);
        let intro = find_tag(doc.root_element(), "section", Some(&AttrFilter::id("intro")))
            .unwrap();
        assert!(find_tag(intro, "a", None).is_err());
        assert!(find_tag(intro, "section", None).is_err());
        assert_eq!(find_all(doc.root_element(), "a", None).len(), 2);
    }

    #[test]
    fn test_missing_attribute() {
        let doc = Html::parse_document(PAGE);
        let p = find_tag(doc.root_element(), "p", None).unwrap();
        assert!(attr_of(p, "href").is_err());
    }
}
