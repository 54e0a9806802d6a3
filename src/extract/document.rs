//! Page document queries
//!
//! Everything read from the HTML happens here, synchronously, and comes out
//! as owned strings. `scraper::Html` is not `Send`, so it is parsed and
//! dropped before the extractor awaits any sub-fetch.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

/// Titles of catalog items
const MENU_TITLE_SELECTOR: &str =
    r#"section[aria-label="Menu"] div[data-testid="scroll-container"] p"#;

/// Links of catalog items, paired with titles by position
const MENU_LINK_SELECTOR: &str =
    r#"section[aria-label="Menu"] div[data-testid="scroll-container"] a"#;

/// One row per weekday, Monday first
const HOURS_SELECTOR: &str = "table tbody tr td ul li p";

const STRUCTURED_DATA_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

pub const WEBSITE_LABEL: &str = "Business website";
pub const LOCATED_IN_LABEL: &str = "Located in:";

/// A catalog entry as it appears on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub title: String,
    /// Absolute item URL, when the entry links to one directly
    pub url: Option<String>,
}

/// Facts read from one page document
#[derive(Debug, Clone, Default)]
pub struct PageFacts {
    /// First embedded block whose `@type` matched, if any
    pub business_block: Option<Value>,
    pub menu: Vec<MenuEntry>,
    pub hours: Vec<String>,
    pub website: Option<String>,
    pub located_in: Option<String>,
}

/// Parses the page and reads every DOM-derived field
pub fn read_page(html: &str, entity_type: &str) -> PageFacts {
    let document = Html::parse_document(html);

    PageFacts {
        business_block: find_structured_block(&document, entity_type),
        menu: menu_entries(&document),
        hours: select_text(&document, HOURS_SELECTOR),
        website: labelled_value(&document, WEBSITE_LABEL),
        located_in: labelled_value(&document, LOCATED_IN_LABEL),
    }
}

/// Returns the first `ld+json` island whose `@type` equals `entity_type`
///
/// Islands that fail to parse are skipped; pages routinely carry breadcrumb
/// and organization islands next to the business one.
fn find_structured_block(document: &Html, entity_type: &str) -> Option<Value> {
    let selector = Selector::parse(STRUCTURED_DATA_SELECTOR).ok()?;

    document.select(&selector).find_map(|script| {
        let raw = script.text().collect::<String>();
        let value: Value = serde_json::from_str(raw.trim()).ok()?;
        if value.get("@type").and_then(Value::as_str) == Some(entity_type) {
            Some(value)
        } else {
            None
        }
    })
}

fn menu_entries(document: &Html) -> Vec<MenuEntry> {
    let titles = select_text(document, MENU_TITLE_SELECTOR);
    let links: Vec<Option<String>> = select_all(document, MENU_LINK_SELECTOR)
        .into_iter()
        .map(|a| a.value().attr("href").map(str::to_string))
        .collect();

    titles
        .into_iter()
        .enumerate()
        .map(|(i, title)| MenuEntry {
            title,
            url: links
                .get(i)
                .cloned()
                .flatten()
                .filter(|href| href.starts_with("http")),
        })
        .collect()
}

/// Text of the element immediately after the `<p>` whose text is `label`
fn labelled_value(document: &Html, label: &str) -> Option<String> {
    select_all(document, "p")
        .into_iter()
        .filter(|p| element_text(p) == label)
        .find_map(|p| {
            let sibling = p.next_siblings().find_map(ElementRef::wrap)?;
            if sibling.value().name() != "p" {
                return None;
            }
            Some(element_text(&sibling)).filter(|text| !text.is_empty())
        })
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn select_text(document: &Html, css: &str) -> Vec<String> {
    select_all(document, css).iter().map(element_text).collect()
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
