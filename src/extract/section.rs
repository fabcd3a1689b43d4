//! Isolates the entries of a day page's "Events" section.
//!
//! The section is bounded by two anchors, `id="Events"` and `id="Births"`,
//! which may sit on the heading itself (`<h2 id="Events">`) or on a span inside
//! it (`<span class="mw-headline" id="Events">`). Births, deaths and holiday
//! lists also contain year-prefixed items, so membership is decided by position
//! in document order only.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::utils::compile_static_regex;

/// Anchor id opening the events section.
pub const EVENTS_ANCHOR: &str = "Events";

/// Anchor id closing the events section.
pub const BIRTHS_ANCHOR: &str = "Births";

/// `<year>[ BC] – ` with either an en dash or an em dash.
static ENTRY_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"^\d+(?: BC)?\s[–—]\s"));

/// One year-prefixed list item from the events section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    text: String,
    inner_html: String,
}

impl RawEntry {
    #[must_use]
    pub fn new(text: impl Into<String>, inner_html: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            inner_html: inner_html.into(),
        }
    }

    /// Captures an `<li>` element's visible text and inner markup.
    #[must_use]
    pub fn from_element(element: ElementRef<'_>) -> Self {
        Self {
            text: element_text(element),
            inner_html: element.inner_html(),
        }
    }

    /// Visible text, citation markers included.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }
}

/// True when `text` starts like an event entry (`1812 – `, `573 BC — `).
#[must_use]
pub fn is_event_entry_text(text: &str) -> bool {
    ENTRY_PREFIX_RE.is_match(text.trim_start())
}

/// Returns the event entries between the Events and Births anchors, in
/// document order.
///
/// Returns an empty list when either anchor is missing or Births precedes
/// Events. The walk is a single pre-order pass over the tree, so page size
/// does not affect stack depth.
#[must_use]
pub fn event_entry_nodes(document: &Html) -> Vec<ElementRef<'_>> {
    let mut entries = Vec::new();
    let mut inside_events = false;

    for node in document.tree.root().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };

        match element.value().id() {
            Some(EVENTS_ANCHOR) if !inside_events => {
                inside_events = true;
                continue;
            }
            Some(BIRTHS_ANCHOR) if inside_events => {
                debug!(entries = entries.len(), "events section closed");
                return entries;
            }
            _ => {}
        }

        if inside_events
            && element.value().name() == "li"
            && is_event_entry_text(&element_text(element))
        {
            entries.push(element);
        }
    }

    debug!(
        found_events_anchor = inside_events,
        "events section not bounded by both anchors"
    );
    Vec::new()
}

/// [`event_entry_nodes`] captured as owned [`RawEntry`] values.
#[must_use]
pub fn select_event_entries(document: &Html) -> Vec<RawEntry> {
    event_entry_nodes(document)
        .into_iter()
        .map(RawEntry::from_element)
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_page(body: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div class="mw-parser-output">{body}</div></body></html>"#
        ))
    }

    const MODERN_PAGE: &str = r#"
        <p>January 1 is the first day of the year.</p>
        <ul><li>2000 – Intro list item that is not an event</li></ul>
        <div class="mw-heading mw-heading2"><h2 id="Events">Events</h2></div>
        <div class="mw-heading mw-heading3"><h3 id="Pre-1600">Pre-1600</h3></div>
        <ul>
            <li><a href="/wiki/45_BC" title="45 BC">45 BC</a> – The Julian calendar takes effect.</li>
            <li>Undated note without a year</li>
        </ul>
        <div class="mw-heading mw-heading3"><h3 id="1601–1900">1601–1900</h3></div>
        <ul>
            <li><a href="/wiki/1801">1801</a> – The Kingdom of Great Britain and Ireland unite.<sup class="reference">[1]</sup></li>
        </ul>
        <div class="mw-heading mw-heading2"><h2 id="Births">Births</h2></div>
        <ul><li><a href="/wiki/1879">1879</a> – E. M. Forster, English author</li></ul>
        <div class="mw-heading mw-heading2"><h2 id="Deaths">Deaths</h2></div>
        <ul><li>1894 – Heinrich Hertz, German physicist</li></ul>
    "#;

    #[test]
    fn test_entries_between_events_and_births_only() {
        let document = day_page(MODERN_PAGE);
        let entries = select_event_entries(&document);
        assert_eq!(entries.len(), 2, "got {entries:?}");
        assert!(entries[0].text().starts_with("45 BC – The Julian calendar"));
        assert!(entries[1].text().starts_with("1801 – The Kingdom"));
        assert!(entries[1].inner_html().contains("<sup"));
    }

    #[test]
    fn test_legacy_span_anchors_are_recognized() {
        let document = day_page(
            r#"
            <h2><span class="mw-headline" id="Events">Events</span></h2>
            <ul><li>1812 – The University of Virginia is founded</li></ul>
            <h2><span class="mw-headline" id="Births">Births</span></h2>
            <ul><li>1900 – Somebody is born</li></ul>
            "#,
        );
        let entries = select_event_entries(&document);
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].text(),
            "1812 – The University of Virginia is founded"
        );
    }

    #[test]
    fn test_missing_events_anchor_yields_empty() {
        let document = day_page(
            r#"<ul><li>1812 – Orphan entry</li></ul><h2 id="Births">Births</h2>"#,
        );
        assert!(select_event_entries(&document).is_empty());
    }

    #[test]
    fn test_missing_births_anchor_yields_empty() {
        let document = day_page(r#"<h2 id="Events">Events</h2><ul><li>1812 – Entry</li></ul>"#);
        assert!(select_event_entries(&document).is_empty());
    }

    #[test]
    fn test_births_before_events_yields_empty() {
        let document = day_page(
            r#"<h2 id="Births">Births</h2><ul><li>1900 – Born</li></ul>
               <h2 id="Events">Events</h2><ul><li>1812 – Entry</li></ul>"#,
        );
        assert!(select_event_entries(&document).is_empty());
    }

    #[test]
    fn test_large_flat_section_is_walked_iteratively() {
        let items: String = (1..=5000)
            .map(|year| format!("<li>{year} – Event number {year}</li>"))
            .collect();
        let document = day_page(&format!(
            r#"<h2 id="Events">Events</h2><ul>{items}</ul><h2 id="Births">Births</h2>"#
        ));
        assert_eq!(select_event_entries(&document).len(), 5000);
    }

    #[test]
    fn test_entry_prefix_accepts_en_and_em_dash() {
        assert!(is_event_entry_text("1812 – The University of Virginia is founded"));
        assert!(is_event_entry_text("573 BC — Something"));
        assert!(is_event_entry_text("  1066 – Leading whitespace"));
        assert!(!is_event_entry_text("1812 - Hyphen only"));
        assert!(!is_event_entry_text("Pre-1600"));
        assert!(!is_event_entry_text("c. 1500 – Approximate"));
    }
}
