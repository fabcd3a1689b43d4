//! Parses a single events-section entry into year, description and links.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::utils::{compile_static_regex, compile_static_selector};

use super::{EntryError, RawEntry};

/// Origin that relative `/wiki/` links are rewritten against.
pub const WIKI_ORIGIN: &str = "https://en.wikipedia.org";

const WIKI_HOST: &str = "en.wikipedia.org";
const WIKI_PATH_PREFIX: &str = "/wiki/";
const BC_SUFFIX: &str = "BC";

/// First ` – ` (or ` — `) between the year and the description. In markup the
/// surrounding spaces may be serialized as `&nbsp;`.
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?:\s|&nbsp;)[–—](?:\s|&nbsp;)"));

static CITATION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("sup"));

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("a"));

/// What to do with a non-wiki anchor met while collecting link candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkPolicy {
    /// Stop collecting candidates for the entry at the first non-wiki anchor.
    #[default]
    StopAtExternal,
    /// Ignore non-wiki anchors and keep collecting.
    SkipExternal,
}

/// Year, normalized description and coordinate candidates of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    /// Negative for BC.
    pub year: i32,
    /// Description markup with absolute wiki links and no citation markers.
    pub description: String,
    /// Linked page titles in document order, as they appear in the hrefs.
    pub links: Vec<String>,
}

/// Parses one entry.
///
/// Citation markers (`<sup>`) are removed first; the year comes from the text
/// before the first dash separator; the description is the markup after it.
///
/// # Errors
///
/// Returns [`EntryError`] when the separator is missing or the year token is
/// not a number.
pub fn parse_entry(entry: &RawEntry, policy: LinkPolicy) -> Result<ParsedEntry, EntryError> {
    let mut fragment = Html::parse_fragment(entry.inner_html());
    strip_citations(&mut fragment);

    let root = fragment.root_element();
    let text: String = root.text().collect();
    let (year_token, _) =
        split_on_separator(&text).ok_or_else(|| EntryError::missing_separator(&text))?;
    let year = parse_year(year_token)?;

    let markup = root.inner_html();
    let (_, description_markup) =
        split_on_separator(&markup).ok_or_else(|| EntryError::missing_separator(&text))?;

    Ok(ParsedEntry {
        year,
        links: outbound_links(description_markup, policy),
        description: absolutize_wiki_links(description_markup.trim()),
    })
}

/// Parses a year token: `"1812"` -> `1812`, `"573 BC"` -> `-573`.
///
/// # Errors
///
/// Returns [`EntryError::InvalidYear`] for anything else.
pub fn parse_year(token: &str) -> Result<i32, EntryError> {
    let token = token.trim();
    let (digits, negate) = match token.strip_suffix(BC_SUFFIX) {
        Some(rest) => (rest.trim_end(), true),
        None => (token, false),
    };
    let value: i32 = digits
        .parse()
        .map_err(|_| EntryError::invalid_year(token))?;
    Ok(if negate { -value } else { value })
}

/// Rewrites every `href="/wiki/...` to an absolute English Wikipedia URL,
/// leaving all other markup untouched.
#[must_use]
pub fn absolutize_wiki_links(markup: &str) -> String {
    markup.replace(
        "href=\"/wiki/",
        &format!("href=\"{WIKI_ORIGIN}{WIKI_PATH_PREFIX}"),
    )
}

/// Page title targeted by a wiki-style href, or `None` for anything else.
///
/// Accepts `/wiki/Title`, `https://en.wikipedia.org/wiki/Title` and the
/// protocol-relative form. The `#fragment` and query are dropped.
#[must_use]
pub fn wiki_page_title(href: &str) -> Option<String> {
    let href = href.trim();
    let path = if href.starts_with(WIKI_PATH_PREFIX) {
        href.to_string()
    } else {
        let absolute = match href.strip_prefix("//") {
            Some(rest) => format!("https://{rest}"),
            None => href.to_string(),
        };
        let url = Url::parse(&absolute).ok()?;
        if !url.host_str()?.eq_ignore_ascii_case(WIKI_HOST) {
            return None;
        }
        url.path().to_string()
    };

    let title = path
        .strip_prefix(WIKI_PATH_PREFIX)?
        .split(['#', '?'])
        .next()
        .unwrap_or_default();
    (!title.is_empty()).then(|| title.to_string())
}

fn outbound_links(description_markup: &str, policy: LinkPolicy) -> Vec<String> {
    let fragment = Html::parse_fragment(description_markup);
    let mut links = Vec::new();
    for anchor in fragment.select(&ANCHOR_SELECTOR) {
        match anchor.value().attr("href").and_then(wiki_page_title) {
            Some(title) => links.push(title),
            None if policy == LinkPolicy::StopAtExternal => break,
            None => {}
        }
    }
    links
}

fn strip_citations(fragment: &mut Html) {
    let citation_ids: Vec<_> = fragment
        .select(&CITATION_SELECTOR)
        .map(|citation| citation.id())
        .collect();
    for id in citation_ids {
        if let Some(mut node) = fragment.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn split_on_separator(value: &str) -> Option<(&str, &str)> {
    let found = SEPARATOR_RE.find(value)?;
    Some((&value[..found.start()], &value[found.end()..]))
}
