//! Day page extraction: locating the events section and parsing its entries.
//!
//! - [`select_event_entries`] walks a parsed day page and returns the
//!   year-prefixed list items between the `Events` and `Births` anchors.
//! - [`parse_entry`] turns one of those items into a year, a description with
//!   absolute links, and the ordered list of linked page titles that may carry
//!   coordinates.

mod entry;
mod error;
mod section;

pub use entry::{
    LinkPolicy, ParsedEntry, WIKI_ORIGIN, absolutize_wiki_links, parse_entry, parse_year,
    wiki_page_title,
};
pub use error::EntryError;
pub use section::{
    BIRTHS_ANCHOR, EVENTS_ANCHOR, RawEntry, event_entry_nodes, is_event_entry_text,
    select_event_entries,
};
