//! Coordinate resolution for linked pages.
//!
//! [`CoordinateResolver`] fetches a page's wikitext through the REST API and
//! hands it to [`parse_coord_template`]. Absence (no page, no template) is
//! `Ok(None)`; only transport trouble and unexpected statuses are errors.

mod coordinates;
mod error;
mod wiki;

pub use coordinates::{dms_to_decimal, parse_coord_template};
pub use error::ResolveError;
pub use wiki::{CoordinateResolver, DEFAULT_REST_BASE_URL};
