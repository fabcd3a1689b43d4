//! `coord` template parsing.
//!
//! Only the degrees/minutes/seconds form with explicit hemispheres is
//! understood:
//!
//! ```text
//! {{coord|33|52|04|S|151|12|36|E|type:city}}
//! ```
//!
//! Decimal-only and degrees/minutes-only variants yield no coordinates.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::event::{Coordinates, round_coordinate};
use crate::utils::compile_static_regex;

static COORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r"(?i)\bcoord\s*\|\s*(\d+(?:\.\d+)?)\s*\|\s*(\d+(?:\.\d+)?)\s*\|\s*(\d+(?:\.\d+)?)\s*\|\s*([NS])\s*\|\s*(\d+(?:\.\d+)?)\s*\|\s*(\d+(?:\.\d+)?)\s*\|\s*(\d+(?:\.\d+)?)\s*\|\s*([EW])\b",
    )
});

/// Finds the first DMS `coord` template in `source` and converts it.
#[must_use]
pub fn parse_coord_template(source: &str) -> Option<Coordinates> {
    let captures = COORD_RE.captures(source)?;
    let latitude = dms_from_captures(&captures, 1)?;
    let longitude = dms_from_captures(&captures, 5)?;
    Some(Coordinates::new(latitude, longitude))
}

/// `round(degrees + minutes/60 + seconds/3600, 4)`, negated for `S` and `W`.
#[must_use]
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, hemisphere: char) -> f64 {
    let value = round_coordinate(degrees + minutes / 60.0 + seconds / 3600.0);
    match hemisphere.to_ascii_uppercase() {
        'S' | 'W' => -value,
        _ => value,
    }
}

fn dms_from_captures(captures: &Captures<'_>, first: usize) -> Option<f64> {
    let number = |index: usize| captures.get(index)?.as_str().parse::<f64>().ok();
    let hemisphere = captures.get(first + 3)?.as_str().chars().next()?;
    Some(dms_to_decimal(
        number(first)?,
        number(first + 1)?,
        number(first + 2)?,
        hemisphere,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sydney_template_converts_to_decimal() {
        let coordinates = parse_coord_template(
            "'''Sydney''' {{Infobox}} {{coord|33|52|04|S|151|12|36|E|type:city}} is",
        )
        .unwrap();
        assert_eq!(coordinates.latitude, -33.8678);
        assert_eq!(coordinates.longitude, 151.21);
    }

    #[test]
    fn test_fractional_seconds_are_accepted() {
        let coordinates = parse_coord_template("{{coord|28|36|04.6|N|77|12|49.4|E}}").unwrap();
        assert_eq!(coordinates.latitude, 28.6013);
        assert_eq!(coordinates.longitude, 77.2137);
    }

    #[test]
    fn test_template_name_case_and_spacing_are_tolerated() {
        let coordinates =
            parse_coord_template("{{Coord | 40 | 42 | 46 | N | 74 | 0 | 22 | W | display=title}}")
                .unwrap();
        assert_eq!(coordinates.latitude, 40.7128);
        assert_eq!(coordinates.longitude, -74.0061);
    }

    #[test]
    fn test_first_template_wins() {
        let coordinates = parse_coord_template(
            "{{coord|1|0|0|N|2|0|0|E}} later {{coord|3|0|0|S|4|0|0|W}}",
        )
        .unwrap();
        assert_eq!(coordinates.latitude, 1.0);
        assert_eq!(coordinates.longitude, 2.0);
    }

    #[test]
    fn test_unsupported_forms_yield_none() {
        assert!(parse_coord_template("{{coord|-33.8678|151.21|type:city}}").is_none());
        assert!(parse_coord_template("{{coord|33|52|S|151|12|E}}").is_none());
        assert!(parse_coord_template("no template here").is_none());
        assert!(parse_coord_template("").is_none());
    }

    #[test]
    fn test_dms_to_decimal_hemispheres() {
        assert_eq!(dms_to_decimal(10.0, 30.0, 0.0, 'N'), 10.5);
        assert_eq!(dms_to_decimal(10.0, 30.0, 0.0, 's'), -10.5);
        assert_eq!(dms_to_decimal(0.0, 0.0, 36.0, 'W'), -0.01);
        assert_eq!(dms_to_decimal(0.0, 0.0, 36.0, 'E'), 0.01);
    }
}
