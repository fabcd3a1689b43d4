//! Output record types shared by both collection strategies.

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDay;

/// Decimal places kept for latitude and longitude.
const COORDINATE_SCALE: f64 = 10_000.0;

/// Rounds a decimal degree value to 4 decimal places.
#[must_use]
pub fn round_coordinate(value: f64) -> f64 {
    (value * COORDINATE_SCALE).round() / COORDINATE_SCALE
}

/// A resolved geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Positive north, negative south.
    pub latitude: f64,
    /// Positive east, negative west.
    pub longitude: f64,
}

impl Coordinates {
    /// Builds coordinates rounded to the output precision.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round_coordinate(latitude),
            longitude: round_coordinate(longitude),
        }
    }
}

/// A historical event tied to a location.
///
/// Field order is the serialized order; month files rely on it for stable diffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Requested day of the month.
    pub day: u8,
    /// Requested month, full English name.
    pub month: String,
    /// Negative for BC years.
    pub year: i32,
    /// Narrative markup with absolute links and no citation markers.
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Event {
    /// Builds an event for the requested day from a parsed year/description and
    /// one resolved location.
    #[must_use]
    pub fn new(
        day: CalendarDay,
        year: i32,
        description: impl Into<String>,
        coordinates: Coordinates,
    ) -> Self {
        Self {
            day: day.day(),
            month: day.month().name().to_string(),
            year,
            description: description.into(),
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        }
    }
}
