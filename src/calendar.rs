//! Calendar table and validated `(month, day)` requests.
//!
//! The month table is a process-wide constant. February is fixed at 29 days
//! for every run so that February 29 is always collected; there is no
//! leap-year logic anywhere in the crate.

use std::fmt;

use crate::collector::CollectError;

/// Month names and their day counts, in calendar order.
pub const MONTHS_WITH_DAYS: [(&str, u8); 12] = [
    ("January", 31),
    ("February", 29),
    ("March", 31),
    ("April", 30),
    ("May", 31),
    ("June", 30),
    ("July", 31),
    ("August", 31),
    ("September", 30),
    ("October", 31),
    ("November", 30),
    ("December", 31),
];

/// A calendar month, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(u8);

impl Month {
    /// Returns the month for a 1-based number, or `None` outside `1..=12`.
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        (1..=12).contains(&number).then_some(Self(number))
    }

    /// Iterates January through December.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=12).map(Self)
    }

    /// 1-based month number.
    #[must_use]
    pub fn number(self) -> u8 {
        self.0
    }

    /// Full English month name.
    #[must_use]
    pub fn name(self) -> &'static str {
        MONTHS_WITH_DAYS[self.index()].0
    }

    /// Number of days collected for this month (February is always 29).
    #[must_use]
    pub fn days(self) -> u8 {
        MONTHS_WITH_DAYS[self.index()].1
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated day of the year to collect events for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay {
    month: Month,
    day: u8,
}

impl CalendarDay {
    /// Validates a numeric `(month, day)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::InvalidInput`] when the month is outside `1..=12`
    /// or the day is outside the month's range.
    pub fn new(month: u8, day: u8) -> Result<Self, CollectError> {
        let Some(month) = Month::from_number(month) else {
            return Err(CollectError::invalid_input(
                month,
                day,
                "month must be between 1 and 12",
            ));
        };
        Self::for_month(month, day)
    }

    /// Validates a day number against an already known month.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::InvalidInput`] when the day is outside the month's range.
    pub fn for_month(month: Month, day: u8) -> Result<Self, CollectError> {
        if day == 0 || day > month.days() {
            return Err(CollectError::invalid_input(
                month.number(),
                day,
                &format!("{} has days 1 to {}", month.name(), month.days()),
            ));
        }
        Ok(Self { month, day })
    }

    /// Every collectable day of `month`, in order.
    pub fn days_of(month: Month) -> impl Iterator<Item = Self> {
        (1..=month.days()).map(move |day| Self { month, day })
    }

    /// Every collectable day of the year (366 days).
    pub fn all() -> impl Iterator<Item = Self> {
        Month::all().flat_map(Self::days_of)
    }

    #[must_use]
    pub fn month(self) -> Month {
        self.month
    }

    #[must_use]
    pub fn day(self) -> u8 {
        self.day
    }

    /// Title of the Wikipedia day page, e.g. `January_1`.
    #[must_use]
    pub fn page_title(self) -> String {
        format!("{}_{}", self.month.name(), self.day)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month.name(), self.day)
    }
}
