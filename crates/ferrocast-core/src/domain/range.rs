use std::fmt::{Display, Formatter};

use time::macros::format_description;
use time::{Date, Month};

use crate::ValidationError;

pub const DEFAULT_LOOKBACK_YEARS: u8 = 3;
const MAX_LOOKBACK_YEARS: u8 = 30;

/// Half-open calendar range `[start, end)` used for history requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvertedDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Window covering `years` calendar years back from `today`.
    ///
    /// A February 29 anchor falls back to February 28 in non-leap years.
    pub fn lookback(today: Date, years: u8) -> Result<Self, ValidationError> {
        if years == 0 || years > MAX_LOOKBACK_YEARS {
            return Err(ValidationError::InvalidLookback { years });
        }

        let target_year = today.year() - i32::from(years);
        let start = today.replace_year(target_year).or_else(|_| {
            Date::from_calendar_date(target_year, Month::February, 28)
        });
        let start = start.map_err(|_| ValidationError::InvalidLookback { years })?;

        Self::new(start, today)
    }

    pub const fn start(&self) -> Date {
        self.start
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }

    /// Unix seconds at UTC midnight of `start` and `end`.
    pub fn unix_bounds(&self) -> (i64, i64) {
        (
            self.start.midnight().assume_utc().unix_timestamp(),
            self.end.midnight().assume_utc().unix_timestamp(),
        )
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        ValidationError::InvalidDate {
            value: input.to_owned(),
        }
    })
}
