//! # Load Date Value Object
//!
//! Validated calendar date for a sync run.
//!
//! Every sync run targets exactly one calendar date. The feeds take the date
//! as a Unix timestamp (seconds at midnight UTC) while the store tags records
//! with the `YYYY-MM-DD` rendering, so the type owns both conversions.
//!
//! # Examples
//!
//! ```
//! use restaurant_sync::domain::value_objects::load_date::LoadDate;
//!
//! let date = LoadDate::parse("2020-08-17").unwrap();
//!
//! assert_eq!(date.to_string(), "2020-08-17");
//! assert_eq!(date.unix_seconds(), 1597622400);
//! assert!(LoadDate::parse("17/08/2020").is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated `YYYY-MM-DD` calendar date identifying one sync run.
///
/// Construction goes through [`parse`](LoadDate::parse); a malformed string
/// is rejected before any feed or store I/O can happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadDate(NaiveDate);

impl LoadDate {
    /// Date layout accepted from callers and written to the store.
    pub const LAYOUT: &'static str = "%Y-%m-%d";

    /// Parses a `YYYY-MM-DD` string into a load date.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DateFormat`] when the string does not match
    /// the layout or names an impossible date.
    ///
    /// # Examples
    ///
    /// ```
    /// use restaurant_sync::domain::value_objects::load_date::LoadDate;
    ///
    /// assert!(LoadDate::parse("2020-08-17").is_ok());
    /// assert!(LoadDate::parse("2020-02-30").is_err());
    /// assert!(LoadDate::parse("not-a-date").is_err());
    /// ```
    pub fn parse(value: &str) -> DomainResult<Self> {
        NaiveDate::parse_from_str(value, Self::LAYOUT)
            .map(Self)
            .map_err(|e| DomainError::date_format(value, e.to_string()))
    }

    /// Returns the Unix timestamp (seconds) of midnight UTC on this date.
    ///
    /// This is the value the feed endpoints take as their `date` query
    /// parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use restaurant_sync::domain::value_objects::load_date::LoadDate;
    ///
    /// let date = LoadDate::parse("1970-01-02").unwrap();
    /// assert_eq!(date.unix_seconds(), 86400);
    /// ```
    #[inline]
    #[must_use]
    pub fn unix_seconds(&self) -> i64 {
        self.0
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default()
    }

    /// Returns the underlying calendar date.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for LoadDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::LAYOUT))
    }
}

impl From<NaiveDate> for LoadDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}
