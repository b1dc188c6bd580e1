//! Date range filtering
//!
//! Both ends are optional and inclusive. The repository compares `yyyy-MM-dd`
//! keys as strings, so an open end is widened to the earliest or latest date
//! that still formats as a four-digit year.
//!
//! # Examples
//!
//! ```
//! use ccmeter::filters::DateFilter;
//! use chrono::NaiveDate;
//!
//! let filter = DateFilter::new()
//!     .with_since(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
//!
//! assert!(filter.contains_key("2025-08-06"));
//! assert!(!filter.contains_key("2025-07-31"));
//! assert_eq!(filter.bounds().1, NaiveDate::from_ymd_opt(9999, 12, 31).unwrap());
//! ```

use chrono::NaiveDate;

/// Inclusive calendar-date range with optional ends
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateFilter {
    /// Start date (inclusive)
    pub since: Option<NaiveDate>,
    /// End date (inclusive)
    pub until: Option<NaiveDate>,
}

impl DateFilter {
    /// A filter with no restrictions
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_since(mut self, date: NaiveDate) -> Self {
        self.since = Some(date);
        self
    }

    pub fn with_until(mut self, date: NaiveDate) -> Self {
        self.until = Some(date);
        self
    }

    /// True when neither end is set
    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.since.is_none_or(|since| date >= since) && self.until.is_none_or(|until| date <= until)
    }

    /// Match a `yyyy-MM-dd` key by string comparison
    pub fn contains_key(&self, date_key: &str) -> bool {
        let (start, end) = self.bound_keys();
        start.as_str() <= date_key && date_key <= end.as_str()
    }

    /// Both ends, with open ends widened to year 1 and year 9999
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        (
            self.since.unwrap_or(earliest()),
            self.until.unwrap_or(latest()),
        )
    }

    fn bound_keys(&self) -> (String, String) {
        let (start, end) = self.bounds();
        (date_key(start), date_key(end))
    }
}

/// `yyyy-MM-dd` form of a date
pub fn date_key(date: NaiveDate) -> String {
    date.format(ccmeter_core::timezone::DATE_FORMAT).to_string()
}

fn earliest() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn latest() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}
