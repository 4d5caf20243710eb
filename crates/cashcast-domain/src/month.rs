//! Calendar month keys used to index every projection.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{de::Deserializer, Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Raised when text cannot be read as a `YYYY-MM` month key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonthKeyError {
    #[error("invalid month key `{0}`: expected YYYY-MM")]
    Malformed(String),
    #[error("month out of range in `{0}`")]
    MonthOutOfRange(String),
}

/// A calendar month, ordered chronologically and serialised as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Builds a key, returning `None` when `month` is not within `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns `true` when `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Shifts the key by `months`, which may be negative.
    pub fn add_months(&self, months: i32) -> Self {
        let index = self.index() + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// First calendar day of the month, when representable.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    fn index(&self) -> i32 {
        self.year * 12 + self.month as i32 - 1
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let raw = value.trim();
        let (year, month) = raw
            .split_once('-')
            .ok_or_else(|| MonthKeyError::Malformed(raw.to_string()))?;
        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(MonthKeyError::Malformed(raw.to_string()));
        }
        let year: i32 = year
            .parse()
            .map_err(|_| MonthKeyError::Malformed(raw.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthKeyError::Malformed(raw.to_string()))?;
        MonthKey::new(year, month).ok_or_else(|| MonthKeyError::MonthOutOfRange(raw.to_string()))
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(year: i32, month: u32) -> MonthKey {
        MonthKey::new(year, month).unwrap()
    }

    #[test]
    fn parses_and_displays_iso_months() {
        let parsed: MonthKey = "2025-03".parse().unwrap();
        assert_eq!(parsed, key(2025, 3));
        assert_eq!(parsed.to_string(), "2025-03");
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(matches!(
            "2025-3".parse::<MonthKey>(),
            Err(MonthKeyError::Malformed(_))
        ));
        assert!(matches!(
            "March 2025".parse::<MonthKey>(),
            Err(MonthKeyError::Malformed(_))
        ));
        assert!(matches!(
            "2025-13".parse::<MonthKey>(),
            Err(MonthKeyError::MonthOutOfRange(_))
        ));
    }

    #[test]
    fn shifts_across_year_boundaries() {
        assert_eq!(key(2025, 11).add_months(3), key(2026, 2));
        assert_eq!(key(2025, 1).add_months(-1), key(2024, 12));
    }

    #[test]
    fn contains_only_dates_of_the_same_month() {
        let march = key(2025, 3);
        assert!(march.contains(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
        assert!(!march.contains(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
    }

    #[test]
    fn serialises_as_string_map_key() {
        let mut overrides = std::collections::BTreeMap::new();
        overrides.insert(key(2025, 3), 1200.0);
        let json = serde_json::to_string(&overrides).unwrap();
        assert_eq!(json, r#"{"2025-03":1200.0}"#);
        let back: std::collections::BTreeMap<MonthKey, f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, overrides);
    }
}
