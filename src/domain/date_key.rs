use crate::domain::JournalError;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const KEY_FORMAT: &str = "%Y-%m-%d";
const LABEL_FORMAT: &str = "%A, %B %-d, %Y";

/// Canonical `YYYY-MM-DD` identity of an entry and of a calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn today() -> Self {
        Self(today())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn label(&self) -> String {
        self.0.format(LABEL_FORMAT).to_string()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key(s).map(Self)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Today's date from the local calendar fields. No UTC conversion.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn to_key(date: NaiveDate) -> String {
    date.format(KEY_FORMAT).to_string()
}

/// Long-form label such as "Friday, January 5, 2024".
pub fn to_label(key: &str) -> Result<String, JournalError> {
    Ok(parse_key(key)?.format(LABEL_FORMAT).to_string())
}

/// Strict parse: four digit year, two digit month and day.
pub fn parse_key(key: &str) -> Result<NaiveDate, JournalError> {
    let bytes = key.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !well_formed {
        return Err(JournalError::InvalidDateKey(key.to_string()));
    }

    NaiveDate::parse_from_str(key, KEY_FORMAT)
        .map_err(|_| JournalError::InvalidDateKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_to_key_zero_pads() {
        assert_eq!(to_key(date(2024, 1, 5)), "2024-01-05");
        assert_eq!(to_key(date(987, 12, 31)), "0987-12-31");
    }

    #[test]
    fn test_to_label_long_form() {
        assert_eq!(to_label("2024-01-05").unwrap(), "Friday, January 5, 2024");
        assert_eq!(to_label("2024-02-29").unwrap(), "Thursday, February 29, 2024");
    }

    #[test]
    fn test_keys_are_unique_within_a_month() {
        let keys: HashSet<String> = (1..=31).map(|d| to_key(date(2024, 3, d))).collect();
        assert_eq!(keys.len(), 31);

        for d in 1..=31 {
            let key = to_key(date(2024, 3, d));
            let label = to_label(&key).unwrap();
            assert!(label.contains("March"));
            assert!(label.contains("2024"));
            assert!(label.contains(&format!(" {},", d)));
        }
    }

    #[test]
    fn test_parse_key_rejects_malformed() {
        for bad in ["2024-2-5", "2024/02/05", "20240205", "2023-02-29", "", "abcd-ef-gh"] {
            assert!(
                matches!(parse_key(bad), Err(JournalError::InvalidDateKey(_))),
                "{bad} should be rejected"
            );
        }
        assert!(to_label("2024-13-01").is_err());
    }

    #[test]
    fn test_date_key_serde_uses_canonical_string() {
        let key = DateKey::new(date(2024, 2, 29));
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-02-29\"");

        let parsed: DateKey = serde_json::from_str("\"2024-02-29\"").unwrap();
        assert_eq!(parsed, key);
        assert!(serde_json::from_str::<DateKey>("\"29/02/2024\"").is_err());
    }
}
