//! Batch keys (`AAMM`, or `AAMM_NN` for a sub-batch).

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{PrepareImportError, Result};

static VALID_BATCH_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}").expect("valid batch key regex"));

static VALID_SUB_BATCH_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})_([0-9]{2})$").expect("valid sub-batch key regex"));

/// Validated batch key. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BatchKey(String);

impl BatchKey {
    pub fn new(key: &str) -> Result<Self> {
        if !VALID_BATCH_KEY.is_match(key) {
            return Err(PrepareImportError::InvalidBatchKey);
        }
        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `/<key>/`, the prefix of every file path stored in the manifest.
    pub fn path(&self) -> String {
        format!("/{}/", self.0)
    }

    pub fn is_sub_batch(&self) -> bool {
        VALID_SUB_BATCH_KEY.is_match(&self.0)
    }

    /// Four-digit parent key of a sub-batch, `None` for a top-level batch.
    pub fn parent_batch(&self) -> Option<&str> {
        VALID_SUB_BATCH_KEY
            .captures(&self.0)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// First day of the batch month: year `20AA`, month `MM`.
    ///
    /// Months outside 1..=12 roll over into the neighbouring years.
    pub fn date_fin(&self) -> NaiveDate {
        let digits = self.0.as_bytes();
        let digit = |i: usize| i32::from(digits[i] - b'0');
        let year = 2000 + digit(0) * 10 + digit(1);
        let month = digit(2) * 10 + digit(3);

        let months = year * 12 + month - 1;
        NaiveDate::from_ymd_opt(months.div_euclid(12), months.rem_euclid(12) as u32 + 1, 1)
            .unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for BatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BatchKey {
    type Error = PrepareImportError;

    fn try_from(key: String) -> Result<Self> {
        Self::new(&key)
    }
}

impl From<BatchKey> for String {
    fn from(key: BatchKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        for key in ["1802", "1802_01", "180201"] {
            let batch_key = BatchKey::new(key).unwrap();
            assert_eq!(batch_key.as_str(), key);
            assert_eq!(batch_key.path(), format!("/{}/", key));
        }
    }

    #[test]
    fn test_invalid_keys() {
        for key in ["", "180", "18a2", "a1802"] {
            let err = BatchKey::new(key).unwrap_err();
            assert_eq!(
                err.to_string(),
                "la clé du batch doit respecter le format requis AAMM"
            );
        }
    }

    #[test]
    fn test_sub_batch() {
        let sub = BatchKey::new("1802_01").unwrap();
        assert!(sub.is_sub_batch());
        assert_eq!(sub.parent_batch(), Some("1802"));

        let top = BatchKey::new("1802").unwrap();
        assert!(!top.is_sub_batch());
        assert_eq!(top.parent_batch(), None);

        assert!(!BatchKey::new("1802_1").unwrap().is_sub_batch());
    }

    #[test]
    fn test_date_fin() {
        let date = |y, m| NaiveDate::from_ymd_opt(y, m, 1).unwrap();
        assert_eq!(BatchKey::new("1912").unwrap().date_fin(), date(2019, 12));
        assert_eq!(BatchKey::new("1802_01").unwrap().date_fin(), date(2018, 2));
        assert_eq!(BatchKey::new("1913").unwrap().date_fin(), date(2020, 1));
        assert_eq!(BatchKey::new("2000").unwrap().date_fin(), date(2019, 12));
    }

    #[test]
    fn test_serde_validates() {
        let key: BatchKey = serde_json::from_str("\"2011\"").unwrap();
        assert_eq!(key.as_str(), "2011");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2011\"");
        assert!(serde_json::from_str::<BatchKey>("\"20\"").is_err());
    }
}
