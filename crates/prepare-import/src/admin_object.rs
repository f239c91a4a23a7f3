//! The manifest stored in the `Admin` collection.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::batch_key::BatchKey;
use crate::file_type::ValidFileType;
use crate::files_property::FilesProperty;
use crate::mongo_date::MongoDate;
use crate::Result;

/// Start of the period covered by every batch.
pub static DATE_DEBUT: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2014, 1, 1).expect("valid date_debut"));

pub const BATCH_ID_TYPE: &str = "batch";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdminId {
    pub key: BatchKey,
    #[serde(rename = "type")]
    pub kind: String,
}

impl AdminId {
    pub fn batch(key: BatchKey) -> Self {
        Self {
            key,
            kind: BATCH_ID_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamProperty {
    pub date_debut: MongoDate,
    pub date_fin: MongoDate,
    pub date_fin_effectif: MongoDate,
}

impl ParamProperty {
    pub fn new(batch_key: &BatchKey, date_fin_effectif: NaiveDate) -> Self {
        Self {
            date_debut: MongoDate::new(*DATE_DEBUT),
            date_fin: MongoDate::new(batch_key.date_fin()),
            date_fin_effectif: MongoDate::new(date_fin_effectif),
        }
    }
}

/// Batch manifest. Empty collections are left out of the JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminObject {
    #[serde(rename = "_id")]
    pub id: AdminId,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub complete_types: Vec<ValidFileType>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub files: BTreeMap<ValidFileType, Vec<String>>,

    pub param: ParamProperty,
}

impl AdminObject {
    pub fn new(batch_key: &BatchKey, files: &FilesProperty, date_fin_effectif: NaiveDate) -> Self {
        Self {
            id: AdminId::batch(batch_key.clone()),
            complete_types: files.complete_types(),
            files: files.to_paths(),
            param: ParamProperty::new(batch_key, date_fin_effectif),
        }
    }

    /// Pretty JSON with a two-space indent.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

/// Files of a batch that no type matched. The manifest built alongside it
/// remains usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported: {}", .files.join(", "))]
pub struct UnsupportedFilesError {
    pub files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files_property::BatchFile;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_json_layout() {
        let key = BatchKey::new("1912").unwrap();
        let mut files = FilesProperty::default();
        files.push(
            ValidFileType::Effectif,
            BatchFile::new(key.clone(), "sigfaibles_effectif_siret.csv"),
        );
        let admin = AdminObject::new(&key, &files, date(2019, 6, 1));

        let expected = r#"{
  "_id": {
    "key": "1912",
    "type": "batch"
  },
  "complete_types": [
    "effectif"
  ],
  "files": {
    "effectif": [
      "/1912/sigfaibles_effectif_siret.csv"
    ]
  },
  "param": {
    "date_debut": {
      "$date": "2014-01-01T00:00:00.000+0000"
    },
    "date_fin": {
      "$date": "2019-12-01T00:00:00.000+0000"
    },
    "date_fin_effectif": {
      "$date": "2019-06-01T00:00:00.000+0000"
    }
  }
}"#;
        assert_eq!(admin.to_json().unwrap(), expected);
    }

    #[test]
    fn test_empty_collections_are_omitted() {
        let key = BatchKey::new("1802").unwrap();
        let admin = AdminObject::new(&key, &FilesProperty::default(), date(2018, 1, 1));
        let value: serde_json::Value = serde_json::from_str(&admin.to_json().unwrap()).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("files"));
        assert!(!object.contains_key("complete_types"));
        assert!(object.contains_key("param"));
    }

    #[test]
    fn test_from_json() {
        let key = BatchKey::new("2002_01").unwrap();
        let mut files = FilesProperty::default();
        files.push(
            ValidFileType::Procol,
            BatchFile::new(key.clone(), "Sigfaible_pcoll.csv.gz").with_gzipped_size(3),
        );
        let admin = AdminObject::new(&key, &files, date(2020, 1, 1));

        let parsed = AdminObject::from_json(&admin.to_json().unwrap()).unwrap();
        assert_eq!(parsed, admin);
        assert_eq!(
            parsed.files[&ValidFileType::Procol],
            vec!["gzip:/2002_01/Sigfaible_pcoll.csv.gz"]
        );
    }

    #[test]
    fn test_from_json_rejects_bad_batch_key() {
        let json = r#"{"_id":{"key":"20","type":"batch"},"param":{
            "date_debut":{"$date":"2014-01-01T00:00:00.000+0000"},
            "date_fin":{"$date":"2020-01-01T00:00:00.000+0000"},
            "date_fin_effectif":{"$date":"2020-01-01T00:00:00.000+0000"}}}"#;
        assert!(AdminObject::from_json(json).is_err());
    }

    #[test]
    fn test_unsupported_message() {
        let err = UnsupportedFilesError {
            files: vec!["/1802/a.csv".to_string(), "/1802/b.csv".to_string()],
        };
        assert_eq!(err.to_string(), "unsupported: /1802/a.csv, /1802/b.csv");
    }
}
