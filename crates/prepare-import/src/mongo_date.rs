//! Dates in MongoDB extended JSON form: `{"$date": "2014-01-01T00:00:00.000+0000"}`.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MongoDate(NaiveDate);

#[derive(Serialize, Deserialize)]
struct ExtendedJsonDate {
    #[serde(rename = "$date")]
    date: String,
}

impl MongoDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Parse the `$date` string. Both `+0000` and RFC 3339 offsets are
    /// accepted; the time of day is dropped.
    pub fn parse(value: &str) -> Option<Self> {
        DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.3f%z")
            .or_else(|_| DateTime::parse_from_rfc3339(value))
            .ok()
            .map(|dt| Self(dt.naive_utc().date()))
    }
}

impl fmt::Display for MongoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T00:00:00.000+0000", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for MongoDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for MongoDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ExtendedJsonDate {
            date: self.to_string(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MongoDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wrapper = ExtendedJsonDate::deserialize(deserializer)?;
        Self::parse(&wrapper.date)
            .ok_or_else(|| de::Error::custom(format!("invalid $date: {}", wrapper.date)))
    }
}
