//! Serde helpers for registrar timestamps.
//!
//! Serializes `Option<DateTime<Utc>>` as RFC 3339. Deserializes RFC 3339
//! strings, plain `YYYY-MM-DD` dates, or Unix timestamps in seconds or
//! milliseconds, since registrars report expiry dates in all of these forms.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OptionalTimestamp {
        String(String),
        I64(i64),
        F64(f64),
    }

    match Option::<OptionalTimestamp>::deserialize(deserializer)? {
        Some(OptionalTimestamp::String(s)) => parse_timestamp_str(&s)
            .map(Some)
            .ok_or_else(|| Error::custom(format!("Invalid timestamp: {s}"))),
        Some(OptionalTimestamp::I64(ts)) => parse_unix_timestamp(ts)
            .map(Some)
            .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
        #[allow(clippy::cast_possible_truncation)]
        Some(OptionalTimestamp::F64(ts)) => parse_unix_timestamp(ts as i64)
            .map(Some)
            .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
        None => Ok(None),
    }
}

/// Parse RFC 3339 or a bare date (taken as midnight UTC).
pub fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Seconds or milliseconds, guessed from magnitude.
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, with = "super")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn accepts_rfc3339_date_and_epoch() {
        let a: Holder = serde_json::from_str(r#"{"at":"2027-05-01T00:00:00Z"}"#).unwrap();
        let b: Holder = serde_json::from_str(r#"{"at":"2027-05-01"}"#).unwrap();
        let c: Holder = serde_json::from_str(r#"{"at":1809129600000}"#).unwrap();
        let d: Holder = serde_json::from_str(r#"{"at":1809129600}"#).unwrap();
        assert_eq!(a.at, b.at);
        assert_eq!(c.at, d.at);
        assert_eq!(a.at.unwrap().year(), 2027);
    }

    #[test]
    fn missing_is_none() {
        let h: Holder = serde_json::from_str("{}").unwrap();
        assert!(h.at.is_none());
    }
}
