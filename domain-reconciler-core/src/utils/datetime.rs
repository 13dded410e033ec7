//! Datetime serialization/deserialization helpers.
//!
//! Provides custom Serde serialization/deserialization support:
//! - Serialization: `DateTime<Utc>` -> RFC3339 string (microseconds, `Z` suffix)
//! - Deserialization: RFC3339 string or Unix timestamp -> `DateTime<Utc>`
//!
//! Stores persist timestamps as text through [`to_storage`]. The fixed-width
//! format keeps lexicographic order equal to chronological order, so range
//! filters (`created_at < cutoff`, `locked_until < now`) work on the raw column.
//! That only holds when every writer of the table uses this format: a row
//! written as `2024-03-08T12:00:00Z` or with a `+08:00` offset still parses,
//! but compares wrongly against encoded values. Anything else inserting into
//! the same tables must pass its timestamps through [`to_storage`] first.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Encodes a timestamp for a text column.
#[must_use]
pub fn to_storage(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decodes a timestamp written by [`to_storage`] (any RFC3339 string is accepted).
pub fn from_storage(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Serializes `DateTime<Utc>` as an RFC3339 string.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_storage(dt))
}

/// Deserializes `DateTime<Utc>` from RFC3339 or Unix timestamp.
///
/// Unix timestamps are auto-detected as seconds or milliseconds.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TimestampOrString {
        String(String),
        I64(i64),
    }

    match TimestampOrString::deserialize(deserializer)? {
        TimestampOrString::String(s) => {
            from_storage(&s).map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}")))
        }
        TimestampOrString::I64(ts) => {
            parse_unix_timestamp(ts).ok_or_else(|| Error::custom("Invalid Unix timestamp"))
        }
    }
}

/// `Option<DateTime<Utc>>` serializer/deserializer helpers.
pub mod option {
    use super::{parse_unix_timestamp, to_storage, DateTime, Deserialize, Deserializer, Serializer, Utc};

    /// Serializes `Option<DateTime<Utc>>` as RFC3339 or `null`.
    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&to_storage(dt)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes `Option<DateTime<Utc>>` from RFC3339, Unix timestamp, or `null`.
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
        }

        match Option::<OptionalTimestamp>::deserialize(deserializer)? {
            Some(OptionalTimestamp::String(s)) => super::from_storage(&s)
                .map(Some)
                .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}"))),
            Some(OptionalTimestamp::I64(ts)) => parse_unix_timestamp(ts)
                .map(Some)
                .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
            None => Ok(None),
        }
    }
}

/// Parses a Unix timestamp with second/millisecond auto-detection.
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    // Values larger than 10^11 are interpreted as milliseconds.
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn storage_order_matches_time_order() {
        let base = Utc.with_ymd_and_hms(2024, 1, 9, 23, 59, 59).unwrap();
        let later = base + Duration::milliseconds(1);
        let much_later = base + Duration::days(2);
        assert!(to_storage(&base) < to_storage(&later));
        assert!(to_storage(&later) < to_storage(&much_later));
        assert_eq!(to_storage(&base), "2024-01-09T23:59:59.000000Z");
    }

    #[test]
    fn storage_form_is_canonical_for_any_rfc3339_input() {
        // 外部写入者的常见格式都归一成同一个定宽字符串
        let canonical = "2024-03-08T12:00:00.000000Z";
        for raw in [
            "2024-03-08T12:00:00Z",
            "2024-03-08T12:00:00.000Z",
            "2024-03-08T20:00:00+08:00",
            canonical,
        ] {
            assert_eq!(to_storage(&from_storage(raw).unwrap()), canonical, "{raw}");
        }
        // 未归一的写法不能直接参与文本比较
        assert!("2024-03-08T12:00:00Z" > canonical);
    }

    #[test]
    fn storage_round_trips() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap() + Duration::microseconds(42);
        assert_eq!(from_storage(&to_storage(&now)).unwrap(), now);
        assert!(from_storage("yesterday").is_err());
    }

    #[test]
    fn unix_millis_detected() {
        let secs = parse_unix_timestamp(1_700_000_000).unwrap();
        let millis = parse_unix_timestamp(1_700_000_000_000).unwrap();
        assert_eq!(secs, millis);
    }
}
