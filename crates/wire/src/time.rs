// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timestamp rendering. State keeps epoch milliseconds; the wire uses
//! RFC 3339 in UTC.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn datetime(ms: u64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(i64::try_from(ms).ok()?)
}

pub fn rfc3339(ms: u64) -> String {
    datetime(ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

pub fn parse_rfc3339(s: &str) -> Option<u64> {
    let dt = DateTime::parse_from_rfc3339(s.trim()).ok()?;
    u64::try_from(dt.timestamp_millis()).ok()
}

/// Dashboard form of a heartbeat: `%Y-%m-%d %H:%M:%S`, or `never`.
pub fn last_seen(ms: Option<u64>) -> String {
    match ms.and_then(datetime) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "never".to_string(),
    }
}

/// serde adapter for `u64` millisecond fields carried as RFC 3339 strings.
pub mod ms {
    use super::*;

    pub fn serialize<S: Serializer>(ms: &u64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&rfc3339(*ms))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(d)?;
        parse_rfc3339(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid datetime {raw:?}")))
    }
}

/// Like [`ms`], for optional fields. Accepts `null`.
pub mod opt_ms {
    use super::*;

    pub fn serialize<S: Serializer>(ms: &Option<u64>, s: S) -> Result<S::Ok, S::Error> {
        match ms {
            Some(ms) => s.serialize_some(&rfc3339(*ms)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => parse_rfc3339(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime {raw:?}"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod tests;
