// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

// 2026-01-01T00:00:00Z
const NEW_YEAR_MS: u64 = 1_767_225_600_000;

#[test]
fn rfc3339_is_utc_with_millis() {
    assert_eq!(rfc3339(NEW_YEAR_MS), "2026-01-01T00:00:00.000Z");
    assert_eq!(rfc3339(NEW_YEAR_MS + 1_500), "2026-01-01T00:00:01.500Z");
}

#[parameterized(
    zulu = { "2026-01-01T00:00:00Z", Some(NEW_YEAR_MS) },
    offset = { "2026-01-01T01:00:00+01:00", Some(NEW_YEAR_MS) },
    padded = { " 2026-01-01T00:00:00.000Z ", Some(NEW_YEAR_MS) },
    garbage = { "yesterday", None },
    pre_epoch = { "1969-12-31T23:59:59Z", None },
)]
fn parses(input: &str, expected: Option<u64>) {
    assert_eq!(parse_rfc3339(input), expected);
}

#[test]
fn last_seen_formats() {
    assert_eq!(last_seen(Some(NEW_YEAR_MS + 61_000)), "2026-01-01 00:01:01");
    assert_eq!(last_seen(None), "never");
}

#[test]
fn optional_fields_accept_null() {
    #[derive(serde::Deserialize, serde::Serialize)]
    struct Probe {
        #[serde(default, with = "opt_ms")]
        at: Option<u64>,
    }

    let probe: Probe = serde_json::from_str(r#"{"at": null}"#).unwrap();
    assert_eq!(probe.at, None);
    let probe: Probe = serde_json::from_str(r#"{}"#).unwrap();
    assert_eq!(probe.at, None);
    let probe: Probe = serde_json::from_str(r#"{"at": "2026-01-01T00:00:00Z"}"#).unwrap();
    assert_eq!(probe.at, Some(NEW_YEAR_MS));
    assert_eq!(
        serde_json::to_string(&probe).unwrap(),
        r#"{"at":"2026-01-01T00:00:00.000Z"}"#
    );
}
