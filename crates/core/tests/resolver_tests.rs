//! Integration tests for snapshot loading and next-session resolution.

use std::io::Write;

use chrono::{DateTime, TimeZone, Utc};
use pitwall_core::{
    resolve_next_session, FileSnapshot, InMemorySnapshot, SessionKey, SnapshotError,
};
use serde_json::json;

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn two_races() -> InMemorySnapshot {
    InMemorySnapshot::from_value(&json!([
        {
            "raceName": "Race A",
            "round": 6,
            "schedule": {
                "race": { "date": "2025-05-01", "time": "13:00:00Z" }
            }
        },
        {
            "raceName": "Race B",
            "round": 5,
            "schedule": {
                "qualy": { "date": "2025-04-20", "time": "14:00:00Z" },
                "race": { "date": "2025-04-21", "time": "13:00:00Z" }
            }
        }
    ]))
}

#[test]
fn picks_earliest_future_session_across_races() {
    let got = resolve_next_session(&two_races(), at("2025-04-19T00:00:00Z"))
        .unwrap()
        .unwrap();
    assert_eq!(got.race_name, "Race B");
    assert_eq!(got.round, 5);
    assert_eq!(got.session_key, SessionKey::Qualifying);
    assert_eq!(got.date_time_utc, at("2025-04-20T14:00:00Z"));
}

#[test]
fn skips_sessions_already_started() {
    let got = resolve_next_session(&two_races(), at("2025-04-22T00:00:00Z"))
        .unwrap()
        .unwrap();
    assert_eq!(got.race_name, "Race A");
    assert_eq!(got.session_key, SessionKey::Race);
}

#[test]
fn season_over_is_empty_not_error() {
    let got = resolve_next_session(&two_races(), at("2025-05-01T13:00:01Z")).unwrap();
    assert!(got.is_none());
}

#[test]
fn repeated_calls_agree() {
    let now = at("2025-04-19T00:00:00Z");
    let snap = two_races();
    let first = resolve_next_session(&snap, now).unwrap();
    let second = resolve_next_session(&snap, now).unwrap();
    assert_eq!(first, second);
}

#[test]
fn partial_and_broken_entries_are_skipped() {
    let snap = InMemorySnapshot::from_value(&json!([
        {
            "raceName": "Sprint Weekend",
            "round": 3,
            "schedule": {
                "fp9": { "date": "2025-01-02", "time": "10:00:00Z" },
                "fp1": { "date": "2025-03-01", "time": null },
                "sprintQualy": { "date": null, "time": "10:00:00Z" },
                "sprintRace": { "date": "2025-03-02", "time": "not a time" },
                "qualy": "TBA",
                "race": { "date": "2025-03-03", "time": "15:00:00Z" }
            }
        },
        { "round": 4 },
        42,
        null
    ]));

    let got = resolve_next_session(&snap, at("2025-01-01T00:00:00Z"))
        .unwrap()
        .unwrap();
    assert_eq!(got.race_name, "Sprint Weekend");
    assert_eq!(got.session_key, SessionKey::Race);
    assert_eq!(got.date_time_utc, at("2025-03-03T15:00:00Z"));
}

#[test]
fn same_instant_in_one_race_follows_weekend_order() {
    let snap = InMemorySnapshot::new(
        r#"[{
            "raceName": "Race A",
            "round": 1,
            "schedule": {
                "race": { "date": "2025-05-01", "time": "13:00:00Z" },
                "qualy": { "date": "2025-05-01", "time": "13:00:00Z" }
            }
        }]"#,
    );

    let got = resolve_next_session(&snap, at("2025-04-01T00:00:00Z"))
        .unwrap()
        .unwrap();
    assert_eq!(got.session_key, SessionKey::Qualifying);
}

#[test]
fn never_returns_a_past_session() {
    let snap = InMemorySnapshot::from_value(&json!([
        {
            "raceName": "Early",
            "round": 1,
            "schedule": {
                "fp1": { "date": "2025-03-14", "time": "01:30:00Z" },
                "fp2": { "date": "2025-03-14", "time": "05:00:00Z" },
                "fp3": { "date": "2025-03-15", "time": "01:30:00Z" },
                "qualy": { "date": "2025-03-15", "time": "05:00:00Z" },
                "race": { "date": "2025-03-16", "time": "04:00:00Z" }
            }
        }
    ]));

    let starts = [
        "2025-03-14T01:30:00Z",
        "2025-03-14T05:00:00Z",
        "2025-03-15T01:30:00Z",
        "2025-03-15T05:00:00Z",
        "2025-03-16T04:00:00Z",
    ];
    for (i, start) in starts.iter().enumerate() {
        let now = at(start);
        let got = resolve_next_session(&snap, now).unwrap();
        match starts.get(i + 1) {
            Some(next) => {
                let got = got.unwrap();
                assert!(got.date_time_utc > now);
                assert_eq!(got.date_time_utc, at(next));
            }
            None => assert!(got.is_none()),
        }
    }
}

#[test]
fn non_array_snapshots_are_unavailable() {
    for doc in ["null", "{}", "\"races\"", "7", "[", ""] {
        let err = resolve_next_session(&InMemorySnapshot::new(doc), Utc::now()).unwrap_err();
        assert!(
            matches!(err, SnapshotError::Json(_) | SnapshotError::Malformed(_)),
            "{doc:?} gave {err:?}"
        );
    }
}

#[test]
fn file_snapshot_is_reread_on_every_call() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedule.json");
    let source = FileSnapshot::new(&path);
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    assert!(matches!(
        resolve_next_session(&source, now),
        Err(SnapshotError::Io { .. })
    ));

    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(
        json!([{
            "raceName": "Australian Grand Prix",
            "round": "1",
            "schedule": { "race": { "date": "2025-03-16", "time": "04:00:00Z" } }
        }])
        .to_string()
        .as_bytes(),
    )
    .unwrap();
    drop(f);

    let got = resolve_next_session(&source, now).unwrap().unwrap();
    assert_eq!(got.race_name, "Australian Grand Prix");
    assert_eq!(got.round, 1);

    std::fs::write(&path, "[]").unwrap();
    assert!(resolve_next_session(&source, now).unwrap().is_none());
}

#[test]
fn resolved_session_wire_format() {
    let got = resolve_next_session(&two_races(), at("2025-04-19T00:00:00Z"))
        .unwrap()
        .unwrap();
    assert_eq!(
        serde_json::to_value(&got).unwrap(),
        json!({
            "raceName": "Race B",
            "round": 5,
            "sessionKey": "qualy",
            "dateTimeUTC": "2025-04-20T14:00:00.000Z"
        })
    );
}
