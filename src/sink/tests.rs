use chrono::{TimeZone, Utc};

use super::*;

fn example_payload() -> ResultPayload {
    ResultPayload {
        timestamp: Utc.with_ymd_and_hms(2026, 8, 7, 10, 30, 0).unwrap(),
        name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        score: 1,
        total: 2,
        answers: vec![
            AnswerDetail {
                id: "q1".to_owned(),
                selected: "A".to_owned(),
            },
            AnswerDetail {
                id: "q2".to_owned(),
                selected: String::new(),
            },
        ],
    }
}

#[test]
fn payload_serializes_to_wire_keys() {
    let json = serde_json::to_value(example_payload()).unwrap();
    let object = json.as_object().unwrap();
    for key in ["timestamp", "name", "email", "score", "total", "answers"] {
        assert!(object.contains_key(key), "missing key {}", key);
    }
    assert_eq!(json["score"], 1);
    assert_eq!(json["total"], 2);
    assert_eq!(json["answers"][0]["id"], "q1");
    assert_eq!(json["answers"][0]["selected"], "A");
    assert_eq!(json["answers"][1]["selected"], "");
}

#[test]
fn timestamp_is_iso_8601() {
    let json = serde_json::to_value(example_payload()).unwrap();
    let timestamp = json["timestamp"].as_str().unwrap();
    assert!(timestamp.starts_with("2026-08-07T10:30:00"));
}

#[test]
fn payload_round_trips() {
    let payload = example_payload();
    let json = serde_json::to_string(&payload).unwrap();
    let parsed: ResultPayload = serde_json::from_str(&json).unwrap();
    assert_eq!(payload, parsed);
}
