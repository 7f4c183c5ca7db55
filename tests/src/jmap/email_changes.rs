/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::JmapTest;
use serde_json::json;

#[tokio::test]
async fn changes_classification() {
    let test = JmapTest::new();

    let state = test.call("Email/get", json!({"ids": []})).await["state"].clone();

    let payload = test
        .call(
            "Email/set",
            json!({
                "create": {"new": {
                    "mailboxIds": {"f3": true},
                    "subject": "A draft",
                    "keywords": {"$draft": true}
                }},
                "update": {"m3": {"keywords/$flagged": true}},
                "destroy": ["m4"]
            }),
        )
        .await;
    let new_id = payload["created"]["new"]["id"].as_str().unwrap().to_string();

    let payload = test
        .call("Email/changes", json!({"sinceState": state}))
        .await;
    assert_eq!(payload["created"], json!([new_id]));
    assert_eq!(payload["updated"], json!(["m3"]));
    assert_eq!(payload["removed"], json!(["m4"]));

    // A client at the new state sees nothing.
    let payload = test
        .call(
            "Email/changes",
            json!({"sinceState": payload["newState"]}),
        )
        .await;
    assert_eq!(payload["created"], json!([]));
    assert_eq!(payload["updated"], json!([]));
    assert_eq!(payload["removed"], json!([]));
}

#[tokio::test]
async fn created_then_destroyed_is_omitted() {
    let test = JmapTest::new();

    let state = test.call("Email/get", json!({"ids": []})).await["state"].clone();

    let payload = test
        .call(
            "Email/set",
            json!({"create": {"x": {"mailboxIds": {"f3": true}, "subject": "Gone"}}}),
        )
        .await;
    let id = payload["created"]["x"]["id"].as_str().unwrap().to_string();
    test.call("Email/set", json!({"destroy": [id]})).await;

    let payload = test
        .call("Email/changes", json!({"sinceState": state}))
        .await;
    assert_eq!(payload["created"], json!([]));
    assert_eq!(payload["removed"], json!([]));
}

#[tokio::test]
async fn missing_since_state_is_invalid() {
    let test = JmapTest::new();

    let payload = test.call("Email/changes", json!({})).await;
    assert_eq!(payload["type"], "invalidArguments");
}

#[tokio::test]
async fn max_changes_overflow() {
    let test = JmapTest::new();

    let state = test.call("Email/get", json!({"ids": []})).await["state"].clone();
    test.call(
        "Email/set",
        json!({"update": {
            "m1": {"keywords/$seen": true},
            "m2": {"keywords/$seen": true},
            "m3": {"keywords/$flagged": true}
        }}),
    )
    .await;

    let payload = test
        .call(
            "Email/changes",
            json!({"sinceState": state, "maxChanges": 2}),
        )
        .await;
    assert_eq!(payload["type"], "cannotCalculateChanges");
    assert!(payload["newState"].is_string());
}

#[tokio::test]
async fn purged_horizon_cannot_calculate() {
    let test = JmapTest::new();

    let state = test.call("Email/get", json!({"ids": []})).await["state"].clone();
    test.call("Email/set", json!({"destroy": ["m5"]})).await;
    test.server.store.purge_tombstones();

    let payload = test
        .call("Email/changes", json!({"sinceState": state}))
        .await;
    assert_eq!(payload["type"], "cannotCalculateChanges");
    assert!(payload["newState"].is_string());

    // Thread changes ride the same horizon.
    let payload = test
        .call("Thread/changes", json!({"sinceState": state}))
        .await;
    assert_eq!(payload["type"], "cannotCalculateChanges");
}

#[tokio::test]
async fn thread_changes_follow_email_changes() {
    let test = JmapTest::new();

    let state = test.call("Thread/get", json!({"ids": []})).await["state"].clone();

    // Destroying one of two thread members updates the thread.
    test.call("Email/set", json!({"destroy": ["m10"]})).await;
    let payload = test
        .call("Thread/changes", json!({"sinceState": state}))
        .await;
    assert_eq!(payload["updated"], json!(["t8"]));

    // Destroying the last member removes it.
    let state = payload["newState"].clone();
    test.call("Email/set", json!({"destroy": ["m9"]})).await;
    let payload = test
        .call("Thread/changes", json!({"sinceState": state}))
        .await;
    assert_eq!(payload["removed"], json!(["t8"]));

    let payload = test.call("Thread/get", json!({"ids": ["t1"]})).await;
    assert_eq!(payload["list"][0]["emailIds"], json!(["m1", "m2"]));
}
