/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{method_responses, JmapTest};
use serde_json::json;

#[tokio::test]
async fn creation_ids_resolve_across_the_batch() {
    let test = JmapTest::new();

    let response = test
        .request(json!({"methodCalls": [
            ["Mailbox/set", {"create": {"todo": {"name": "Todo"}}}, "0"],
            ["Email/set", {"create": {"draft": {
                "mailboxIds": {"#todo": true},
                "subject": "Remember the milk",
                "keywords": {"$draft": true}
            }}}, "1"],
            ["Email/get", {"ids": ["#draft"]}, "2"]
        ]}))
        .await;

    let responses = method_responses(&response);
    assert_eq!(responses.len(), 3);

    let mailbox_id = responses[0][1]["created"]["todo"]["id"].as_str().unwrap();
    let email_id = responses[1][1]["created"]["draft"]["id"].as_str().unwrap();

    let email = &responses[2][1]["list"][0];
    assert_eq!(email["id"], email_id);
    assert_eq!(email["subject"], "Remember the milk");
    assert_eq!(email["mailboxIds"][mailbox_id], true);
}

#[tokio::test]
async fn create_visible_to_destroy_in_same_call() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "Email/set",
            json!({
                "create": {"tmp": {"mailboxIds": {"f3": true}, "subject": "Ephemeral"}},
                "destroy": ["#tmp"]
            }),
        )
        .await;

    let id = payload["created"]["tmp"]["id"].as_str().unwrap();
    assert_eq!(payload["destroyed"], json!([id]));
}

#[tokio::test]
async fn partial_failure_keeps_call_successful() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "Email/set",
            json!({
                "create": {
                    "good": {"mailboxIds": {"f1": true}, "subject": "Ok"},
                    "bad": {"mailboxIds": {"f999": true}, "subject": "Nope"}
                },
                "update": {"m999": {"keywords/$seen": true}},
                "destroy": ["m998"]
            }),
        )
        .await;

    assert!(payload["created"]["good"]["id"].is_string());
    assert_eq!(payload["notCreated"]["bad"]["type"], "invalidMailboxes");
    assert_eq!(payload["notUpdated"]["m999"]["type"], "notFound");
    assert_eq!(payload["notDestroyed"]["m998"]["type"], "notFound");
    assert_ne!(payload["oldState"], payload["newState"]);
}

#[tokio::test]
async fn update_and_destroy_conflict() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "Email/set",
            json!({
                "update": {"m1": {"keywords/$seen": true}},
                "destroy": ["m1"]
            }),
        )
        .await;
    assert_eq!(payload["notUpdated"]["m1"]["type"], "willDestroy");
    assert_eq!(payload["destroyed"], json!(["m1"]));
}

#[tokio::test]
async fn state_advances_only_on_change() {
    let test = JmapTest::new();

    let first = test
        .call(
            "Email/set",
            json!({"update": {"m1": {"keywords/$seen": true}}}),
        )
        .await;
    assert_ne!(first["oldState"], first["newState"]);

    let second = test
        .call(
            "Email/set",
            json!({"update": {"m2": {"keywords/$seen": true}}}),
        )
        .await;
    assert_ne!(second["newState"], first["newState"]);
    assert_eq!(second["oldState"], first["newState"]);

    // Nothing to do: the state token stays put.
    let idle = test.call("Email/set", json!({})).await;
    assert_eq!(idle["oldState"], idle["newState"]);
}

#[tokio::test]
async fn if_in_state_mismatch() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "Email/set",
            json!({
                "ifInState": "s1",
                "update": {"m1": {"keywords/$seen": true}}
            }),
        )
        .await;
    assert_eq!(payload["type"], "stateMismatch");
}
