/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{method_responses, JmapTest};
use serde_json::json;

#[tokio::test]
async fn submission_triggers_implied_email_set() {
    let test = JmapTest::new();

    let response = test
        .request(json!({"methodCalls": [
            ["EmailSubmission/set", {
                "create": {"s1": {"emailId": "m1", "identityId": "i1"}},
                "onSuccessUpdateEmail": {
                    "#s1": {"keywords/$answered": true, "mailboxIds/f2": true}
                }
            }, "0"]
        ]}))
        .await;

    // One call, two responses under the same tag: the submission and the
    // implied Email/set.
    let responses = method_responses(&response);
    assert_eq!(responses.len(), 2, "{:?}", response);
    assert_eq!(responses[0][0], "EmailSubmission/set");
    assert_eq!(responses[0][2], "0");
    assert_eq!(responses[1][0], "Email/set");
    assert_eq!(responses[1][2], "0");

    let submission = &responses[0][1]["created"]["s1"];
    assert!(submission["id"].is_string());
    assert!(responses[1][1]["updated"].get("m1").is_some(), "{:?}", response);

    let payload = test.call("Email/get", json!({"ids": ["m1"]})).await;
    let email = &payload["list"][0];
    assert_eq!(email["keywords"]["$answered"], true);
    assert_eq!(email["mailboxIds"]["f2"], true);
    assert_eq!(email["mailboxIds"]["f1"], true);
}

#[tokio::test]
async fn on_success_skips_failed_submissions() {
    let test = JmapTest::new();

    let response = test
        .request(json!({"methodCalls": [
            ["EmailSubmission/set", {
                "create": {
                    "ok": {"emailId": "m1"},
                    "missing": {"emailId": "m999"}
                },
                "onSuccessDestroyEmail": ["#ok", "#missing"]
            }, "0"]
        ]}))
        .await;

    let responses = method_responses(&response);
    assert_eq!(responses.len(), 2);
    assert_eq!(
        responses[0][1]["notCreated"]["missing"]["type"],
        "invalidEmail"
    );
    // The implied destroy only covers the submission that succeeded.
    assert_eq!(responses[1][1]["destroyed"], json!(["m1"]));
}

#[tokio::test]
async fn submission_query_and_changes() {
    let test = JmapTest::new();

    let state = test.call("EmailSubmission/get", json!({})).await["state"].clone();

    let response = test
        .request(json!({"methodCalls": [
            ["EmailSubmission/set", {"create": {
                "a": {"emailId": "m1"},
                "b": {"emailId": "m3"}
            }}, "0"]
        ]}))
        .await;
    let created = &method_responses(&response)[0][1]["created"];
    let id_a = created["a"]["id"].as_str().unwrap();
    let id_b = created["b"]["id"].as_str().unwrap();

    let payload = test
        .call(
            "EmailSubmission/query",
            json!({
                "filter": {"emailIds": ["m1"]},
                "sort": [{"property": "emailId"}]
            }),
        )
        .await;
    assert_eq!(payload["ids"], json!([id_a]));

    let payload = test
        .call(
            "EmailSubmission/changes",
            json!({"sinceState": state}),
        )
        .await;
    let created_ids = payload["created"].as_array().unwrap();
    assert_eq!(created_ids.len(), 2);
    assert!(created_ids.iter().any(|id| id == id_a));
    assert!(created_ids.iter().any(|id| id == id_b));

    // undoStatus is updatable; the record merges the change.
    let payload = test
        .call(
            "EmailSubmission/set",
            json!({"update": {id_a: {"undoStatus": "canceled"}}}),
        )
        .await;
    assert!(payload["updated"].get(id_a).is_some());
    let payload = test
        .call("EmailSubmission/get", json!({"ids": [id_a]}))
        .await;
    assert_eq!(payload["list"][0]["undoStatus"], "canceled");
}

#[tokio::test]
async fn unknown_identity_rejected() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "EmailSubmission/set",
            json!({"create": {"s1": {"emailId": "m1", "identityId": "i999"}}}),
        )
        .await;
    assert_eq!(
        payload["notCreated"]["s1"]["type"],
        "invalidProperties"
    );
}
