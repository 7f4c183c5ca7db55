/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{method_responses, JmapTest};
use serde_json::json;

#[tokio::test]
async fn import_creates_record_from_blob() {
    let test = JmapTest::new();
    let raw = b"Subject: hello\r\n\r\nbody";
    test.remote.add_blob("b1", raw);

    let payload = test
        .call(
            "Email/import",
            json!({"emails": {"x": {
                "blobId": "b1",
                "mailboxIds": {"f1": true},
                "keywords": {"$seen": true},
                "receivedAt": "2019-05-01T00:00:00Z"
            }}}),
        )
        .await;

    let id = payload["created"]["x"]["id"].as_str().unwrap();
    assert_eq!(payload["created"]["x"]["size"], raw.len());
    assert_ne!(payload["oldState"], payload["newState"]);

    let email = test.call("Email/get", json!({"ids": [id]})).await["list"][0].clone();
    assert_eq!(email["blobId"], "b1");
    assert_eq!(email["mailboxIds"]["f1"], true);
    assert_eq!(email["keywords"]["$seen"], true);
    assert_eq!(email["size"], raw.len());
}

#[tokio::test]
async fn import_failures_are_per_email() {
    let test = JmapTest::new();
    test.remote.add_blob("b1", b"ok");

    let payload = test
        .call(
            "Email/import",
            json!({"emails": {
                "good": {"blobId": "b1", "mailboxIds": {"f1": true}},
                "noblob": {"blobId": "b404", "mailboxIds": {"f1": true}},
                "nowhere": {"blobId": "b1", "mailboxIds": {}}
            }}),
        )
        .await;

    assert!(payload["created"]["good"]["id"].is_string());
    assert_eq!(payload["notCreated"]["noblob"]["type"], "blobNotFound");
    assert_eq!(payload["notCreated"]["nowhere"]["type"], "invalidMailboxes");
}

#[tokio::test]
async fn copy_with_destroy_original() {
    let test = JmapTest::new();

    let response = test
        .request(json!({"methodCalls": [
            ["Email/copy", {
                "create": {"c1": {"id": "m1", "mailboxIds": {"f2": true}}},
                "onSuccessDestroyOriginal": true
            }, "0"]
        ]}))
        .await;

    let responses = method_responses(&response);
    assert_eq!(responses.len(), 2, "{:?}", response);
    assert_eq!(responses[0][0], "Email/copy");
    assert_eq!(responses[1][0], "Email/set");
    assert_eq!(responses[1][2], "0");

    let new_id = responses[0][1]["created"]["c1"]["id"].as_str().unwrap();
    assert_eq!(responses[1][1]["destroyed"], json!(["m1"]));

    let payload = test
        .call("Email/get", json!({"ids": [new_id, "m1"]}))
        .await;
    let copy = &payload["list"][0];
    assert_eq!(copy["subject"], "Bananas galore");
    assert_eq!(copy["mailboxIds"], json!({"f2": true}));
    assert_eq!(payload["notFound"], json!(["m1"]));
}

#[tokio::test]
async fn copy_requires_matching_account() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "Email/copy",
            json!({
                "fromAccountId": "someone-else",
                "create": {"c1": {"id": "m1"}}
            }),
        )
        .await;
    assert_eq!(payload["type"], "accountNotFound");
}
