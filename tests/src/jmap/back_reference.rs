/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{method_responses, JmapTest};
use serde_json::json;

#[tokio::test]
async fn back_reference_chain() {
    let test = JmapTest::new();
    let response = test
        .request(json!({"methodCalls": [
            ["Mailbox/query", {
                "filter": {"hasRole": true},
                "sort": [{"property": "name", "isAscending": true}]
            }, "a"],
            ["Mailbox/get", {
                "#ids": {"resultOf": "a", "name": "ids", "path": "/ids"}
            }, "b"]
        ]}))
        .await;

    let responses = method_responses(&response);
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0][0], "Mailbox/query");
    assert_eq!(responses[1][0], "Mailbox/get");

    let total = responses[0][1]["total"].as_u64().unwrap();
    let list = responses[1][1]["list"].as_array().unwrap();
    assert_eq!(list.len() as u64, total);
    assert!(!list.is_empty());
    for mailbox in list {
        assert!(mailbox["role"].is_string(), "{:?}", mailbox);
    }
}

#[tokio::test]
async fn batch_with_unknown_method() {
    let test = JmapTest::new();
    let response = test
        .request(json!({"methodCalls": [
            ["Mailbox/get", {"ids": ["f1"]}, "0"],
            ["Mailbox/frobnicate", {}, "1"],
            ["Email/get", {"ids": ["m1"]}, "2"]
        ]}))
        .await;

    let responses = method_responses(&response);
    assert_eq!(responses.len(), 3);

    assert_eq!(responses[0][0], "Mailbox/get");
    assert_eq!(responses[0][2], "0");

    assert_eq!(responses[1][0], "error");
    assert_eq!(responses[1][1]["type"], "unknownMethod");
    assert_eq!(responses[1][2], "1");

    assert_eq!(responses[2][0], "Email/get");
    assert_eq!(responses[2][2], "2");
    assert_eq!(responses[2][1]["list"][0]["id"], "m1");
}

#[tokio::test]
async fn back_reference_to_failed_call() {
    let test = JmapTest::new();
    let response = test
        .request(json!({"methodCalls": [
            ["Email/changes", {}, "a"],
            ["Email/get", {
                "#ids": {"resultOf": "a", "name": "ids", "path": "/created"}
            }, "b"]
        ]}))
        .await;

    let responses = method_responses(&response);
    assert_eq!(responses.len(), 2);
    // The first call fails (missing sinceState), so its tag is invisible
    // to the back-reference resolver.
    assert_eq!(responses[0][0], "error");
    assert_eq!(responses[0][1]["type"], "invalidArguments");
    assert_eq!(responses[1][0], "error");
    assert_eq!(responses[1][1]["type"], "invalidResultReference");
}

#[tokio::test]
async fn back_reference_unknown_tag() {
    let test = JmapTest::new();
    let response = test
        .request(json!({"methodCalls": [
            ["Email/get", {
                "#ids": {"resultOf": "nope", "name": "ids", "path": "/ids"}
            }, "b"]
        ]}))
        .await;

    let responses = method_responses(&response);
    assert_eq!(responses[0][0], "error");
    assert_eq!(responses[0][1]["type"], "invalidResultReference");
}

#[tokio::test]
async fn core_echo() {
    let test = JmapTest::new();
    let payload = test
        .call("Core/echo", json!({"hello": [1, 2, 3]}))
        .await;
    assert_eq!(payload, json!({"hello": [1, 2, 3]}));
}
