/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{ids, JmapTest};
use serde_json::{json, Value};

/// Replays a queryChanges response over the client's previous id list.
fn replay(old_ids: &[&str], payload: &Value) -> Vec<String> {
    let mut list: Vec<String> = old_ids.iter().map(|id| id.to_string()).collect();
    for removed in payload["removed"].as_array().unwrap() {
        let removed = removed.as_str().unwrap();
        list.retain(|id| id != removed);
    }
    let mut added: Vec<(usize, String)> = payload["added"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| {
            (
                item["index"].as_u64().unwrap() as usize,
                item["id"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    added.sort();
    for (index, id) in added {
        list.insert(index.min(list.len()), id);
    }
    list
}

#[tokio::test]
async fn uncollapsed_replay_reaches_current_list() {
    let test = JmapTest::new();

    let query = json!({"sort": [{"property": "receivedAt"}]});
    let before = test.call("Email/query", query.clone()).await;
    let old_ids = ids(&before);
    let since = before["queryState"].clone();

    // Flag one message, destroy another, create a third.
    test.call(
        "Email/set",
        json!({
            "update": {"m3": {"keywords/$flagged": true}},
            "destroy": ["m7"],
            "create": {"new": {
                "mailboxIds": {"f1": true},
                "subject": "Fresh",
                "receivedAt": "2019-03-05T12:00:00Z"
            }}
        }),
    )
    .await;

    let after = test.call("Email/query", query.clone()).await;
    let payload = test
        .call(
            "Email/queryChanges",
            json!({
                "sort": [{"property": "receivedAt"}],
                "sinceQueryState": since
            }),
        )
        .await;

    assert_eq!(payload["total"], after["total"]);
    assert_eq!(replay(&old_ids, &payload), ids(&after));
}

#[tokio::test]
async fn collapsed_exemplar_keeps_its_slot() {
    let test = JmapTest::new();

    let query = json!({
        "sort": [{"property": "receivedAt", "isAscending": false}],
        "collapseThreads": true
    });
    let before = test.call("Email/query", query.clone()).await;
    let since = before["queryState"].clone();
    let total = before["total"].clone();
    assert_eq!(ids(&before)[0], "m10");

    // Mark the top exemplar read; its modseq moves but its position does
    // not.
    test.call(
        "Email/set",
        json!({"update": {"m10": {"keywords/$seen": true}}}),
    )
    .await;

    let payload = test
        .call(
            "Email/queryChanges",
            json!({
                "sort": [{"property": "receivedAt", "isAscending": false}],
                "collapseThreads": true,
                "sinceQueryState": since
            }),
        )
        .await;

    let removed = payload["removed"].as_array().unwrap();
    assert!(removed.iter().any(|id| id == "m10"), "{:?}", payload);
    assert_eq!(payload["added"], json!([{"id": "m10", "index": 0}]));
    assert_eq!(payload["total"], total);
}

#[tokio::test]
async fn collapsed_new_message_takes_over_thread() {
    let test = JmapTest::new();

    let query = json!({
        "sort": [{"property": "receivedAt", "isAscending": false}],
        "collapseThreads": true
    });
    let before = test.call("Email/query", query.clone()).await;
    let since = before["queryState"].clone();

    // A new message lands on thread t1 and becomes its exemplar.
    let created = test
        .call(
            "Email/set",
            json!({"create": {"reply": {
                "mailboxIds": {"f1": true},
                "threadId": "t1",
                "subject": "Re: Re: Bananas galore",
                "receivedAt": "2019-03-20T10:00:00Z"
            }}}),
        )
        .await;
    let new_id = created["created"]["reply"]["id"].as_str().unwrap().to_string();

    let payload = test
        .call(
            "Email/queryChanges",
            json!({
                "sort": [{"property": "receivedAt", "isAscending": false}],
                "collapseThreads": true,
                "sinceQueryState": since
            }),
        )
        .await;

    // The new exemplar is added on top and the previous one retired.
    assert_eq!(payload["added"], json!([{"id": new_id, "index": 0}]));
    let removed = payload["removed"].as_array().unwrap();
    assert!(removed.iter().any(|id| id == &new_id));
    assert!(removed.iter().any(|id| id == "m2"), "{:?}", payload);
    assert_eq!(payload["total"], before["total"]);
}

#[tokio::test]
async fn up_to_id_stops_reporting() {
    let test = JmapTest::new();

    let query = json!({"sort": [{"property": "receivedAt"}]});
    let before = test.call("Email/query", query).await;
    let since = before["queryState"].clone();

    test.call(
        "Email/set",
        json!({"update": {
            "m2": {"keywords/$flagged": true},
            "m9": {"keywords/$flagged": true}
        }}),
    )
    .await;

    let payload = test
        .call(
            "Email/queryChanges",
            json!({
                "sort": [{"property": "receivedAt"}],
                "sinceQueryState": since,
                "upToEmailId": "m5"
            }),
        )
        .await;

    // m9 sorts after m5, so only m2 is reported; total still covers the
    // whole list.
    assert_eq!(payload["removed"], json!(["m2"]));
    assert_eq!(payload["added"], json!([{"id": "m2", "index": 1}]));
    assert_eq!(payload["total"], 10);
}

#[tokio::test]
async fn up_to_id_applies_in_collapsed_mode() {
    let test = JmapTest::new();

    let query = json!({
        "sort": [{"property": "receivedAt", "isAscending": false}],
        "collapseThreads": true
    });
    let before = test.call("Email/query", query).await;
    let since = before["queryState"].clone();

    test.call(
        "Email/set",
        json!({"update": {"m2": {"keywords/$flagged": true}}}),
    )
    .await;

    // m9 is hidden behind its thread's exemplar m10, but naming it as the
    // boundary still stops reporting; the changed exemplar m2 sorts after
    // it and must not be reported. Total counting continues to the end.
    let payload = test
        .call(
            "Email/queryChanges",
            json!({
                "sort": [{"property": "receivedAt", "isAscending": false}],
                "collapseThreads": true,
                "sinceQueryState": since,
                "upToEmailId": "m9"
            }),
        )
        .await;

    assert_eq!(payload["removed"], json!([]));
    assert_eq!(payload["added"], json!([]));
    assert_eq!(payload["total"], before["total"]);
}

#[tokio::test]
async fn query_changes_max_changes_overflow() {
    let test = JmapTest::new();

    let before = test.call("Email/query", json!({})).await;
    let since = before["queryState"].clone();

    test.call(
        "Email/set",
        json!({"update": {
            "m1": {"keywords/$flagged": true},
            "m2": {"keywords/$flagged": true},
            "m3": {"keywords/$answered": true}
        }}),
    )
    .await;

    let payload = test
        .call(
            "Email/queryChanges",
            json!({"sinceQueryState": since, "maxChanges": 3}),
        )
        .await;
    assert_eq!(payload["type"], "cannotCalculateChanges");
    assert!(payload["newQueryState"].is_string());
}
