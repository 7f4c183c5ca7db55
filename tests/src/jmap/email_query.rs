/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{ids, JmapTest};
use serde_json::json;

#[tokio::test]
async fn anchor_pagination() {
    let test = JmapTest::new();

    // m8 sits at sorted index 7 under receivedAt ascending.
    let payload = test
        .call(
            "Email/query",
            json!({
                "sort": [{"property": "receivedAt"}],
                "anchor": "m8",
                "anchorOffset": -2,
                "limit": 3
            }),
        )
        .await;
    assert_eq!(payload["position"], 5);
    assert_eq!(ids(&payload), ["m6", "m7", "m8"]);
    assert_eq!(payload["total"], 10);

    // The offset clamps at the start of the list.
    let payload = test
        .call(
            "Email/query",
            json!({
                "sort": [{"property": "receivedAt"}],
                "anchor": "m2",
                "anchorOffset": -5,
                "limit": 2
            }),
        )
        .await;
    assert_eq!(payload["position"], 0);
    assert_eq!(ids(&payload), ["m1", "m2"]);

    let payload = test
        .call("Email/query", json!({"anchor": "m999"}))
        .await;
    assert_eq!(payload["type"], "anchorNotFound");
}

#[tokio::test]
async fn position_and_anchor_are_exclusive() {
    let test = JmapTest::new();

    let payload = test
        .call("Email/query", json!({"position": 1, "anchor": "m3"}))
        .await;
    assert_eq!(payload["type"], "invalidArguments");

    let payload = test.call("Email/query", json!({"position": -2})).await;
    assert_eq!(payload["type"], "invalidArguments");
}

#[tokio::test]
async fn filter_operators() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "Email/query",
            json!({
                "filter": {
                    "operator": "AND",
                    "conditions": [
                        {"inMailbox": "f1"},
                        {"operator": "NOT", "conditions": [{"hasKeyword": "$seen"}]}
                    ]
                },
                "sort": [{"property": "receivedAt"}]
            }),
        )
        .await;
    assert_eq!(ids(&payload), ["m1", "m2", "m5"]);

    let payload = test
        .call(
            "Email/query",
            json!({
                "filter": {"inMailboxOtherThan": ["f1"]},
                "sort": [{"property": "receivedAt"}]
            }),
        )
        .await;
    assert_eq!(ids(&payload), ["m6", "m7", "m8", "m9", "m10"]);

    let payload = test
        .call(
            "Email/query",
            json!({
                "filter": {"after": "2019-03-08T00:00:00Z", "minSize": 650},
                "sort": [{"property": "size", "isAscending": false}]
            }),
        )
        .await;
    assert_eq!(ids(&payload), ["m8", "m10"]);
}

#[tokio::test]
async fn empty_operator_nodes() {
    let test = JmapTest::new();

    // AND of nothing matches everything, OR of nothing matches nothing.
    let payload = test
        .call("Email/query", json!({"filter": {"operator": "AND"}}))
        .await;
    assert_eq!(payload["total"], 10);

    let payload = test
        .call("Email/query", json!({"filter": {"operator": "OR"}}))
        .await;
    assert_eq!(payload["total"], 0);

    let payload = test.call("Email/query", json!({"filter": {}})).await;
    assert_eq!(payload["total"], 10);
}

#[tokio::test]
async fn thread_keyword_predicates() {
    let test = JmapTest::new();

    // Thread t1 has no $seen member; mark one of the two.
    test.call(
        "Email/set",
        json!({"update": {"m2": {"keywords/$seen": true}}}),
    )
    .await;

    let payload = test
        .call(
            "Email/query",
            json!({
                "filter": {"inMailbox": "f1", "someInThreadHaveKeyword": "$seen"},
                "sort": [{"property": "receivedAt"}]
            }),
        )
        .await;
    assert_eq!(ids(&payload), ["m1", "m2", "m3", "m4"]);

    let payload = test
        .call(
            "Email/query",
            json!({
                "filter": {"inMailbox": "f1", "allInThreadHaveKeyword": "$seen"},
                "sort": [{"property": "receivedAt"}]
            }),
        )
        .await;
    assert_eq!(ids(&payload), ["m3", "m4"]);

    let payload = test
        .call(
            "Email/query",
            json!({
                "filter": {"inMailbox": "f1", "noneInThreadHaveKeyword": "$seen"},
                "sort": [{"property": "receivedAt"}]
            }),
        )
        .await;
    assert_eq!(ids(&payload), ["m5"]);
}

#[tokio::test]
async fn collapse_threads_picks_exemplars() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "Email/query",
            json!({
                "sort": [{"property": "receivedAt", "isAscending": false}],
                "collapseThreads": true
            }),
        )
        .await;
    // m10 collapses t8 (hiding m9), m2 collapses t1 (hiding m1).
    assert_eq!(
        ids(&payload),
        ["m10", "m8", "m7", "m6", "m5", "m4", "m3", "m2"]
    );
    assert_eq!(payload["total"], 8);
}

#[tokio::test]
async fn text_search_goes_through_remote() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "Email/query",
            json!({
                "filter": {"text": "bananas"},
                "sort": [{"property": "receivedAt"}]
            }),
        )
        .await;
    assert_eq!(ids(&payload), ["m1", "m2"]);

    let payload = test
        .call(
            "Email/query",
            json!({"filter": {"subject": "build failure"}, "sort": [{"property": "receivedAt"}]}),
        )
        .await;
    assert_eq!(ids(&payload), ["m9", "m10"]);
}

#[tokio::test]
async fn query_is_idempotent() {
    let test = JmapTest::new();

    let query = json!({
        "filter": {"inMailbox": "f2"},
        "sort": [{"property": "size"}, {"property": "receivedAt", "isAscending": false}]
    });
    let first = test.call("Email/query", query.clone()).await;
    let second = test.call("Email/query", query).await;
    assert_eq!(first["ids"], second["ids"]);
    assert_eq!(first["total"], second["total"]);
    assert_eq!(first["queryState"], second["queryState"]);
}

#[tokio::test]
async fn sort_with_tie_break() {
    let test = JmapTest::new();

    // m9 and m10 share a thread; sizes 600 and 700.
    let payload = test
        .call(
            "Email/query",
            json!({
                "filter": {"inMailbox": "f2"},
                "sort": [{"property": "isunread", "isAscending": false}]
            }),
        )
        .await;
    // Unread first; ties resolved by id ascending.
    assert_eq!(ids(&payload), ["m10", "m7", "m9", "m6", "m8"]);
}
