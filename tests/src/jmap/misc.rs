/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{ids, JmapTest};
use serde_json::json;

#[tokio::test]
async fn get_projects_requested_properties() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "Email/get",
            json!({"ids": ["m1"], "properties": ["subject", "size"]}),
        )
        .await;
    let email = payload["list"][0].as_object().unwrap();
    // The id is always present, plus exactly the requested properties.
    assert_eq!(
        email.keys().collect::<Vec<_>>(),
        ["id", "subject", "size"]
    );
}

#[tokio::test]
async fn identity_and_quota_get() {
    let test = JmapTest::new();

    let payload = test.call("Identity/get", json!({})).await;
    assert_eq!(payload["list"][0]["id"], "i1");
    assert_eq!(payload["list"][0]["email"], "alice@example.com");

    let payload = test.call("Quota/get", json!({"ids": ["q1"]})).await;
    assert_eq!(payload["list"][0]["used"], 4096);
    assert_eq!(payload["notFound"], json!([]));
}

#[tokio::test]
async fn account_id_must_match() {
    let test = JmapTest::new();

    let payload = test
        .call("Identity/get", json!({"accountId": "intruder"}))
        .await;
    assert_eq!(payload["type"], "accountNotFound");
}

#[tokio::test]
async fn storage_node_query() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "StorageNode/query",
            json!({"filter": {"parentId": "n1"}, "sort": [{"property": "name"}]}),
        )
        .await;
    assert_eq!(ids(&payload), ["n2"]);

    let payload = test
        .call("StorageNode/get", json!({"ids": ["n2"]}))
        .await;
    assert_eq!(payload["list"][0]["type"], "file");
}

#[tokio::test]
async fn calendar_round_trip() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "Calendar/set",
            json!({"create": {"work": {"name": "Work"}}}),
        )
        .await;
    let calendar_id = payload["created"]["work"]["id"].as_str().unwrap().to_string();

    let payload = test
        .call(
            "CalendarEvent/set",
            json!({"create": {"standup": {
                "calendarId": calendar_id,
                "title": "Standup",
                "start": "2019-04-02T09:30:00Z"
            }}}),
        )
        .await;
    let event_id = payload["created"]["standup"]["id"].as_str().unwrap().to_string();

    let payload = test
        .call(
            "CalendarEvent/query",
            json!({
                "filter": {"after": "2019-04-02T00:00:00Z"},
                "sort": [{"property": "start"}]
            }),
        )
        .await;
    assert_eq!(ids(&payload), [event_id.as_str()]);

    let payload = test.call("Calendar/refreshSynced", json!({})).await;
    assert_eq!(payload["accountId"], "u1");

    // An event pointing at an unknown calendar is rejected.
    let payload = test
        .call(
            "CalendarEvent/set",
            json!({"create": {"bad": {"calendarId": "c999", "title": "X"}}}),
        )
        .await;
    assert_eq!(
        payload["notCreated"]["bad"]["type"],
        "invalidProperties"
    );
}

#[tokio::test]
async fn contacts_round_trip() {
    let test = JmapTest::new();

    let payload = test.call("Addressbook/get", json!({})).await;
    assert_eq!(payload["list"][0]["id"], "a1");

    let payload = test
        .call(
            "Contact/query",
            json!({"filter": {"email": "carol@"}, "sort": [{"property": "lastName"}]}),
        )
        .await;
    assert_eq!(ids(&payload), ["k1"]);

    let payload = test
        .call(
            "ContactGroup/set",
            json!({"create": {"g": {"name": "Friends", "contactIds": ["k1"]}}}),
        )
        .await;
    let group_id = payload["created"]["g"]["id"].as_str().unwrap().to_string();

    let payload = test
        .call("ContactGroup/get", json!({"ids": [group_id]}))
        .await;
    assert_eq!(payload["list"][0]["contactIds"], json!(["k1"]));

    let state = payload["state"].clone();
    test.call(
        "Contact/set",
        json!({"update": {"k1": {"nickname": "Caro"}}}),
    )
    .await;
    let payload = test
        .call("Contact/changes", json!({"sinceState": state}))
        .await;
    assert_eq!(payload["updated"], json!(["k1"]));
}
