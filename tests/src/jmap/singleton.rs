/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::JmapTest;
use serde_json::json;

#[tokio::test]
async fn update_singleton_preferences() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "UserPreferences/set",
            json!({"update": {"singleton": {"theme": "dark"}}}),
        )
        .await;
    assert!(payload["updated"].get("singleton").is_some(), "{:?}", payload);
    assert_ne!(payload["oldState"], payload["newState"]);

    let payload = test
        .call("UserPreferences/get", json!({"ids": ["singleton"]}))
        .await;
    assert_eq!(payload["list"][0]["id"], "singleton");
    assert_eq!(payload["list"][0]["theme"], "dark");

    // Read-merge-write keeps unrelated keys.
    test.call(
        "UserPreferences/set",
        json!({"update": {"singleton": {"language": "en"}}}),
    )
    .await;
    let payload = test
        .call("UserPreferences/get", json!({"ids": ["singleton"]}))
        .await;
    assert_eq!(payload["list"][0]["theme"], "dark");
    assert_eq!(payload["list"][0]["language"], "en");
}

#[tokio::test]
async fn singleton_create_and_destroy_rejected() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "ClientPreferences/set",
            json!({
                "create": {"x": {"theme": "light"}},
                "destroy": ["singleton"]
            }),
        )
        .await;

    assert_eq!(payload["notCreated"]["x"]["type"], "singleton");
    assert_eq!(
        payload["notCreated"]["x"]["description"],
        "Can't create singleton types"
    );
    assert_eq!(payload["notDestroyed"]["singleton"]["type"], "singleton");
}

#[tokio::test]
async fn singleton_update_other_id_not_found() {
    let test = JmapTest::new();

    let payload = test
        .call(
            "CalendarPreferences/set",
            json!({"update": {"other": {"defaultCalendarId": "c1"}}}),
        )
        .await;
    assert_eq!(payload["notUpdated"]["other"]["type"], "notFound");
}

#[tokio::test]
async fn vacation_response_get_defaults() {
    let test = JmapTest::new();

    let payload = test.call("VacationResponse/get", json!({})).await;
    assert_eq!(payload["list"][0]["id"], "singleton");
    assert_eq!(payload["list"][0]["isEnabled"], false);
}
