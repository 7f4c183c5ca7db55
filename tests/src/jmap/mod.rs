/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod back_reference;
pub mod email_changes;
pub mod email_query;
pub mod email_set;
pub mod import_copy;
pub mod misc;
pub mod query_changes;
pub mod singleton;
pub mod submission;

use ahash::{AHashMap, AHashSet};
use jmap::api::request::RequestHandler;
use jmap::{JmapConfig, Server};
use jmap_proto::request::Request;
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use store::remote::RemoteSource;
use store::write::BatchBuilder;
use store::{Collection, Record, Store, StoreError};

pub struct JmapTest {
    pub server: Server,
    pub remote: Arc<TestRemote>,
}

impl JmapTest {
    /// A server over the in-memory store with the standard fixture data.
    pub fn new() -> Self {
        let test = Self::empty();
        seed(&test.server.store);
        test
    }

    pub fn empty() -> Self {
        let store = Store::new();
        let remote = Arc::new(TestRemote::new(store.clone()));
        JmapTest {
            server: Server::new(store, remote.clone(), JmapConfig::default()),
            remote,
        }
    }

    pub async fn request(&self, body: Value) -> Value {
        let request =
            Request::parse(serde_json::to_string(&body).unwrap().as_bytes()).unwrap();
        serde_json::to_value(self.server.handle_request(request).await).unwrap()
    }

    /// Runs a single method call and returns its response payload.
    pub async fn call(&self, method: &str, arguments: Value) -> Value {
        let response = self
            .request(json!({"methodCalls": [[method, arguments, "0"]]}))
            .await;
        let responses = method_responses(&response);
        assert_eq!(responses.len(), 1, "{:?}", response);
        responses[0][1].clone()
    }
}

pub fn method_responses(response: &Value) -> &Vec<Value> {
    response["methodResponses"].as_array().unwrap()
}

pub fn object(value: Value) -> Map<String, Value> {
    value.as_object().unwrap().clone()
}

pub fn ids(payload: &Value) -> Vec<&str> {
    payload["ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|id| id.as_str().unwrap())
        .collect()
}

/// Standard fixture: a mailbox tree, ten messages across eight threads,
/// an identity, a calendar with one event, an addressbook with one
/// contact and two storage nodes.
fn seed(store: &Store) {
    let mut batch = BatchBuilder::new();
    batch.with_collection(Collection::Mailbox);
    for (id, name, role, parent_id, sort_order) in [
        ("f1", "Inbox", Some("inbox"), None, 1),
        ("f2", "Archive", Some("archive"), None, 2),
        ("f3", "Drafts", Some("drafts"), None, 3),
        ("f4", "Projects", None, None, 4),
        ("f5", "Alpha", None, Some("f4"), 5),
    ] {
        let mut mailbox = object(json!({
            "name": name,
            "sortOrder": sort_order,
            "isSubscribed": true,
            "myRights": {"mayAddItems": true, "mayDelete": false}
        }));
        if let Some(role) = role {
            mailbox.insert("role".to_string(), json!(role));
        }
        if let Some(parent_id) = parent_id {
            mailbox.insert("parentId".to_string(), json!(parent_id));
        }
        batch.create(id.to_string(), mailbox);
    }
    store.commit(batch).unwrap();

    let mut batch = BatchBuilder::new();
    batch.with_collection(Collection::Email);
    for (id, thread, day, subject, mailbox, keywords, size) in [
        ("m1", "t1", 1, "Bananas galore", "f1", json!({}), 1000),
        ("m2", "t1", 2, "Re: Bananas galore", "f1", json!({}), 2000),
        ("m3", "t2", 3, "Quarterly report", "f1", json!({"$seen": true}), 3000),
        ("m4", "t3", 4, "Lunch tomorrow?", "f1", json!({"$seen": true, "$flagged": true}), 500),
        ("m5", "t4", 5, "Weekend plans", "f1", json!({}), 1500),
        ("m6", "t5", 6, "Invoice 42", "f2", json!({"$seen": true}), 2500),
        ("m7", "t6", 7, "Meeting notes", "f2", json!({}), 800),
        ("m8", "t7", 8, "Holiday schedule", "f2", json!({"$seen": true}), 1200),
        ("m9", "t8", 9, "Build failure", "f2", json!({}), 600),
        ("m10", "t8", 10, "Re: Build failure", "f2", json!({}), 700),
    ] {
        batch.create(
            id.to_string(),
            object(json!({
                "threadId": thread,
                "mailboxIds": {mailbox: true},
                "keywords": keywords,
                "receivedAt": format!("2019-03-{:02}T10:00:00Z", day),
                "sentAt": format!("2019-03-{:02}T09:00:00Z", day),
                "subject": subject,
                "size": size,
                "hasAttachment": false,
                "from": [{"name": "Alice", "email": "alice@example.com"}],
                "to": [{"name": "Bob", "email": "bob@example.com"}],
                "preview": format!("preview of {}", subject),
                "textBody": format!("This is the body of {}.", subject)
            })),
        );
    }
    store.commit(batch).unwrap();

    let mut batch = BatchBuilder::new();
    batch
        .with_collection(Collection::Identity)
        .create(
            "i1".to_string(),
            object(json!({"name": "Alice", "email": "alice@example.com"})),
        )
        .with_collection(Collection::Quota)
        .create(
            "q1".to_string(),
            object(json!({"used": 4096, "hardLimit": 1000000, "scope": "account"})),
        )
        .with_collection(Collection::Calendar)
        .create(
            "c1".to_string(),
            object(json!({"name": "Personal", "color": "#3a429c"})),
        )
        .with_collection(Collection::CalendarEvent)
        .create(
            "e1".to_string(),
            object(json!({
                "calendarId": "c1",
                "title": "Dentist",
                "start": "2019-04-01T09:00:00Z",
                "duration": "PT1H"
            })),
        )
        .with_collection(Collection::Addressbook)
        .create("a1".to_string(), object(json!({"name": "Contacts"})))
        .with_collection(Collection::Contact)
        .create(
            "k1".to_string(),
            object(json!({
                "addressbookId": "a1",
                "firstName": "Carol",
                "lastName": "Jones",
                "emails": [{"type": "personal", "value": "carol@example.com"}]
            })),
        )
        .with_collection(Collection::StorageNode)
        .create(
            "n1".to_string(),
            object(json!({"name": "Documents", "type": "folder"})),
        )
        .create(
            "n2".to_string(),
            object(json!({
                "name": "notes.txt",
                "type": "file",
                "parentId": "n1",
                "size": 321,
                "modified": "2019-02-01T00:00:00Z"
            })),
        );
    store.commit(batch).unwrap();
}

/// Remote source backed by the test store itself: text search scans the
/// stored messages and blobs come from an in-memory map.
pub struct TestRemote {
    store: Store,
    blobs: Mutex<AHashMap<String, Vec<u8>>>,
}

impl TestRemote {
    fn new(store: Store) -> Self {
        TestRemote {
            store,
            blobs: Mutex::new(AHashMap::default()),
        }
    }

    pub fn add_blob(&self, id: &str, bytes: &[u8]) {
        self.blobs
            .lock()
            .unwrap()
            .insert(id.to_string(), bytes.to_vec());
    }
}

#[async_trait::async_trait]
impl RemoteSource for TestRemote {
    async fn sync_folders(&self, _store: &Store) -> store::Result<()> {
        Ok(())
    }

    async fn sync_mail(&self, _store: &Store) -> store::Result<()> {
        Ok(())
    }

    async fn sync_calendars(&self, _store: &Store) -> store::Result<()> {
        Ok(())
    }

    async fn sync_addressbooks(&self, _store: &Store) -> store::Result<()> {
        Ok(())
    }

    async fn search(&self, field: &str, term: &str) -> store::Result<AHashSet<String>> {
        let term = term.to_lowercase();
        let contains = |value: Option<&str>| {
            value.is_some_and(|value| value.to_lowercase().contains(&term))
        };

        Ok(self
            .store
            .active_records(Collection::Email)
            .into_iter()
            .filter(|email| match field {
                "subject" => contains(email.str_value("subject")),
                "body" => contains(email.str_value("textBody")),
                "text" => {
                    contains(email.str_value("subject")) || contains(email.str_value("textBody"))
                }
                "from" | "to" | "cc" | "bcc" => address_contains(email, field, &term),
                _ => false,
            })
            .map(|email| email.id)
            .collect())
    }

    async fn import_message(
        &self,
        _store: &Store,
        _blob: &[u8],
        _mailbox_ids: &[String],
    ) -> store::Result<()> {
        Ok(())
    }

    async fn submit(
        &self,
        _store: &Store,
        _email: &Record,
        _envelope: Option<&Value>,
    ) -> store::Result<()> {
        Ok(())
    }

    async fn get_blob(&self, blob_id: &str) -> store::Result<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(blob_id)
            .cloned()
            .ok_or_else(|| StoreError::Remote(format!("blob {:?} not found", blob_id)))
    }
}

fn address_contains(email: &Record, field: &str, term: &str) -> bool {
    email
        .value
        .get(field)
        .and_then(|addresses| addresses.as_array())
        .into_iter()
        .flatten()
        .any(|address| {
            ["name", "email"].iter().any(|key| {
                address
                    .get(key)
                    .and_then(|value| value.as_str())
                    .is_some_and(|value| value.to_lowercase().contains(term))
            })
        })
}
