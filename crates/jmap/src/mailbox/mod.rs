/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod get;
pub mod query;
pub mod set;

use crate::api::query::{QueryContext, SortKey};
use crate::api::{DataModel, SyncSource};
use crate::Server;
use ahash::AHashSet;
use jmap_proto::error::set::SetError;
use jmap_proto::error::MethodError;
use serde_json::{Map, Value};
use store::{Collection, Record};

pub(crate) struct MailboxModel;

impl DataModel for MailboxModel {
    const COLLECTION: Collection = Collection::Mailbox;
    const SYNC: SyncSource = SyncSource::Folders;

    fn materialize(server: &Server, record: &Record) -> Map<String, Value> {
        let mut object = Map::with_capacity(record.value.len() + 5);
        object.insert("id".to_string(), Value::String(record.id.clone()));
        object.extend(record.value.clone());

        // Message counts are derived from the Email collection.
        let counts = MailboxCounts::build(server, &record.id);
        object.insert("totalEmails".to_string(), counts.total_emails.into());
        object.insert("unreadEmails".to_string(), counts.unread_emails.into());
        object.insert("totalThreads".to_string(), counts.total_threads.into());
        object.insert("unreadThreads".to_string(), counts.unread_threads.into());
        object
    }

    fn condition(
        _server: &Server,
        _cx: &mut QueryContext,
        record: &Record,
        predicate: &str,
        argument: &Value,
    ) -> jmap_proto::Result<bool> {
        match predicate {
            "hasRole" => {
                let has_role = record
                    .str_value("role")
                    .is_some_and(|role| !role.is_empty());
                Ok(has_role == argument.as_bool().unwrap_or(true))
            }
            "parentId" => Ok(match argument.as_str() {
                Some(parent_id) => record.str_value("parentId") == Some(parent_id),
                None => record.str_value("parentId").is_none(),
            }),
            "isSubscribed" => Ok(record.bool_value("isSubscribed").unwrap_or(false)
                == argument.as_bool().unwrap_or(true)),
            _ => Err(MethodError::invalid_arguments(format!(
                "Unsupported filter {:?}",
                predicate
            ))),
        }
    }

    fn sort_key(
        server: &Server,
        cx: &mut QueryContext,
        record: &Record,
        property: &str,
    ) -> jmap_proto::Result<SortKey> {
        match property {
            "name" => Ok(SortKey::Text(
                record.str_value("name").unwrap_or_default().to_lowercase(),
            )),
            "sortOrder" => Ok(SortKey::Number(record.int_value("sortOrder").unwrap_or(0))),
            "parent/name" => Ok(SortKey::Text(
                cx.mailbox_path(server, &record.id).to_lowercase(),
            )),
            _ => Err(MethodError::invalid_arguments(format!(
                "Unsupported sort property {:?}",
                property
            ))),
        }
    }

    fn validate_create(
        server: &Server,
        _id: &str,
        value: &mut Map<String, Value>,
    ) -> Result<(), SetError> {
        if !value
            .get("name")
            .and_then(|name| name.as_str())
            .is_some_and(|name| !name.is_empty())
        {
            return Err(SetError::invalid_properties()
                .with_property("name")
                .with_description("Mailbox must have a name."));
        }
        validate_parent(server, value)
    }

    fn validate_update(
        server: &Server,
        record: &Record,
        patch: &mut Map<String, Value>,
    ) -> Result<(), SetError> {
        if patch.get("name").is_some_and(|name| !name.is_string()) {
            return Err(SetError::invalid_properties()
                .with_property("name")
                .with_description("Mailbox must have a name."));
        }
        if patch
            .get("parentId")
            .and_then(|parent_id| parent_id.as_str())
            == Some(record.id.as_str())
        {
            return Err(SetError::invalid_properties()
                .with_property("parentId")
                .with_description("A mailbox cannot be its own parent."));
        }
        validate_parent(server, patch)
    }

    fn validate_destroy(server: &Server, record: &Record) -> Result<(), SetError> {
        for mailbox in server.store.active_records(Collection::Mailbox) {
            if mailbox.str_value("parentId") == Some(record.id.as_str()) {
                return Err(SetError::new(
                    jmap_proto::error::set::SetErrorType::MailboxHasChild,
                )
                .with_description("Mailbox has at least one child."));
            }
        }
        for email in server.store.active_records(Collection::Email) {
            if email.id_set("mailboxIds").any(|id| id == record.id) {
                return Err(SetError::new(
                    jmap_proto::error::set::SetErrorType::MailboxHasEmail,
                )
                .with_description("Mailbox is not empty."));
            }
        }
        Ok(())
    }
}

fn validate_parent(server: &Server, value: &Map<String, Value>) -> Result<(), SetError> {
    match value.get("parentId") {
        Some(Value::String(parent_id)) => {
            if server
                .store
                .get_active(Collection::Mailbox, parent_id)
                .is_some()
            {
                Ok(())
            } else {
                Err(SetError::invalid_properties()
                    .with_property("parentId")
                    .with_description("Parent mailbox not found."))
            }
        }
        Some(Value::Null) | None => Ok(()),
        Some(_) => Err(SetError::invalid_properties().with_property("parentId")),
    }
}

struct MailboxCounts {
    total_emails: usize,
    unread_emails: usize,
    total_threads: usize,
    unread_threads: usize,
}

impl MailboxCounts {
    fn build(server: &Server, mailbox_id: &str) -> Self {
        let mut counts = MailboxCounts {
            total_emails: 0,
            unread_emails: 0,
            total_threads: 0,
            unread_threads: 0,
        };
        let mut threads = AHashSet::new();
        let mut unread_threads = AHashSet::new();

        for email in server.store.active_records(Collection::Email) {
            if !email.id_set("mailboxIds").any(|id| id == mailbox_id) {
                continue;
            }
            let seen = email.id_set("keywords").any(|keyword| keyword == "$seen");
            let thread_id = email.str_value("threadId").unwrap_or_default().to_string();

            counts.total_emails += 1;
            threads.insert(thread_id.clone());
            if !seen {
                counts.unread_emails += 1;
                unread_threads.insert(thread_id);
            }
        }

        counts.total_threads = threads.len();
        counts.unread_threads = unread_threads.len();
        counts
    }
}
