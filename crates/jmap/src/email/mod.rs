/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod copy;
pub mod get;
pub mod import;
pub mod query;
pub mod set;
pub mod snippet;

use crate::api::query::{QueryContext, SortKey};
use crate::api::set::id_set_keys;
use crate::api::{DataModel, SyncSource};
use crate::Server;
use ahash::AHashSet;
use chrono::{DateTime, SecondsFormat, Utc};
use jmap_proto::error::set::SetError;
use jmap_proto::error::MethodError;
use serde_json::{Map, Value};
use store::write::{BatchBuilder, Operation};
use store::{Collection, Record};

pub(crate) struct EmailModel;

impl DataModel for EmailModel {
    const COLLECTION: Collection = Collection::Email;
    const SYNC: SyncSource = SyncSource::Mail;

    fn condition(
        server: &Server,
        cx: &mut QueryContext,
        record: &Record,
        predicate: &str,
        argument: &Value,
    ) -> jmap_proto::Result<bool> {
        match predicate {
            "inMailbox" => Ok(argument
                .as_str()
                .is_some_and(|mailbox_id| record.id_set("mailboxIds").any(|id| id == mailbox_id))),
            "inMailboxOtherThan" => {
                // Accepts both a scalar and a list; normalized here.
                let excluded = match argument {
                    Value::String(id) => vec![id.as_str()],
                    Value::Array(ids) => ids.iter().filter_map(|id| id.as_str()).collect(),
                    _ => {
                        return Err(MethodError::invalid_arguments(
                            "inMailboxOtherThan expects a mailbox id or a list of them.",
                        ));
                    }
                };
                Ok(record
                    .id_set("mailboxIds")
                    .any(|id| !excluded.contains(&id)))
            }
            "before" => Ok(received_at(record) < date_argument(argument)?),
            "after" => Ok(received_at(record) >= date_argument(argument)?),
            "minSize" => Ok(record.int_value("size").unwrap_or(0)
                >= argument.as_i64().unwrap_or(i64::MAX)),
            "maxSize" => {
                Ok(record.int_value("size").unwrap_or(0) < argument.as_i64().unwrap_or(0))
            }
            "hasKeyword" => Ok(argument
                .as_str()
                .is_some_and(|keyword| record.id_set("keywords").any(|kw| kw == keyword))),
            "notKeyword" => Ok(!argument
                .as_str()
                .is_some_and(|keyword| record.id_set("keywords").any(|kw| kw == keyword))),
            "allInThreadHaveKeyword" => Ok(thread_keyword(cx, server, record, argument, true)),
            "someInThreadHaveKeyword" => Ok(thread_keyword(cx, server, record, argument, false)),
            "noneInThreadHaveKeyword" => Ok(!thread_keyword(cx, server, record, argument, false)),
            "hasAttachment" => Ok(record.bool_value("hasAttachment").unwrap_or(false)
                == argument.as_bool().unwrap_or(true)),
            "text" | "from" | "to" | "cc" | "bcc" | "subject" | "body" | "header" => {
                Ok(cx.search_hit(predicate, argument, &record.id))
            }
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
        if let Some(keyword) = property.strip_prefix("keyword:") {
            return Ok(SortKey::Bool(
                record.id_set("keywords").any(|kw| kw == keyword),
            ));
        }
        if let Some(keyword) = property.strip_prefix("allInThreadHaveKeyword:") {
            let thread_id = record.str_value("threadId").unwrap_or_default();
            return Ok(SortKey::Bool(
                cx.thread_keywords(server)
                    .get(thread_id)
                    .is_some_and(|aggregated| aggregated.all.contains(keyword)),
            ));
        }
        if let Some(keyword) = property.strip_prefix("someInThreadHaveKeyword:") {
            let thread_id = record.str_value("threadId").unwrap_or_default();
            return Ok(SortKey::Bool(
                cx.thread_keywords(server)
                    .get(thread_id)
                    .is_some_and(|aggregated| aggregated.some.contains(keyword)),
            ));
        }

        match property {
            "id" => Ok(SortKey::Text(record.id.clone())),
            "receivedAt" => Ok(SortKey::Number(received_at(record))),
            "sentAt" => Ok(SortKey::Number(
                record
                    .str_value("sentAt")
                    .and_then(parse_date)
                    .unwrap_or(0),
            )),
            "size" => Ok(SortKey::Number(record.int_value("size").unwrap_or(0))),
            "isunread" | "isUnread" => Ok(SortKey::Bool(
                !record.id_set("keywords").any(|kw| kw == "$seen"),
            )),
            "subject" => Ok(SortKey::Text(
                record
                    .str_value("subject")
                    .unwrap_or_default()
                    .to_lowercase(),
            )),
            "from" => Ok(SortKey::Text(first_address(record, "from"))),
            "to" => Ok(SortKey::Text(first_address(record, "to"))),
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
        validate_mailbox_ids(server, value.get("mailboxIds"), true)?;

        if value.get("threadId").and_then(|id| id.as_str()).is_none() {
            // Threading heuristics live in the synchronizer; a locally
            // created message starts its own thread.
            value.insert(
                "threadId".to_string(),
                Value::String(server.store.assign_id(Collection::Thread)),
            );
        }
        if !value.contains_key("keywords") {
            value.insert("keywords".to_string(), Value::Object(Map::new()));
        }
        if !value.contains_key("receivedAt") {
            value.insert(
                "receivedAt".to_string(),
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }
        if !value.contains_key("size") {
            value.insert("size".to_string(), Value::from(0));
        }
        Ok(())
    }

    fn validate_update(
        server: &Server,
        _record: &Record,
        patch: &mut Map<String, Value>,
    ) -> Result<(), SetError> {
        validate_mailbox_ids(server, patch.get("mailboxIds"), false)
    }

    fn decorate_batch(server: &Server, batch: &mut BatchBuilder) {
        // Any message mutation invalidates the counts of the mailboxes it
        // is entering and leaving.
        let mut touched: AHashSet<String> = AHashSet::new();
        for (collection, op) in batch.ops() {
            if collection != Collection::Email {
                continue;
            }
            match op {
                Operation::Create { value, .. } => {
                    touched.extend(id_set_keys(
                        value.get("mailboxIds").unwrap_or(&Value::Null),
                    ));
                }
                Operation::Update { id, patch } => {
                    touched.extend(id_set_keys(
                        patch.get("mailboxIds").unwrap_or(&Value::Null),
                    ));
                    if let Some(record) = server.store.get(Collection::Email, id) {
                        touched.extend(record.id_set("mailboxIds").map(str::to_string));
                    }
                }
                Operation::Destroy { id } | Operation::TouchCounts { id } => {
                    if let Some(record) = server.store.get(Collection::Email, id) {
                        touched.extend(record.id_set("mailboxIds").map(str::to_string));
                    }
                }
            }
        }

        if !touched.is_empty() {
            batch.with_collection(Collection::Mailbox);
            for mailbox_id in touched {
                if server
                    .store
                    .get_active(Collection::Mailbox, &mailbox_id)
                    .is_some()
                {
                    batch.touch_counts(mailbox_id);
                }
            }
        }
    }
}

fn validate_mailbox_ids(
    server: &Server,
    mailbox_ids: Option<&Value>,
    required: bool,
) -> Result<(), SetError> {
    let ids = match mailbox_ids {
        Some(value) => id_set_keys(value),
        None if !required => return Ok(()),
        None => Vec::new(),
    };
    if ids.is_empty() {
        return Err(SetError::invalid_mailboxes()
            .with_description("Message must belong to at least one mailbox."));
    }
    for id in ids {
        if server.store.get_active(Collection::Mailbox, &id).is_none() {
            return Err(SetError::invalid_mailboxes()
                .with_description(format!("Mailbox {:?} not found.", id)));
        }
    }
    Ok(())
}

fn thread_keyword(
    cx: &mut QueryContext,
    server: &Server,
    record: &Record,
    argument: &Value,
    all: bool,
) -> bool {
    let keyword = match argument.as_str() {
        Some(keyword) => keyword,
        None => return false,
    };
    let thread_id = record.str_value("threadId").unwrap_or_default();
    cx.thread_keywords(server)
        .get(thread_id)
        .is_some_and(|aggregated| {
            if all {
                aggregated.all.contains(keyword)
            } else {
                aggregated.some.contains(keyword)
            }
        })
}

pub(crate) fn parse_date(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|date| date.timestamp())
}

pub(crate) fn received_at(record: &Record) -> i64 {
    record
        .str_value("receivedAt")
        .and_then(parse_date)
        .unwrap_or(0)
}

fn date_argument(argument: &Value) -> jmap_proto::Result<i64> {
    argument
        .as_str()
        .and_then(parse_date)
        .ok_or_else(|| MethodError::invalid_arguments("Expected an UTC date argument."))
}

fn first_address(record: &Record, field: &str) -> String {
    record
        .value
        .get(field)
        .and_then(|addresses| addresses.as_array())
        .and_then(|addresses| addresses.first())
        .and_then(|address| address.as_object())
        .and_then(|address| {
            address
                .get("name")
                .and_then(|name| name.as_str())
                .filter(|name| !name.is_empty())
                .or_else(|| address.get("email").and_then(|email| email.as_str()))
        })
        .unwrap_or_default()
        .to_lowercase()
}
