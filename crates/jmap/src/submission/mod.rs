/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod get;
pub mod query;
pub mod set;

use crate::api::query::{QueryContext, SortKey};
use crate::api::DataModel;
use crate::email::parse_date;
use crate::Server;
use jmap_proto::error::MethodError;
use serde_json::Value;
use store::{Collection, Record};

pub(crate) struct SubmissionModel;

impl DataModel for SubmissionModel {
    const COLLECTION: Collection = Collection::EmailSubmission;

    fn condition(
        _server: &Server,
        _cx: &mut QueryContext,
        record: &Record,
        predicate: &str,
        argument: &Value,
    ) -> jmap_proto::Result<bool> {
        match predicate {
            "emailIds" => Ok(id_list_contains(argument, record.str_value("emailId"))),
            "threadIds" => Ok(id_list_contains(argument, record.str_value("threadId"))),
            "undoStatus" => Ok(argument
                .as_str()
                .is_some_and(|status| record.str_value("undoStatus") == Some(status))),
            "before" => Ok(send_at(record) < date_argument(argument)?),
            "after" => Ok(send_at(record) >= date_argument(argument)?),
            _ => Err(MethodError::invalid_arguments(format!(
                "Unsupported filter {:?}",
                predicate
            ))),
        }
    }

    fn sort_key(
        _server: &Server,
        _cx: &mut QueryContext,
        record: &Record,
        property: &str,
    ) -> jmap_proto::Result<SortKey> {
        match property {
            "emailId" => Ok(SortKey::Text(
                record.str_value("emailId").unwrap_or_default().to_string(),
            )),
            "threadId" => Ok(SortKey::Text(
                record.str_value("threadId").unwrap_or_default().to_string(),
            )),
            "sentAt" => Ok(SortKey::Number(send_at(record))),
            _ => Err(MethodError::invalid_arguments(format!(
                "Unsupported sort property {:?}",
                property
            ))),
        }
    }
}

fn id_list_contains(argument: &Value, id: Option<&str>) -> bool {
    match (argument.as_array(), id) {
        (Some(ids), Some(id)) => ids.iter().any(|entry| entry.as_str() == Some(id)),
        _ => false,
    }
}

fn send_at(record: &Record) -> i64 {
    record.str_value("sendAt").and_then(parse_date).unwrap_or(0)
}

fn date_argument(argument: &Value) -> jmap_proto::Result<i64> {
    argument
        .as_str()
        .and_then(parse_date)
        .ok_or_else(|| MethodError::invalid_arguments("Expected an UTC date argument."))
}
