/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod get;
pub mod query;

use crate::api::query::{QueryContext, SortKey};
use crate::api::DataModel;
use crate::email::parse_date;
use crate::Server;
use jmap_proto::error::MethodError;
use serde_json::Value;
use store::{Collection, Record};

pub(crate) struct StorageNodeModel;

impl DataModel for StorageNodeModel {
    const COLLECTION: Collection = Collection::StorageNode;

    fn condition(
        _server: &Server,
        _cx: &mut QueryContext,
        record: &Record,
        predicate: &str,
        argument: &Value,
    ) -> jmap_proto::Result<bool> {
        match predicate {
            "parentId" => Ok(match argument.as_str() {
                Some(parent_id) => record.str_value("parentId") == Some(parent_id),
                None => record.str_value("parentId").is_none(),
            }),
            "name" => Ok(argument.as_str().is_some_and(|name| {
                record
                    .str_value("name")
                    .is_some_and(|value| value.to_lowercase().contains(&name.to_lowercase()))
            })),
            "type" => Ok(argument
                .as_str()
                .is_some_and(|node_type| record.str_value("type") == Some(node_type))),
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
            "name" => Ok(SortKey::Text(
                record.str_value("name").unwrap_or_default().to_lowercase(),
            )),
            "size" => Ok(SortKey::Number(record.int_value("size").unwrap_or(0))),
            "modified" => Ok(SortKey::Number(
                record
                    .str_value("modified")
                    .and_then(parse_date)
                    .unwrap_or(0),
            )),
            _ => Err(MethodError::invalid_arguments(format!(
                "Unsupported sort property {:?}",
                property
            ))),
        }
    }
}
