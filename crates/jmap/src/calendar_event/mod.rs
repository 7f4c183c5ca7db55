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
use crate::email::parse_date;
use crate::Server;
use jmap_proto::error::set::SetError;
use jmap_proto::error::MethodError;
use serde_json::{Map, Value};
use store::{Collection, Record};

pub(crate) struct CalendarEventModel;

impl DataModel for CalendarEventModel {
    const COLLECTION: Collection = Collection::CalendarEvent;
    const SYNC: SyncSource = SyncSource::Calendars;

    fn condition(
        _server: &Server,
        _cx: &mut QueryContext,
        record: &Record,
        predicate: &str,
        argument: &Value,
    ) -> jmap_proto::Result<bool> {
        match predicate {
            "inCalendar" => Ok(argument
                .as_str()
                .is_some_and(|calendar_id| record.str_value("calendarId") == Some(calendar_id))),
            "before" => Ok(event_start(record) < date_argument(argument)?),
            "after" => Ok(event_start(record) >= date_argument(argument)?),
            "text" => Ok(argument.as_str().is_some_and(|text| {
                let text = text.to_lowercase();
                ["title", "description", "location"].iter().any(|field| {
                    record
                        .str_value(field)
                        .is_some_and(|value| value.to_lowercase().contains(&text))
                })
            })),
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
            "start" => Ok(SortKey::Number(event_start(record))),
            "title" => Ok(SortKey::Text(
                record.str_value("title").unwrap_or_default().to_lowercase(),
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
        match value.get("calendarId").and_then(|id| id.as_str()) {
            Some(calendar_id)
                if server
                    .store
                    .get_active(Collection::Calendar, calendar_id)
                    .is_some() =>
            {
                Ok(())
            }
            _ => Err(SetError::invalid_properties()
                .with_property("calendarId")
                .with_description("Event must belong to an existing calendar.")),
        }
    }
}

fn event_start(record: &Record) -> i64 {
    record
        .str_value("start")
        .and_then(parse_date)
        .unwrap_or(0)
}

fn date_argument(argument: &Value) -> jmap_proto::Result<i64> {
    argument
        .as_str()
        .and_then(parse_date)
        .ok_or_else(|| MethodError::invalid_arguments("Expected an UTC date argument."))
}
