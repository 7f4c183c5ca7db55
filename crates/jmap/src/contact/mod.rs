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
use jmap_proto::error::MethodError;
use serde_json::Value;
use store::{Collection, Record};

pub(crate) struct ContactModel;

impl DataModel for ContactModel {
    const COLLECTION: Collection = Collection::Contact;
    const SYNC: SyncSource = SyncSource::Addressbooks;

    fn condition(
        _server: &Server,
        _cx: &mut QueryContext,
        record: &Record,
        predicate: &str,
        argument: &Value,
    ) -> jmap_proto::Result<bool> {
        match predicate {
            "inAddressbook" => Ok(argument.as_str().is_some_and(|addressbook_id| {
                record.str_value("addressbookId") == Some(addressbook_id)
            })),
            "text" => Ok(argument.as_str().is_some_and(|text| {
                let text = text.to_lowercase();
                ["firstName", "lastName", "company", "nickname"]
                    .iter()
                    .any(|field| {
                        record
                            .str_value(field)
                            .is_some_and(|value| value.to_lowercase().contains(&text))
                    })
                    || contact_emails(record)
                        .any(|email| email.to_lowercase().contains(&text))
            })),
            "email" => Ok(argument.as_str().is_some_and(|email| {
                let email = email.to_lowercase();
                contact_emails(record).any(|value| value.to_lowercase().contains(&email))
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
            "firstName" | "lastName" => Ok(SortKey::Text(
                record.str_value(property).unwrap_or_default().to_lowercase(),
            )),
            _ => Err(MethodError::invalid_arguments(format!(
                "Unsupported sort property {:?}",
                property
            ))),
        }
    }
}

fn contact_emails(record: &Record) -> impl Iterator<Item = &str> {
    record
        .value
        .get("emails")
        .and_then(|emails| emails.as_array())
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            entry
                .as_object()
                .and_then(|entry| entry.get("value"))
                .and_then(|value| value.as_str())
        })
}
