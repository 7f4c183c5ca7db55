/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod get;
pub mod query;
pub mod request;
pub mod set;

use crate::api::query::{QueryContext, SortKey};
use crate::Server;
use jmap_proto::error::set::SetError;
use jmap_proto::error::MethodError;
use serde_json::{Map, Value};
use store::write::BatchBuilder;
use store::{Collection, ModSeq, Record};

/// Which external source a data type synchronizes from around its
/// read-modify-write window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncSource {
    None,
    Folders,
    Mail,
    Calendars,
    Addressbooks,
}

/// The capability set one data type plugs into the uniform-verb
/// framework: how to load its records, evaluate its filter predicates,
/// derive its sort keys, and validate its writes. Every hook has a
/// sensible default so thin types only declare their collection.
pub(crate) trait DataModel {
    const COLLECTION: Collection;
    const SYNC: SyncSource = SyncSource::None;

    /// Every record of the type, including tombstones, in stable order.
    fn load_all(server: &Server) -> Vec<Record> {
        server.store.records(Self::COLLECTION)
    }

    fn load_one(server: &Server, id: &str) -> Option<Record> {
        server.store.get(Self::COLLECTION, id)
    }

    /// Current value of this type's state token.
    fn state(server: &Server) -> ModSeq {
        server.store.state(Self::COLLECTION)
    }

    /// Builds the client-visible object for one record.
    fn materialize(_server: &Server, record: &Record) -> Map<String, Value> {
        let mut object = Map::with_capacity(record.value.len() + 1);
        object.insert("id".to_string(), Value::String(record.id.clone()));
        object.extend(record.value.clone());
        object
    }

    /// Evaluates one leaf filter predicate against a record.
    fn condition(
        _server: &Server,
        _cx: &mut QueryContext,
        _record: &Record,
        predicate: &str,
        _argument: &Value,
    ) -> jmap_proto::Result<bool> {
        Err(MethodError::invalid_arguments(format!(
            "Unsupported filter {:?}",
            predicate
        )))
    }

    /// Derives the sort key of a record for one sort property.
    fn sort_key(
        _server: &Server,
        _cx: &mut QueryContext,
        _record: &Record,
        property: &str,
    ) -> jmap_proto::Result<SortKey> {
        Err(MethodError::invalid_arguments(format!(
            "Unsupported sort property {:?}",
            property
        )))
    }

    /// Validates and canonicalizes a to-be-created object.
    fn validate_create(
        _server: &Server,
        _id: &str,
        _value: &mut Map<String, Value>,
    ) -> Result<(), SetError> {
        Ok(())
    }

    /// Validates an expanded update patch against the stored record.
    fn validate_update(
        _server: &Server,
        _record: &Record,
        _patch: &mut Map<String, Value>,
    ) -> Result<(), SetError> {
        Ok(())
    }

    fn validate_destroy(_server: &Server, _record: &Record) -> Result<(), SetError> {
        Ok(())
    }

    /// Appends housekeeping writes to a batch about to be committed,
    /// e.g. mailbox count touches for email mutations.
    fn decorate_batch(_server: &Server, _batch: &mut BatchBuilder) {}
}

/// Loads a singleton collection, synthesizing the well-known object with
/// the given defaults when nothing has been stored yet.
pub(crate) fn singleton_records(
    server: &Server,
    collection: Collection,
    defaults: Map<String, Value>,
) -> Vec<Record> {
    let records = server.store.records(collection);
    if records.is_empty() {
        vec![Record {
            id: "singleton".to_string(),
            created: 0,
            modseq: 0,
            counts_modseq: 0,
            active: true,
            value: defaults,
        }]
    } else {
        records
    }
}
