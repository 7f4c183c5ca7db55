/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod get;
pub mod set;

use crate::api::{DataModel, SyncSource};
use jmap_proto::error::set::SetError;
use serde_json::{Map, Value};
use store::Collection;

pub(crate) struct ContactGroupModel;

impl DataModel for ContactGroupModel {
    const COLLECTION: Collection = Collection::ContactGroup;
    const SYNC: SyncSource = SyncSource::Addressbooks;

    fn validate_create(
        _server: &crate::Server,
        _id: &str,
        value: &mut Map<String, Value>,
    ) -> Result<(), SetError> {
        if !value.contains_key("contactIds") {
            value.insert("contactIds".to_string(), Value::Array(Vec::new()));
        }
        Ok(())
    }
}
