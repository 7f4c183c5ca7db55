/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod get;
pub mod refresh;
pub mod set;

use crate::api::{DataModel, SyncSource};
use jmap_proto::error::set::SetError;
use serde_json::{Map, Value};
use store::Collection;

pub(crate) struct CalendarModel;

impl DataModel for CalendarModel {
    const COLLECTION: Collection = Collection::Calendar;
    const SYNC: SyncSource = SyncSource::Calendars;

    fn validate_create(
        _server: &crate::Server,
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
                .with_description("Calendar must have a name."));
        }
        Ok(())
    }
}
