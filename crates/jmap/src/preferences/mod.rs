/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod get;
pub mod set;

use crate::api::{singleton_records, DataModel};
use crate::Server;
use serde_json::Map;
use store::{Collection, Record};

pub(crate) struct UserPreferencesModel;
pub(crate) struct ClientPreferencesModel;
pub(crate) struct CalendarPreferencesModel;

macro_rules! singleton_model {
    ($model:ident, $collection:expr) => {
        impl DataModel for $model {
            const COLLECTION: Collection = $collection;

            fn load_all(server: &Server) -> Vec<Record> {
                singleton_records(server, Self::COLLECTION, Map::new())
            }

            fn load_one(server: &Server, id: &str) -> Option<Record> {
                Self::load_all(server)
                    .into_iter()
                    .find(|record| record.id == id)
            }
        }
    };
}

singleton_model!(UserPreferencesModel, Collection::UserPreferences);
singleton_model!(ClientPreferencesModel, Collection::ClientPreferences);
singleton_model!(CalendarPreferencesModel, Collection::CalendarPreferences);
