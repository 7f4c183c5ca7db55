/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod get;

use crate::api::{singleton_records, DataModel};
use crate::Server;
use serde_json::{Map, Value};
use store::{Collection, Record};

pub(crate) struct VacationModel;

impl DataModel for VacationModel {
    const COLLECTION: Collection = Collection::VacationResponse;

    fn load_all(server: &Server) -> Vec<Record> {
        let mut defaults = Map::with_capacity(1);
        defaults.insert("isEnabled".to_string(), Value::Bool(false));
        singleton_records(server, Self::COLLECTION, defaults)
    }

    fn load_one(server: &Server, id: &str) -> Option<Record> {
        Self::load_all(server)
            .into_iter()
            .find(|record| record.id == id)
    }
}
