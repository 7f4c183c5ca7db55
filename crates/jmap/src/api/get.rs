/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::api::DataModel;
use crate::Server;
use jmap_proto::error::MethodError;
use jmap_proto::method::get::{GetRequest, GetResponse};
use jmap_proto::types::state::State;
use serde_json::{Map, Value};

/// The uniform `/get` implementation: materialize the requested objects
/// (all active ones when `ids` is null), then project to the requested
/// properties. The id property is always present.
pub(crate) fn get_type<T: DataModel>(
    server: &Server,
    mut request: GetRequest,
) -> jmap_proto::Result<GetResponse> {
    let account_id = server.assert_account(request.account_id.take())?;
    let properties = request.properties.take();

    let mut list = Vec::new();
    let mut not_found = Vec::new();

    match request.ids.take() {
        Some(ids) => {
            if ids.len() > server.config.max_objects_in_get {
                return Err(MethodError::RequestTooLarge);
            }
            for id in ids {
                match T::load_one(server, &id).filter(|record| record.active) {
                    Some(record) => list.push(project(
                        T::materialize(server, &record),
                        properties.as_deref(),
                    )),
                    None => not_found.push(id),
                }
            }
        }
        None => {
            for record in T::load_all(server) {
                if record.active {
                    list.push(project(
                        T::materialize(server, &record),
                        properties.as_deref(),
                    ));
                }
            }
        }
    }

    Ok(GetResponse {
        account_id,
        state: State::from(T::state(server)),
        list,
        not_found,
    })
}

fn project(object: Map<String, Value>, properties: Option<&[String]>) -> Value {
    match properties {
        None => Value::Object(object),
        Some(properties) => {
            let mut projected = Map::with_capacity(properties.len() + 1);
            if let Some(id) = object.get("id") {
                projected.insert("id".to_string(), id.clone());
            }
            for property in properties {
                if property != "id" {
                    if let Some(value) = object.get(property) {
                        projected.insert(property.clone(), value.clone());
                    }
                }
            }
            Value::Object(projected)
        }
    }
}
