/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::api::DataModel;
use crate::Server;
use ahash::AHashMap;
use jmap_proto::error::set::SetError;
use jmap_proto::error::MethodError;
use jmap_proto::method::set::{SetRequest, SetResponse};
use jmap_proto::references::jsptr::unescape_segment;
use jmap_proto::references::resolve_id_references;
use jmap_proto::types::state::State;
use serde_json::{Map, Value};
use store::write::BatchBuilder;

/// The uniform `/set` orchestration: superlock, sync, sample `oldState`,
/// create (registering placeholder ids for the rest of the batch),
/// expand and apply update patches, destroy, sync again, sample
/// `newState`. Per-entity failures land in the `not*` maps; the call
/// itself still succeeds.
pub(crate) async fn set_type<T: DataModel>(
    server: &Server,
    mut request: SetRequest,
) -> jmap_proto::Result<SetResponse> {
    let account_id = server.assert_account(request.account_id.take())?;
    request.validate(server.config.max_objects_in_set)?;

    if T::COLLECTION.is_singleton() {
        return singleton_set::<T>(server, request, account_id).await;
    }

    let _guard = server.store.write_lock(T::COLLECTION).await;
    server.sync(T::SYNC).await?;

    let old_state = State::from(T::state(server));
    if request
        .if_in_state
        .as_ref()
        .is_some_and(|state| *state != old_state)
    {
        return Err(MethodError::StateMismatch);
    }

    let mut response = SetResponse::new(account_id).with_state(old_state);
    let will_destroy = request.unwrap_destroy();
    let mut created_ids: AHashMap<String, String> = AHashMap::new();

    // Process creates
    let create = request.unwrap_create();
    if !create.is_empty() {
        let mut batch = BatchBuilder::new();
        batch.with_collection(T::COLLECTION);
        for (placeholder, object) in create {
            let mut object = match object {
                Value::Object(object) => object,
                _ => {
                    response.not_created.insert(
                        placeholder,
                        SetError::invalid_properties().with_description("Expected an object."),
                    );
                    continue;
                }
            };
            // Creates earlier in this call are already referenceable.
            for value in object.values_mut() {
                resolve_id_references(value, &created_ids);
            }
            let id = server.store.assign_id(T::COLLECTION);
            match T::validate_create(server, &id, &mut object) {
                Ok(()) => {
                    batch.create(id.clone(), object);
                    created_ids.insert(placeholder.clone(), id.clone());
                    response.created(placeholder, &id);
                }
                Err(err) => {
                    response.not_created.insert(placeholder, err);
                }
            }
        }
        if !batch.is_empty() {
            T::decorate_batch(server, &mut batch);
            server.commit(batch)?;
        }
    }

    // Process updates
    let update = request.unwrap_update();
    if !update.is_empty() {
        let mut batch = BatchBuilder::new();
        batch.with_collection(T::COLLECTION);
        for (id, patch) in update {
            let id = resolve_id(id, &created_ids);
            let mut patch = match patch {
                Value::Object(patch) => patch,
                _ => {
                    response.not_updated.insert(
                        id,
                        SetError::invalid_properties().with_description("Expected an object."),
                    );
                    continue;
                }
            };
            if will_destroy.iter().any(|destroy_id| {
                resolve_id(destroy_id.clone(), &created_ids) == id
            }) {
                response.not_updated.insert(id, SetError::will_destroy());
                continue;
            }
            let record = match T::load_one(server, &id).filter(|record| record.active) {
                Some(record) => record,
                None => {
                    response.not_updated.insert(id, SetError::not_found());
                    continue;
                }
            };
            for value in patch.values_mut() {
                resolve_id_references(value, &created_ids);
            }
            let outcome = expand_patch(&mut patch, &T::materialize(server, &record))
                .and_then(|_| T::validate_update(server, &record, &mut patch));
            match outcome {
                Ok(()) => {
                    batch.update(id.clone(), patch);
                    response.updated.insert(id, Value::Null);
                }
                Err(err) => {
                    response.not_updated.insert(id, err);
                }
            }
        }
        if !batch.is_empty() {
            T::decorate_batch(server, &mut batch);
            server.commit(batch)?;
        }
    }

    // Process destroys
    if !will_destroy.is_empty() {
        let mut batch = BatchBuilder::new();
        batch.with_collection(T::COLLECTION);
        for id in will_destroy {
            let id = resolve_id(id, &created_ids);
            match T::load_one(server, &id).filter(|record| record.active) {
                Some(record) => match T::validate_destroy(server, &record) {
                    Ok(()) => {
                        batch.destroy(id.clone());
                        response.destroyed.push(id);
                    }
                    Err(err) => {
                        response.not_destroyed.insert(id, err);
                    }
                },
                None => {
                    response.not_destroyed.insert(id, SetError::not_found());
                }
            }
        }
        if !batch.is_empty() {
            T::decorate_batch(server, &mut batch);
            server.commit(batch)?;
        }
    }

    server.sync(T::SYNC).await?;
    response.new_state = State::from(T::state(server));

    Ok(response)
}

/// Singleton-typed `/set`: create and destroy are always rejected and
/// only the well-known id is updatable, by read-merge-write over the
/// singleton's current full value.
async fn singleton_set<T: DataModel>(
    server: &Server,
    mut request: SetRequest,
    account_id: String,
) -> jmap_proto::Result<SetResponse> {
    let _guard = server.store.write_lock(T::COLLECTION).await;

    let old_state = State::from(T::state(server));
    if request
        .if_in_state
        .as_ref()
        .is_some_and(|state| *state != old_state)
    {
        return Err(MethodError::StateMismatch);
    }

    let mut response = SetResponse::new(account_id).with_state(old_state);

    for (placeholder, _) in request.unwrap_create() {
        response.not_created.insert(
            placeholder,
            SetError::singleton().with_description("Can't create singleton types"),
        );
    }
    for id in request.unwrap_destroy() {
        response.not_destroyed.insert(
            id,
            SetError::singleton().with_description("Can't destroy singleton types"),
        );
    }

    let mut batch = BatchBuilder::new();
    batch.with_collection(T::COLLECTION);
    for (id, patch) in request.unwrap_update() {
        if id != "singleton" {
            response.not_updated.insert(id, SetError::not_found());
            continue;
        }
        let mut patch = match patch {
            Value::Object(patch) => patch,
            _ => {
                response.not_updated.insert(
                    id,
                    SetError::invalid_properties().with_description("Expected an object."),
                );
                continue;
            }
        };

        let current = server.store.get_active(T::COLLECTION, "singleton");
        let current_value = current
            .as_ref()
            .map(|record| record.value.clone())
            .unwrap_or_default();
        if let Err(err) = expand_patch(&mut patch, &current_value) {
            response.not_updated.insert(id, err);
            continue;
        }

        if current.is_some() {
            batch.update(id.clone(), patch);
        } else {
            patch.retain(|_, value| !value.is_null());
            batch.create(id.clone(), patch);
        }
        response.updated.insert(id, Value::Null);
    }
    if !batch.is_empty() {
        server.commit(batch)?;
    }

    response.new_state = State::from(T::state(server));

    Ok(response)
}

fn resolve_id(id: String, created_ids: &AHashMap<String, String>) -> String {
    id.strip_prefix('#')
        .and_then(|placeholder| created_ids.get(placeholder))
        .cloned()
        .unwrap_or(id)
}

/// Expands slash-keyed deep patches against the object's current value:
/// for every top-level property touched, the stored value is loaded,
/// the pointer leaves are set (null deletes), and the flat keys are
/// replaced by the rebuilt top-level property. Applying the expansion
/// twice yields the same update map as once.
pub(crate) fn expand_patch(
    patch: &mut Map<String, Value>,
    current: &Map<String, Value>,
) -> Result<(), SetError> {
    let pointer_keys = patch
        .keys()
        .filter(|key| key.contains('/'))
        .cloned()
        .collect::<Vec<_>>();
    if pointer_keys.is_empty() {
        return Ok(());
    }

    let mut staged: Map<String, Value> = Map::new();
    for key in pointer_keys {
        let leaf_value = patch.remove(&key).unwrap_or(Value::Null);
        let mut segments = key.split('/').map(unescape_segment);
        let top = segments.next().unwrap_or_default();
        let path = segments.collect::<Vec<_>>();

        let target = staged.entry(top.clone()).or_insert_with(|| {
            current
                .get(&top)
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new()))
        });
        set_leaf(target, &path, leaf_value)?;
    }

    for (key, value) in staged {
        patch.insert(key, value);
    }
    Ok(())
}

fn set_leaf(target: &mut Value, path: &[String], value: Value) -> Result<(), SetError> {
    let (leaf, parents) = match path.split_last() {
        Some(split) => split,
        None => return Err(SetError::invalid_patch().with_description("Empty patch path.")),
    };

    let mut cursor = target;
    for segment in parents {
        cursor = match cursor {
            Value::Object(map) => map
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new())),
            _ => {
                return Err(SetError::invalid_patch()
                    .with_description("Patch path does not address an object."));
            }
        };
    }

    match cursor {
        Value::Object(map) => {
            if value.is_null() {
                map.remove(leaf);
            } else {
                map.insert(leaf.clone(), value);
            }
            Ok(())
        }
        _ => Err(SetError::invalid_patch()
            .with_description("Patch path does not address an object.")),
    }
}

/// Reads the ids of a JMAP id-set value (`{"id": true, ...}`).
pub(crate) fn id_set_keys(value: &Value) -> Vec<String> {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .filter(|(_, enabled)| enabled.as_bool().unwrap_or(false))
                .map(|(id, _)| id.clone())
                .collect()
        })
        .unwrap_or_default()
}
