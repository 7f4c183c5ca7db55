/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod jsptr;

use crate::error::MethodError;
use crate::request::reference::ResultReference;
use crate::response::{Response, ResponseMethod};
use ahash::AHashMap;
use compact_str::format_compact;
use serde_json::{Map, Value};

impl Response {
    /// Substitutes every `#name` argument whose value is a result
    /// reference with the pointer evaluation over the referenced call's
    /// successful results. The substitution is shallow: only top-level
    /// argument keys are considered.
    pub fn resolve_references(&self, arguments: &mut Map<String, Value>) -> crate::Result<()> {
        let reference_keys = arguments
            .keys()
            .filter(|key| key.starts_with('#'))
            .cloned()
            .collect::<Vec<_>>();

        for key in reference_keys {
            let value = arguments.remove(&key).unwrap_or(Value::Null);
            let reference: ResultReference = serde_json::from_value(value).map_err(|_| {
                MethodError::InvalidResultReference(
                    format_compact!("Invalid result reference in argument {key:?}.").into(),
                )
            })?;
            let results = self.eval_result_reference(&reference)?;
            arguments.insert(key[1..].to_string(), Value::Array(results));
        }

        Ok(())
    }

    /// Evaluates the pointer against each successful result stored under
    /// the referenced tag, concatenating the normalized arrays. A tag
    /// with no successful results is unknown to the resolver.
    pub fn eval_result_reference(&self, reference: &ResultReference) -> crate::Result<Vec<Value>> {
        let mut results = Vec::new();
        let mut found = false;

        for call in &self.method_responses {
            if call.id != reference.result_of
                || matches!(call.method, ResponseMethod::Error(_))
            {
                continue;
            }
            found = true;
            let payload = serde_json::to_value(&call.method).map_err(|err| {
                MethodError::InternalError(format!("Failed to evaluate {reference}: {err}"))
            })?;
            results.extend(reference.path.resolve(&payload));
        }

        if found {
            Ok(results)
        } else {
            Err(MethodError::InvalidResultReference(
                format_compact!("Failed to evaluate {reference} result reference.").into(),
            ))
        }
    }

    /// Replaces `#placeholder` creation ids with the ids assigned earlier
    /// in this batch, recursing through argument values (id lists, nested
    /// objects and their keys).
    pub fn resolve_created_ids(&self, arguments: &mut Map<String, Value>) {
        if self.created_ids.is_empty() {
            return;
        }
        for value in arguments.values_mut() {
            resolve_id_references(value, &self.created_ids);
        }
    }
}

/// Deep `#placeholder` substitution over a JSON value. Strings and object
/// keys that name a known placeholder are replaced with the assigned id;
/// unknown placeholders pass through so the backend can report them.
pub fn resolve_id_references(value: &mut Value, ids: &AHashMap<String, String>) {
    match value {
        Value::String(text) => {
            if let Some(id) = text.strip_prefix('#').and_then(|key| ids.get(key)) {
                *text = id.clone();
            }
        }
        Value::Array(items) => {
            for item in items {
                resolve_id_references(item, ids);
            }
        }
        Value::Object(map) => {
            let replaced_keys = map
                .keys()
                .filter(|key| {
                    key.strip_prefix('#')
                        .is_some_and(|placeholder| ids.contains_key(placeholder))
                })
                .cloned()
                .collect::<Vec<_>>();
            for key in replaced_keys {
                if let Some(item) = map.remove(&key) {
                    map.insert(ids[&key[1..]].clone(), item);
                }
            }
            for item in map.values_mut() {
                resolve_id_references(item, ids);
            }
        }
        _ => (),
    }
}
