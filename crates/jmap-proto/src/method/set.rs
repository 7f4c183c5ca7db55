/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::error::set::SetError;
use crate::error::MethodError;
use crate::response::Response;
use crate::types::state::State;
use indexmap::IndexMap;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRequest {
    pub account_id: Option<String>,
    pub if_in_state: Option<State>,
    pub create: Option<Map<String, Value>>,
    pub update: Option<Map<String, Value>>,
    pub destroy: Option<Vec<String>>,

    /// Type-specific extras, e.g. `onSuccessUpdateEmail` on
    /// `EmailSubmission/set`.
    #[serde(flatten)]
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetResponse {
    pub account_id: String,

    pub old_state: State,

    pub new_state: State,

    #[serde(skip_serializing_if = "Map::is_empty")]
    pub created: Map<String, Value>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub updated: IndexMap<String, Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destroyed: Vec<String>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub not_created: IndexMap<String, SetError>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub not_updated: IndexMap<String, SetError>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub not_destroyed: IndexMap<String, SetError>,
}

impl SetRequest {
    pub fn validate(&self, max_objects_in_set: usize) -> crate::Result<()> {
        if self.create.as_ref().map_or(0, |objs| objs.len())
            + self.update.as_ref().map_or(0, |objs| objs.len())
            + self.destroy.as_ref().map_or(0, |ids| ids.len())
            > max_objects_in_set
        {
            Err(MethodError::RequestTooLarge)
        } else {
            Ok(())
        }
    }

    pub fn unwrap_create(&mut self) -> Map<String, Value> {
        self.create.take().unwrap_or_default()
    }

    pub fn unwrap_update(&mut self) -> Map<String, Value> {
        self.update.take().unwrap_or_default()
    }

    pub fn unwrap_destroy(&mut self) -> Vec<String> {
        self.destroy.take().unwrap_or_default()
    }
}

impl SetResponse {
    pub fn new(account_id: String) -> Self {
        SetResponse {
            account_id,
            ..Default::default()
        }
    }

    pub fn with_state(mut self, state: State) -> Self {
        self.old_state = state;
        self.new_state = state;
        self
    }

    /// Records a successful create, mapping the client placeholder to the
    /// server-assigned fields.
    pub fn created(&mut self, placeholder: String, id: &str) {
        let mut object = Map::with_capacity(1);
        object.insert("id".to_string(), Value::String(id.to_string()));
        self.created.insert(placeholder, Value::Object(object));
    }

    pub fn created_id(&self, placeholder: &str) -> Option<&str> {
        self.created
            .get(placeholder)
            .and_then(|object| object.get("id"))
            .and_then(|id| id.as_str())
    }

    pub fn has_changes(&self) -> bool {
        !self.created.is_empty() || !self.updated.is_empty() || !self.destroyed.is_empty()
    }

    /// Registers the ids created by this call into the per-request map so
    /// later calls in the same batch can use `#placeholder` references.
    pub fn update_created_ids(&self, response: &mut Response) {
        for (placeholder, object) in &self.created {
            if let Some(id) = object.get("id").and_then(|id| id.as_str()) {
                response
                    .created_ids
                    .insert(placeholder.clone(), id.to_string());
            }
        }
    }
}
