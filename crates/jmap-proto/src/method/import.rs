/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::error::set::SetError;
use crate::types::state::State;
use ahash::AHashMap;
use indexmap::IndexMap;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEmailRequest {
    pub account_id: Option<String>,
    pub if_in_state: Option<State>,
    pub emails: Map<String, Value>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEmail {
    pub blob_id: Option<String>,
    #[serde(default)]
    pub mailbox_ids: AHashMap<String, bool>,
    #[serde(default)]
    pub keywords: AHashMap<String, bool>,
    pub received_at: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEmailResponse {
    pub account_id: String,

    pub old_state: State,

    pub new_state: State,

    #[serde(skip_serializing_if = "Map::is_empty")]
    pub created: Map<String, Value>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub not_created: IndexMap<String, SetError>,
}

impl ImportEmailResponse {
    pub fn update_created_ids(&self, response: &mut crate::response::Response) {
        for (placeholder, object) in &self.created {
            if let Some(id) = object.get("id").and_then(|id| id.as_str()) {
                response
                    .created_ids
                    .insert(placeholder.clone(), id.to_string());
            }
        }
    }
}
