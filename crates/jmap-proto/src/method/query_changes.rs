/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::types::filter::{Comparator, Filter};
use crate::types::state::State;

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryChangesRequest {
    pub account_id: Option<String>,
    pub filter: Option<Filter>,
    pub sort: Option<Vec<Comparator>>,
    pub since_query_state: Option<State>,
    pub max_changes: Option<usize>,
    pub up_to_email_id: Option<String>,
    pub collapse_threads: Option<bool>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryChangesResponse {
    pub account_id: String,

    pub old_query_state: State,

    pub new_query_state: State,

    pub total: usize,

    pub removed: Vec<String>,

    pub added: Vec<AddedItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AddedItem {
    pub id: String,
    pub index: usize,
}

impl AddedItem {
    pub fn new(id: String, index: usize) -> Self {
        AddedItem { id, index }
    }
}
