/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::types::filter::{Comparator, Filter};
use crate::types::state::State;

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub account_id: Option<String>,
    pub filter: Option<Filter>,
    pub sort: Option<Vec<Comparator>>,
    pub position: Option<i32>,
    pub anchor: Option<String>,
    pub anchor_offset: Option<i32>,
    pub limit: Option<usize>,
    pub collapse_threads: Option<bool>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub account_id: String,

    pub query_state: State,

    pub can_calculate_changes: bool,

    pub position: i32,

    pub ids: Vec<String>,

    pub total: usize,
}
