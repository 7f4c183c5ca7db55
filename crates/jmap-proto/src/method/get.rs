/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::types::state::State;
use serde_json::Value;

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRequest {
    pub account_id: Option<String>,
    pub ids: Option<Vec<String>>,
    pub properties: Option<Vec<String>>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse {
    pub account_id: String,
    pub state: State,
    pub list: Vec<Value>,
    pub not_found: Vec<String>,
}
