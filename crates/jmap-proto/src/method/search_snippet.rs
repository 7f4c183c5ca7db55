/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::types::filter::Filter;

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSearchSnippetRequest {
    pub account_id: Option<String>,
    pub filter: Option<Filter>,
    pub email_ids: Vec<String>,
    pub collapse_threads: Option<bool>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub email_id: String,

    pub subject: Option<String>,

    pub preview: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSearchSnippetResponse {
    pub account_id: String,

    pub list: Vec<SearchSnippet>,

    pub not_found: Vec<String>,
}
