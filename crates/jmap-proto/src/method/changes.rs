/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::types::state::State;

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangesRequest {
    pub account_id: Option<String>,
    pub since_state: Option<State>,
    pub max_changes: Option<usize>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangesResponse {
    pub account_id: String,

    pub old_state: State,

    pub new_state: State,

    pub has_more_changes: bool,

    pub created: Vec<String>,

    pub updated: Vec<String>,

    pub removed: Vec<String>,

    /// Mailboxes only: set when every reported update touched nothing
    /// but the message counts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_properties: Option<Vec<String>>,
}

impl ChangesResponse {
    pub fn new(account_id: String, old_state: State, new_state: State) -> Self {
        ChangesResponse {
            account_id,
            old_state,
            new_state,
            has_more_changes: false,
            created: Vec::new(),
            updated: Vec::new(),
            removed: Vec::new(),
            changed_properties: None,
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.created.is_empty() || !self.updated.is_empty() || !self.removed.is_empty()
    }
}
