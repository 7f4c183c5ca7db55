/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod changes;
pub mod copy;
pub mod get;
pub mod import;
pub mod query;
pub mod query_changes;
pub mod search_snippet;
pub mod set;

/// Response of `Calendar/refreshSynced`: the re-sync either completed or
/// the call failed, so the payload only echoes the account.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSyncedResponse {
    pub account_id: String,
}
