/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::api::SyncSource;
use crate::Server;
use jmap_proto::method::RefreshSyncedResponse;
use serde_json::{Map, Value};
use std::future::Future;

pub trait CalendarRefresh: Sync + Send {
    fn calendar_refresh_synced(
        &self,
        arguments: Map<String, Value>,
    ) -> impl Future<Output = jmap_proto::Result<RefreshSyncedResponse>> + Send;
}

impl CalendarRefresh for Server {
    /// Forces a re-sync of the calendar collections from the upstream
    /// CalDAV source.
    async fn calendar_refresh_synced(
        &self,
        arguments: Map<String, Value>,
    ) -> jmap_proto::Result<RefreshSyncedResponse> {
        let account_id = self.assert_account(
            arguments
                .get("accountId")
                .and_then(|id| id.as_str())
                .map(str::to_string),
        )?;

        self.sync(SyncSource::Calendars).await?;

        Ok(RefreshSyncedResponse { account_id })
    }
}
