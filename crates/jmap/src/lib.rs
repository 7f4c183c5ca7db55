/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod addressbook;
pub mod api;
pub mod calendar;
pub mod calendar_event;
pub mod changes;
pub mod contact;
pub mod contact_group;
pub mod email;
pub mod file;
pub mod identity;
pub mod mailbox;
pub mod preferences;
pub mod quota;
pub mod submission;
pub mod thread;
pub mod vacation;

use crate::api::SyncSource;
use jmap_proto::error::MethodError;
use std::sync::Arc;
use store::remote::RemoteSource;
use store::write::BatchBuilder;
use store::{ModSeq, Store, StoreError};

/// The JMAP API core for one account: routes request batches to the
/// typed method handlers against the backing store and the remote
/// mail/calendar source.
pub struct Server {
    pub store: Store,
    pub remote: Arc<dyn RemoteSource>,
    pub config: JmapConfig,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct JmapConfig {
    pub account_id: String,
    pub max_objects_in_get: usize,
    pub max_objects_in_set: usize,
    pub changes_max_results: usize,
    pub query_max_results: usize,
    pub snippet_max_results: usize,
}

impl Default for JmapConfig {
    fn default() -> Self {
        JmapConfig {
            account_id: "u1".to_string(),
            max_objects_in_get: 500,
            max_objects_in_set: 500,
            changes_max_results: 5000,
            query_max_results: 5000,
            snippet_max_results: 100,
        }
    }
}

impl JmapConfig {
    pub fn parse(config: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(config)
    }
}

impl Server {
    pub fn new(store: Store, remote: Arc<dyn RemoteSource>, config: JmapConfig) -> Self {
        Server {
            store,
            remote,
            config,
        }
    }

    /// A supplied accountId must name the current account; a missing one
    /// defaults to it.
    pub(crate) fn assert_account(
        &self,
        account_id: Option<String>,
    ) -> jmap_proto::Result<String> {
        match account_id {
            Some(account_id) if account_id != self.config.account_id => {
                Err(MethodError::AccountNotFound)
            }
            _ => Ok(self.config.account_id.clone()),
        }
    }

    pub(crate) fn commit(&self, batch: BatchBuilder) -> jmap_proto::Result<ModSeq> {
        self.store.commit(batch).map_err(into_method_error)
    }

    pub(crate) async fn sync(&self, source: SyncSource) -> jmap_proto::Result<()> {
        match source {
            SyncSource::None => Ok(()),
            SyncSource::Folders => self.remote.sync_folders(&self.store).await,
            SyncSource::Mail => self.remote.sync_mail(&self.store).await,
            SyncSource::Calendars => self.remote.sync_calendars(&self.store).await,
            SyncSource::Addressbooks => self.remote.sync_addressbooks(&self.store).await,
        }
        .map_err(into_method_error)
    }
}

pub(crate) fn into_method_error(err: StoreError) -> MethodError {
    MethodError::ServerError(err.to_string())
}
