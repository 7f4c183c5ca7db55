/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{Record, Result, Store, StoreError};
use ahash::AHashSet;
use serde_json::Value;

/// The synchronizable upstream mail/calendar source. `/set` flows call
/// the sync entry points around their read-modify-write window so the
/// local records reflect upstream before and after a write; text-search
/// predicates delegate to [`RemoteSource::search`].
///
/// Implementations may block on network I/O; the core treats every call
/// as ordinary awaited I/O and never cancels it.
#[async_trait::async_trait]
pub trait RemoteSource: Send + Sync {
    async fn sync_folders(&self, store: &Store) -> Result<()>;

    async fn sync_mail(&self, store: &Store) -> Result<()>;

    async fn sync_calendars(&self, store: &Store) -> Result<()>;

    async fn sync_addressbooks(&self, store: &Store) -> Result<()>;

    /// Full-text search over one message field, returning the matching
    /// email ids. Results are memoized per query by the caller.
    async fn search(&self, field: &str, term: &str) -> Result<AHashSet<String>>;

    /// Appends a raw message upstream. The local record is created by the
    /// caller; this pushes the copy to the source of truth.
    async fn import_message(&self, store: &Store, blob: &[u8], mailbox_ids: &[String])
        -> Result<()>;

    /// Hands a message to the outbound mail path.
    async fn submit(&self, store: &Store, email: &Record, envelope: Option<&Value>) -> Result<()>;

    async fn get_blob(&self, blob_id: &str) -> Result<Vec<u8>>;
}

/// A remote source with nothing behind it: syncs are no-ops and search
/// matches nothing. Used in tests and for stores without an upstream.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRemote;

#[async_trait::async_trait]
impl RemoteSource for NullRemote {
    async fn sync_folders(&self, _store: &Store) -> Result<()> {
        Ok(())
    }

    async fn sync_mail(&self, _store: &Store) -> Result<()> {
        Ok(())
    }

    async fn sync_calendars(&self, _store: &Store) -> Result<()> {
        Ok(())
    }

    async fn sync_addressbooks(&self, _store: &Store) -> Result<()> {
        Ok(())
    }

    async fn search(&self, _field: &str, _term: &str) -> Result<AHashSet<String>> {
        Ok(AHashSet::default())
    }

    async fn import_message(
        &self,
        _store: &Store,
        _blob: &[u8],
        _mailbox_ids: &[String],
    ) -> Result<()> {
        Ok(())
    }

    async fn submit(
        &self,
        _store: &Store,
        _email: &Record,
        _envelope: Option<&Value>,
    ) -> Result<()> {
        Ok(())
    }

    async fn get_blob(&self, blob_id: &str) -> Result<Vec<u8>> {
        tracing::debug!(blob_id, "blob fetch without blob store");
        Err(StoreError::Unsupported("blob storage is not configured"))
    }
}
