/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod remote;
pub mod write;

use ahash::AHashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::sync::Arc;

/// A change sequence number. One monotonic counter spans all collections;
/// each collection's state token is the counter value of its last write.
pub type ModSeq = u64;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record {1:?} not found in {0}")]
    NotFound(Collection, String),
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    #[error("remote source failed: {0}")]
    Remote(String),
    #[error("internal store error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Mailbox,
    Thread,
    Email,
    EmailSubmission,
    Identity,
    Calendar,
    CalendarEvent,
    CalendarPreferences,
    Addressbook,
    Contact,
    ContactGroup,
    UserPreferences,
    ClientPreferences,
    VacationResponse,
    Quota,
    StorageNode,
}

impl Collection {
    pub const COUNT: usize = 16;

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Mailbox => "Mailbox",
            Collection::Thread => "Thread",
            Collection::Email => "Email",
            Collection::EmailSubmission => "EmailSubmission",
            Collection::Identity => "Identity",
            Collection::Calendar => "Calendar",
            Collection::CalendarEvent => "CalendarEvent",
            Collection::CalendarPreferences => "CalendarPreferences",
            Collection::Addressbook => "Addressbook",
            Collection::Contact => "Contact",
            Collection::ContactGroup => "ContactGroup",
            Collection::UserPreferences => "UserPreferences",
            Collection::ClientPreferences => "ClientPreferences",
            Collection::VacationResponse => "VacationResponse",
            Collection::Quota => "Quota",
            Collection::StorageNode => "StorageNode",
        }
    }

    /// Prefix letter for server-assigned ids of this collection.
    fn id_prefix(&self) -> char {
        match self {
            Collection::Mailbox => 'f',
            Collection::Thread => 't',
            Collection::Email => 'm',
            Collection::EmailSubmission => 'p',
            Collection::Identity => 'i',
            Collection::Calendar => 'c',
            Collection::CalendarEvent => 'e',
            Collection::Addressbook => 'a',
            Collection::Contact => 'k',
            Collection::ContactGroup => 'g',
            Collection::StorageNode => 'n',
            Collection::Quota => 'q',
            Collection::CalendarPreferences
            | Collection::UserPreferences
            | Collection::ClientPreferences
            | Collection::VacationResponse => 's',
        }
    }

    /// Singleton-typed collections hold exactly one object with the
    /// well-known id `singleton`.
    pub fn is_singleton(&self) -> bool {
        matches!(
            self,
            Collection::CalendarPreferences
                | Collection::UserPreferences
                | Collection::ClientPreferences
                | Collection::VacationResponse
        )
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Collection::Mailbox => 0,
            Collection::Thread => 1,
            Collection::Email => 2,
            Collection::EmailSubmission => 3,
            Collection::Identity => 4,
            Collection::Calendar => 5,
            Collection::CalendarEvent => 6,
            Collection::CalendarPreferences => 7,
            Collection::Addressbook => 8,
            Collection::Contact => 9,
            Collection::ContactGroup => 10,
            Collection::UserPreferences => 11,
            Collection::ClientPreferences => 12,
            Collection::VacationResponse => 13,
            Collection::Quota => 14,
            Collection::StorageNode => 15,
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The uniform shape of every stored domain object: an opaque id, the
/// modseq it was created at, the modseq of its last change, a soft-delete
/// flag, and the type-specific payload. Mailboxes additionally track a
/// count-only modseq, bumped when message counts changed but nothing
/// else did.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub created: ModSeq,
    pub modseq: ModSeq,
    pub counts_modseq: ModSeq,
    pub active: bool,
    pub value: Map<String, Value>,
}

impl Record {
    /// Highest modseq that affects this record's visibility to clients.
    pub fn change_modseq(&self) -> ModSeq {
        self.modseq.max(self.counts_modseq)
    }

    pub fn str_value(&self, field: &str) -> Option<&str> {
        self.value.get(field).and_then(|v| v.as_str())
    }

    pub fn int_value(&self, field: &str) -> Option<i64> {
        self.value.get(field).and_then(|v| v.as_i64())
    }

    pub fn bool_value(&self, field: &str) -> Option<bool> {
        self.value.get(field).and_then(|v| v.as_bool())
    }

    /// Keys of a JMAP id-set property such as `mailboxIds` or `keywords`
    /// (entries with a true value).
    pub fn id_set(&self, field: &str) -> impl Iterator<Item = &str> {
        self.value
            .get(field)
            .and_then(|v| v.as_object())
            .into_iter()
            .flat_map(|map| {
                map.iter()
                    .filter(|(_, enabled)| enabled.as_bool().unwrap_or(false))
                    .map(|(key, _)| key.as_str())
            })
    }
}

#[derive(Default)]
struct Data {
    records: AHashMap<Collection, IndexMap<String, Record>>,
    states: AHashMap<Collection, ModSeq>,
    modseq: ModSeq,
    deleted_modseq: ModSeq,
    id_counter: u64,
}

/// The in-memory backing store. Reads are snapshot clones under a read
/// lock; every write goes through a [`write::BatchBuilder`] committed
/// atomically. State-advancing write sequences additionally serialize on
/// the per-collection [`Store::write_lock`] superlock.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

struct Inner {
    data: RwLock<Data>,
    write_locks: Vec<tokio::sync::Mutex<()>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Store {
            inner: Arc::new(Inner {
                data: RwLock::new(Data::default()),
                write_locks: (0..Collection::COUNT)
                    .map(|_| tokio::sync::Mutex::new(()))
                    .collect(),
            }),
        }
    }

    /// All records of a collection, including soft-deleted ones, in
    /// insertion order.
    pub fn records(&self, collection: Collection) -> Vec<Record> {
        self.inner
            .data
            .read()
            .records
            .get(&collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn active_records(&self, collection: Collection) -> Vec<Record> {
        self.inner
            .data
            .read()
            .records
            .get(&collection)
            .map(|records| {
                records
                    .values()
                    .filter(|record| record.active)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get(&self, collection: Collection, id: &str) -> Option<Record> {
        self.inner
            .data
            .read()
            .records
            .get(&collection)?
            .get(id)
            .cloned()
    }

    pub fn get_active(&self, collection: Collection, id: &str) -> Option<Record> {
        self.get(collection, id).filter(|record| record.active)
    }

    /// The collection's state token value: the modseq of its last write.
    pub fn state(&self, collection: Collection) -> ModSeq {
        self.inner
            .data
            .read()
            .states
            .get(&collection)
            .copied()
            .unwrap_or(0)
    }

    /// The horizon below which `/changes` can no longer be reconstructed.
    /// Zero means no tombstone has ever been purged.
    pub fn deleted_modseq(&self) -> ModSeq {
        self.inner.data.read().deleted_modseq
    }

    /// Assigns a fresh opaque id for a to-be-created record.
    pub fn assign_id(&self, collection: Collection) -> String {
        let mut data = self.inner.data.write();
        loop {
            data.id_counter += 1;
            let id = format!("{}{}", collection.id_prefix(), data.id_counter);
            if !data
                .records
                .get(&collection)
                .is_some_and(|records| records.contains_key(&id))
            {
                return id;
            }
        }
    }

    /// Acquires the process-wide write lock for one data type. All
    /// state-bumping writes for that type happen inside the guard.
    pub async fn write_lock(&self, collection: Collection) -> tokio::sync::MutexGuard<'_, ()> {
        self.inner.write_locks[collection.index()].lock().await
    }

    /// Drops tombstones and advances the deleted-modseq horizon to the
    /// current modseq; clients holding states at or below it must refetch.
    pub fn purge_tombstones(&self) {
        let mut data = self.inner.data.write();
        let horizon = data.modseq;
        for records in data.records.values_mut() {
            records.retain(|_, record| record.active);
        }
        data.deleted_modseq = horizon;
        tracing::debug!(deleted_modseq = horizon, "purged tombstones");
    }
}
