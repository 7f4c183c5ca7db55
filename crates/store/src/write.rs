/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{Collection, ModSeq, Record, Result, Store, StoreError};
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub enum Operation {
    /// Inserts a new active record with the given payload.
    Create { id: String, value: Map<String, Value> },
    /// Merges the patch into the record's payload: a null value removes
    /// the property, anything else replaces it.
    Update { id: String, patch: Map<String, Value> },
    /// Soft delete: flips the active flag and bumps the modseq so
    /// `/changes` reports the removal until the tombstone is purged.
    Destroy { id: String },
    /// Bumps only the count-only modseq (mailbox message counts).
    TouchCounts { id: String },
}

/// An ordered set of write operations applied atomically by
/// [`Store::commit`]. Dropping an uncommitted builder is the rollback
/// path: nothing reaches the store.
#[derive(Debug, Default)]
pub struct BatchBuilder {
    ops: Vec<(Collection, Operation)>,
    collection: Option<Collection>,
}

impl BatchBuilder {
    pub fn new() -> Self {
        BatchBuilder::default()
    }

    pub fn with_collection(&mut self, collection: Collection) -> &mut Self {
        self.collection = Some(collection);
        self
    }

    pub fn create(&mut self, id: String, value: Map<String, Value>) -> &mut Self {
        self.push(Operation::Create { id, value })
    }

    pub fn update(&mut self, id: String, patch: Map<String, Value>) -> &mut Self {
        self.push(Operation::Update { id, patch })
    }

    pub fn destroy(&mut self, id: String) -> &mut Self {
        self.push(Operation::Destroy { id })
    }

    pub fn touch_counts(&mut self, id: String) -> &mut Self {
        self.push(Operation::TouchCounts { id })
    }

    fn push(&mut self, op: Operation) -> &mut Self {
        let collection = self
            .collection
            .expect("with_collection must precede batch operations");
        self.ops.push((collection, op));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> impl Iterator<Item = (Collection, &Operation)> {
        self.ops.iter().map(|(collection, op)| (*collection, op))
    }
}

impl Store {
    /// Applies the batch atomically under one new modseq, advancing the
    /// state token of every touched collection. Validation errors leave
    /// the store untouched.
    pub fn commit(&self, batch: BatchBuilder) -> Result<ModSeq> {
        let mut data = self.inner.data.write();

        // Validate before mutating anything.
        for (collection, op) in &batch.ops {
            match op {
                Operation::Create { .. } => (),
                Operation::Update { id, .. }
                | Operation::Destroy { id }
                | Operation::TouchCounts { id } => {
                    if !data
                        .records
                        .get(collection)
                        .is_some_and(|records| records.contains_key(id))
                    {
                        return Err(StoreError::NotFound(*collection, id.clone()));
                    }
                }
            }
        }

        let modseq = data.modseq + 1;
        data.modseq = modseq;

        for (collection, op) in batch.ops {
            data.states.insert(collection, modseq);
            let records = data.records.entry(collection).or_default();
            match op {
                Operation::Create { id, value } => {
                    records.insert(
                        id.clone(),
                        Record {
                            id,
                            created: modseq,
                            modseq,
                            counts_modseq: 0,
                            active: true,
                            value,
                        },
                    );
                }
                Operation::Update { id, patch } => {
                    let record = records.get_mut(&id).unwrap();
                    for (key, value) in patch {
                        if value.is_null() {
                            record.value.remove(&key);
                        } else {
                            record.value.insert(key, value);
                        }
                    }
                    record.modseq = modseq;
                }
                Operation::Destroy { id } => {
                    let record = records.get_mut(&id).unwrap();
                    record.active = false;
                    record.modseq = modseq;
                }
                Operation::TouchCounts { id } => {
                    records.get_mut(&id).unwrap().counts_modseq = modseq;
                }
            }
        }

        tracing::trace!(modseq, "committed write batch");

        Ok(modseq)
    }
}
