/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod get;

use crate::api::DataModel;
use crate::email::received_at;
use crate::Server;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use store::{Collection, ModSeq, Record};

pub(crate) struct ThreadModel;

/// Threads are derived from the Email collection: membership groups by
/// `threadId`, a thread's change modseq is its newest member's, and its
/// state token is the Email state.
impl DataModel for ThreadModel {
    const COLLECTION: Collection = Collection::Thread;

    fn load_all(server: &Server) -> Vec<Record> {
        let mut threads: IndexMap<String, ThreadGroup> = IndexMap::new();

        for email in server.store.records(Collection::Email) {
            let thread_id = match email.str_value("threadId") {
                Some(thread_id) => thread_id.to_string(),
                None => continue,
            };
            let group = threads.entry(thread_id).or_default();
            group.created = match group.created {
                0 => email.created,
                created => created.min(email.created),
            };
            group.modseq = group.modseq.max(email.modseq);
            if email.active {
                group.active = true;
                group
                    .members
                    .push((received_at(&email), email.id.clone()));
            }
        }

        threads
            .into_iter()
            .map(|(id, mut group)| {
                group.members.sort();
                let mut value = Map::with_capacity(1);
                value.insert(
                    "emailIds".to_string(),
                    Value::Array(
                        group
                            .members
                            .into_iter()
                            .map(|(_, email_id)| Value::String(email_id))
                            .collect(),
                    ),
                );
                Record {
                    id,
                    created: group.created,
                    modseq: group.modseq,
                    counts_modseq: 0,
                    active: group.active,
                    value,
                }
            })
            .collect()
    }

    fn load_one(server: &Server, id: &str) -> Option<Record> {
        Self::load_all(server)
            .into_iter()
            .find(|record| record.id == id)
    }

    fn state(server: &Server) -> ModSeq {
        server.store.state(Collection::Email)
    }
}

#[derive(Default)]
struct ThreadGroup {
    created: ModSeq,
    modseq: ModSeq,
    active: bool,
    members: Vec<(i64, String)>,
}
