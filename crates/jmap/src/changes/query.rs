/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::api::query::{snapshot, QueryContext};
use crate::api::DataModel;
use crate::changes::effective_max_changes;
use crate::email::EmailModel;
use crate::submission::SubmissionModel;
use crate::Server;
use ahash::{AHashMap, AHashSet};
use jmap_proto::error::MethodError;
use jmap_proto::method::query_changes::{AddedItem, QueryChangesRequest, QueryChangesResponse};
use jmap_proto::request::method::MethodObject;
use jmap_proto::types::state::State;
use std::future::Future;
use store::Collection;

pub trait QueryChangesLookup: Sync + Send {
    fn query_changes(
        &self,
        request: QueryChangesRequest,
        object: MethodObject,
    ) -> impl Future<Output = jmap_proto::Result<QueryChangesResponse>> + Send;
}

impl QueryChangesLookup for Server {
    async fn query_changes(
        &self,
        request: QueryChangesRequest,
        object: MethodObject,
    ) -> jmap_proto::Result<QueryChangesResponse> {
        match object {
            MethodObject::Email => query_changes_type::<EmailModel>(self, request).await,
            MethodObject::EmailSubmission => {
                query_changes_type::<SubmissionModel>(self, request).await
            }
            _ => Err(MethodError::UnknownMethod(format!(
                "{}/queryChanges",
                object
            ))),
        }
    }
}

/// Reconstructs the edits that turn the query result list at
/// `sinceQueryState` into the current one: every changed row is removed
/// and, when still in the result set, re-added at its current index.
/// In thread-collapsed mode only the exemplar of each thread is in the
/// list, and a thread stops being reported at its first unchanged
/// in-filter row.
pub(crate) async fn query_changes_type<T: DataModel>(
    server: &Server,
    mut request: QueryChangesRequest,
) -> jmap_proto::Result<QueryChangesResponse> {
    let account_id = server.assert_account(request.account_id.take())?;
    let since = request
        .since_query_state
        .take()
        .ok_or_else(|| MethodError::invalid_arguments("Missing sinceQueryState argument."))?;
    let new_query_state = State::from(T::state(server));

    let deleted_modseq = server.store.deleted_modseq();
    if !since.is_initial() && deleted_modseq > 0 && since.modseq() <= deleted_modseq {
        return Err(MethodError::CannotCalculateQueryChanges { new_query_state });
    }

    let since_modseq = since.modseq();
    let max_changes = effective_max_changes(request.max_changes, server.config.changes_max_results);
    let collapse =
        T::COLLECTION == Collection::Email && request.collapse_threads.unwrap_or(false);
    let up_to_id = request.up_to_email_id.take();

    let mut cx = QueryContext::new();
    let rows = snapshot::<T>(
        server,
        &mut cx,
        request.filter.as_ref(),
        request.sort.as_deref(),
    )
    .await?;

    let mut response = QueryChangesResponse {
        account_id,
        old_query_state: since,
        new_query_state,
        total: 0,
        removed: Vec::new(),
        added: Vec::new(),
    };

    let mut reporting = true;
    let mut exemplars: AHashMap<String, String> = AHashMap::new();
    let mut finished: AHashSet<String> = AHashSet::new();

    for (record, is_in) in rows {
        if collapse {
            let thread_id = record.str_value("threadId").unwrap_or_default().to_string();
            if finished.contains(&thread_id) {
                // Skipped rows still mark the reporting boundary.
                if reporting && up_to_id.as_deref() == Some(record.id.as_str()) {
                    reporting = false;
                }
                continue;
            }

            let mut is_exemplar = false;
            if is_in {
                if !exemplars.contains_key(&thread_id) {
                    exemplars.insert(thread_id.clone(), record.id.clone());
                    response.total += 1;
                    is_exemplar = true;
                } else {
                    is_exemplar = exemplars.get(&thread_id) == Some(&record.id);
                }
            }

            if record.modseq > since_modseq {
                if reporting {
                    response.removed.push(record.id.clone());
                    if is_exemplar {
                        response
                            .added
                            .push(AddedItem::new(record.id.clone(), response.total - 1));
                    }
                }
            } else if is_in {
                if !is_exemplar && reporting {
                    // This row may have been the client's exemplar; its
                    // being so is indistinguishable now, so remove it and
                    // stop reporting the thread.
                    response.removed.push(record.id.clone());
                }
                finished.insert(thread_id);
            }
        } else {
            if is_in {
                response.total += 1;
            }
            if record.modseq > since_modseq && reporting {
                response.removed.push(record.id.clone());
                if is_in {
                    response
                        .added
                        .push(AddedItem::new(record.id.clone(), response.total - 1));
                }
            }
        }

        if response.removed.len() + response.added.len() > max_changes {
            return Err(MethodError::CannotCalculateQueryChanges {
                new_query_state: response.new_query_state,
            });
        }

        // Reporting stops past upToEmailId; total counting continues.
        if reporting && up_to_id.as_deref() == Some(record.id.as_str()) {
            reporting = false;
        }
    }

    Ok(response)
}
