/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::api::DataModel;
use crate::{into_method_error, Server};
use ahash::{AHashMap, AHashSet};
use jmap_proto::error::MethodError;
use jmap_proto::method::query::{QueryRequest, QueryResponse};
use jmap_proto::types::filter::{Comparator, Filter, LogicalOperator};
use jmap_proto::types::state::State;
use serde_json::Value;
use store::{Collection, Record};

/// Per-query scratch caching expensive derived data across every
/// comparison and match of one query: thread keyword aggregation, full
/// mailbox path names, and external text-search results.
#[derive(Default)]
pub struct QueryContext {
    search_hits: AHashMap<(String, String), AHashSet<String>>,
    thread_keywords: Option<AHashMap<String, ThreadKeywords>>,
    mailbox_paths: Option<AHashMap<String, String>>,
}

/// Per-thread keyword aggregation: `all` holds keywords present on every
/// message of the thread, `some` keywords present on at least one.
#[derive(Debug, Default, Clone)]
pub struct ThreadKeywords {
    pub all: AHashSet<String>,
    pub some: AHashSet<String>,
}

const SEARCH_FIELDS: &[&str] = &[
    "text", "from", "to", "cc", "bcc", "subject", "body", "header",
];

impl QueryContext {
    pub fn new() -> Self {
        QueryContext::default()
    }

    /// Runs every external text-search predicate of the filter exactly
    /// once, before row evaluation starts.
    pub(crate) async fn prefetch_search(
        &mut self,
        server: &Server,
        filter: Option<&Filter>,
    ) -> jmap_proto::Result<()> {
        let filter = match filter {
            Some(filter) => filter,
            None => return Ok(()),
        };

        let mut terms = Vec::new();
        filter.walk_conditions(&mut |condition| {
            for (predicate, argument) in condition {
                if SEARCH_FIELDS.contains(&predicate.as_str()) {
                    terms.push((predicate.clone(), search_term(argument)));
                }
            }
        });

        for (field, term) in terms {
            let key = (field, term);
            if self.search_hits.contains_key(&key) {
                continue;
            }
            let hits = server
                .remote
                .search(&key.0, &key.1)
                .await
                .map_err(into_method_error)?;
            self.search_hits.insert(key, hits);
        }

        Ok(())
    }

    pub(crate) fn search_hit(&self, field: &str, argument: &Value, id: &str) -> bool {
        self.search_hits
            .get(&(field.to_string(), search_term(argument)))
            .is_some_and(|hits| hits.contains(id))
    }

    /// Thread keyword aggregation, built by a single linear pass over the
    /// active messages the first time any thread predicate needs it.
    pub(crate) fn thread_keywords(&mut self, server: &Server) -> &AHashMap<String, ThreadKeywords> {
        if self.thread_keywords.is_none() {
            let mut threads: AHashMap<String, ThreadKeywords> = AHashMap::new();
            for record in server.store.active_records(Collection::Email) {
                let thread_id = record.str_value("threadId").unwrap_or_default().to_string();
                let keywords = record
                    .id_set("keywords")
                    .map(str::to_string)
                    .collect::<AHashSet<_>>();
                match threads.entry(thread_id) {
                    std::collections::hash_map::Entry::Vacant(entry) => {
                        entry.insert(ThreadKeywords {
                            all: keywords.clone(),
                            some: keywords,
                        });
                    }
                    std::collections::hash_map::Entry::Occupied(mut entry) => {
                        let aggregated = entry.get_mut();
                        aggregated.all.retain(|keyword| keywords.contains(keyword));
                        aggregated.some.extend(keywords);
                    }
                }
            }
            self.thread_keywords = Some(threads);
        }
        self.thread_keywords.as_ref().unwrap()
    }

    /// Full `Parent/Child` path of a mailbox, computed once per query for
    /// the whole tree.
    pub(crate) fn mailbox_path(&mut self, server: &Server, id: &str) -> String {
        if self.mailbox_paths.is_none() {
            let mailboxes = server
                .store
                .active_records(Collection::Mailbox)
                .into_iter()
                .map(|record| {
                    (
                        record.id.clone(),
                        (
                            record.str_value("name").unwrap_or_default().to_string(),
                            record.str_value("parentId").map(str::to_string),
                        ),
                    )
                })
                .collect::<AHashMap<_, _>>();

            let mut paths = AHashMap::with_capacity(mailboxes.len());
            for id in mailboxes.keys() {
                let mut segments = Vec::new();
                let mut cursor = Some(id.clone());
                while let Some(current) = cursor {
                    match mailboxes.get(&current) {
                        Some((name, parent_id)) if segments.len() < mailboxes.len() => {
                            segments.push(name.clone());
                            cursor = parent_id.clone();
                        }
                        _ => break,
                    }
                }
                segments.reverse();
                paths.insert(id.clone(), segments.join("/"));
            }
            self.mailbox_paths = Some(paths);
        }
        self.mailbox_paths
            .as_ref()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or_default()
    }
}

fn search_term(argument: &Value) -> String {
    match argument {
        Value::String(term) => term.clone(),
        other => other.to_string(),
    }
}

/// A typed per-field sort key; numeric and lexical fields order by their
/// own kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Bool(bool),
    Number(i64),
    Text(String),
}

/// Recursive descent over the filter operator tree with short-circuit
/// evaluation; a leaf matches when all of its predicates hold.
pub(crate) fn eval_filter<T: DataModel>(
    server: &Server,
    cx: &mut QueryContext,
    filter: &Filter,
    record: &Record,
) -> jmap_proto::Result<bool> {
    match filter {
        Filter::Condition(condition) => {
            for (predicate, argument) in condition {
                if !T::condition(server, cx, record, predicate, argument)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Filter::Operator(op) => match op.operator {
            LogicalOperator::And => {
                for condition in &op.conditions {
                    if !eval_filter::<T>(server, cx, condition, record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            LogicalOperator::Or => {
                for condition in &op.conditions {
                    if eval_filter::<T>(server, cx, condition, record)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            LogicalOperator::Not => {
                for condition in &op.conditions {
                    if eval_filter::<T>(server, cx, condition, record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        },
    }
}

pub(crate) fn matches<T: DataModel>(
    server: &Server,
    cx: &mut QueryContext,
    filter: Option<&Filter>,
    record: &Record,
) -> jmap_proto::Result<bool> {
    match filter {
        Some(filter) => eval_filter::<T>(server, cx, filter, record),
        None => Ok(true),
    }
}

/// Stable multi-key sort with the implicit final tie-break on id
/// ascending. Per-field keys are computed once per record.
pub(crate) fn sort_records<T: DataModel>(
    server: &Server,
    cx: &mut QueryContext,
    records: Vec<Record>,
    sort: &[Comparator],
) -> jmap_proto::Result<Vec<Record>> {
    let mut keyed = Vec::with_capacity(records.len());
    for record in records {
        let keys = sort
            .iter()
            .map(|comparator| T::sort_key(server, cx, &record, &comparator.property))
            .collect::<jmap_proto::Result<Vec<_>>>()?;
        keyed.push((keys, record));
    }

    keyed.sort_by(|(a_keys, a), (b_keys, b)| {
        for (index, comparator) in sort.iter().enumerate() {
            let ordering = a_keys[index].cmp(&b_keys[index]);
            let ordering = if comparator.is_ascending {
                ordering
            } else {
                ordering.reverse()
            };
            if ordering != std::cmp::Ordering::Equal {
                return ordering;
            }
        }
        a.id.cmp(&b.id)
    });

    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}

/// The sorted view of every record of the type with its in-filter flag
/// (`active` and matching). `/query` consumes the in-filter rows;
/// `/queryChanges` walks the whole snapshot.
pub(crate) async fn snapshot<T: DataModel>(
    server: &Server,
    cx: &mut QueryContext,
    filter: Option<&Filter>,
    sort: Option<&[Comparator]>,
) -> jmap_proto::Result<Vec<(Record, bool)>> {
    if T::COLLECTION == Collection::Email {
        cx.prefetch_search(server, filter).await?;
    }

    let records = sort_records::<T>(server, cx, T::load_all(server), sort.unwrap_or_default())?;

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let is_in = record.active && matches::<T>(server, cx, filter, &record)?;
        rows.push((record, is_in));
    }
    Ok(rows)
}

/// The uniform `/query` implementation: sort, filter, optionally
/// collapse threads, then window by position or anchor.
pub(crate) async fn query_type<T: DataModel>(
    server: &Server,
    mut request: QueryRequest,
) -> jmap_proto::Result<QueryResponse> {
    let account_id = server.assert_account(request.account_id.take())?;

    if request.position.is_some() && request.anchor.is_some() {
        return Err(MethodError::invalid_arguments(
            "The position and anchor arguments are mutually exclusive.",
        ));
    }
    if request.position.is_some_and(|position| position < 0) {
        return Err(MethodError::invalid_arguments("Negative position."));
    }

    let mut cx = QueryContext::new();
    let rows = snapshot::<T>(
        server,
        &mut cx,
        request.filter.as_ref(),
        request.sort.as_deref(),
    )
    .await?;

    let collapse =
        T::COLLECTION == Collection::Email && request.collapse_threads.unwrap_or(false);
    let mut ids = Vec::with_capacity(rows.len());
    let mut seen_threads = AHashSet::new();
    for (record, is_in) in &rows {
        if !*is_in {
            continue;
        }
        if collapse
            && !seen_threads.insert(record.str_value("threadId").unwrap_or_default().to_string())
        {
            continue;
        }
        ids.push(record.id.clone());
    }
    let total = ids.len();

    let start = match &request.anchor {
        Some(anchor) => {
            let index = ids
                .iter()
                .position(|id| id == anchor)
                .ok_or(MethodError::AnchorNotFound)? as i64;
            (index + i64::from(request.anchor_offset.unwrap_or(0))).max(0) as usize
        }
        None => request.position.unwrap_or(0) as usize,
    };

    let limit = request
        .limit
        .unwrap_or(server.config.query_max_results)
        .min(server.config.query_max_results);
    let ids = if start < ids.len() && limit > 0 {
        ids[start..(start + limit).min(ids.len())].to_vec()
    } else {
        Vec::new()
    };

    Ok(QueryResponse {
        account_id,
        query_state: State::from(T::state(server)),
        can_calculate_changes: true,
        position: start as i32,
        ids,
        total,
    })
}
