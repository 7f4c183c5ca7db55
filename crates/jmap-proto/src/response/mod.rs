/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::error::MethodError;
use crate::method::changes::ChangesResponse;
use crate::method::copy::CopyResponse;
use crate::method::get::GetResponse;
use crate::method::import::ImportEmailResponse;
use crate::method::query::QueryResponse;
use crate::method::query_changes::QueryChangesResponse;
use crate::method::search_snippet::GetSearchSnippetResponse;
use crate::method::set::SetResponse;
use crate::method::RefreshSyncedResponse;
use crate::request::method::MethodName;
use crate::request::Call;
use ahash::AHashMap;
use serde_json::Value;

#[derive(Debug, Clone, serde::Serialize)]
#[serde(untagged)]
pub enum ResponseMethod {
    Get(GetResponse),
    Changes(ChangesResponse),
    Query(QueryResponse),
    QueryChanges(QueryChangesResponse),
    Set(SetResponse),
    Copy(CopyResponse),
    ImportEmail(ImportEmailResponse),
    SearchSnippet(GetSearchSnippetResponse),
    RefreshSynced(RefreshSyncedResponse),
    Echo(Value),
    Error(MethodError),
}

/// The per-request result log: the ordered list of every response
/// produced so far, plus the ids assigned by `/set create` calls. Back
/// references only see the successful view.
#[derive(Debug, serde::Serialize)]
pub struct Response {
    #[serde(rename = "methodResponses")]
    pub method_responses: Vec<Call<ResponseMethod>>,

    #[serde(rename = "createdIds")]
    #[serde(skip_serializing_if = "is_empty_map")]
    pub created_ids: AHashMap<String, String>,
}

fn is_empty_map(map: &AHashMap<String, String>) -> bool {
    map.is_empty()
}

impl Response {
    pub fn new(created_ids: AHashMap<String, String>, capacity: usize) -> Self {
        Response {
            method_responses: Vec::with_capacity(capacity),
            created_ids,
        }
    }

    pub fn push_response(
        &mut self,
        id: String,
        name: MethodName,
        method: impl Into<ResponseMethod>,
    ) {
        self.method_responses.push(Call {
            id,
            name,
            method: method.into(),
        });
    }

    pub fn push_error(&mut self, id: String, err: MethodError) {
        self.method_responses.push(Call {
            id,
            name: MethodName::error(),
            method: ResponseMethod::Error(err),
        });
    }
}

impl From<MethodError> for ResponseMethod {
    fn from(error: MethodError) -> Self {
        ResponseMethod::Error(error)
    }
}

impl From<GetResponse> for ResponseMethod {
    fn from(value: GetResponse) -> Self {
        ResponseMethod::Get(value)
    }
}

impl From<ChangesResponse> for ResponseMethod {
    fn from(value: ChangesResponse) -> Self {
        ResponseMethod::Changes(value)
    }
}

impl From<QueryResponse> for ResponseMethod {
    fn from(value: QueryResponse) -> Self {
        ResponseMethod::Query(value)
    }
}

impl From<QueryChangesResponse> for ResponseMethod {
    fn from(value: QueryChangesResponse) -> Self {
        ResponseMethod::QueryChanges(value)
    }
}

impl From<SetResponse> for ResponseMethod {
    fn from(value: SetResponse) -> Self {
        ResponseMethod::Set(value)
    }
}

impl From<CopyResponse> for ResponseMethod {
    fn from(value: CopyResponse) -> Self {
        ResponseMethod::Copy(value)
    }
}

impl From<ImportEmailResponse> for ResponseMethod {
    fn from(value: ImportEmailResponse) -> Self {
        ResponseMethod::ImportEmail(value)
    }
}

impl From<GetSearchSnippetResponse> for ResponseMethod {
    fn from(value: GetSearchSnippetResponse) -> Self {
        ResponseMethod::SearchSnippet(value)
    }
}

impl From<RefreshSyncedResponse> for ResponseMethod {
    fn from(value: RefreshSyncedResponse) -> Self {
        ResponseMethod::RefreshSynced(value)
    }
}
