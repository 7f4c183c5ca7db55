/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::EmailModel;
use crate::api::{DataModel, SyncSource};
use crate::Server;
use jmap_proto::error::set::SetError;
use jmap_proto::error::MethodError;
use jmap_proto::method::copy::{CopyRequest, CopyResponse};
use jmap_proto::method::set::SetRequest;
use jmap_proto::request::method::{MethodFunction, MethodName, MethodObject};
use jmap_proto::request::{Call, RequestMethod};
use jmap_proto::types::state::State;
use serde_json::{Map, Value};
use std::future::Future;
use store::write::BatchBuilder;
use store::Collection;

pub trait JmapEmailCopy: Sync + Send {
    fn email_copy(
        &self,
        request: CopyRequest,
        next_call: &mut Option<Call<RequestMethod>>,
    ) -> impl Future<Output = jmap_proto::Result<CopyResponse>> + Send;
}

impl JmapEmailCopy for Server {
    /// Copies messages within the account: the stored payload of each
    /// source message is duplicated under a fresh id with the requested
    /// property overrides. `onSuccessDestroyOriginal` becomes an implied
    /// `Email/set` destroying the copied sources.
    async fn email_copy(
        &self,
        mut request: CopyRequest,
        next_call: &mut Option<Call<RequestMethod>>,
    ) -> jmap_proto::Result<CopyResponse> {
        let account_id = self.assert_account(request.account_id.take())?;
        let from_account_id = self.assert_account(request.from_account_id.take())?;

        let _guard = self.store.write_lock(Collection::Email).await;
        self.sync(SyncSource::Mail).await?;

        let old_state = State::from(EmailModel::state(self));
        if request
            .if_in_state
            .as_ref()
            .is_some_and(|state| *state != old_state)
        {
            return Err(MethodError::StateMismatch);
        }

        let mut response = CopyResponse {
            account_id,
            from_account_id,
            old_state,
            new_state: old_state,
            ..Default::default()
        };

        let mut copied_source_ids = Vec::new();
        let mut batch = BatchBuilder::new();
        batch.with_collection(Collection::Email);
        for (placeholder, object) in request.create.take().unwrap_or_default() {
            let object = match object {
                Value::Object(object) => object,
                _ => {
                    response.not_created.insert(
                        placeholder,
                        SetError::invalid_properties().with_description("Expected an object."),
                    );
                    continue;
                }
            };
            let source_id = match object.get("id").and_then(|id| id.as_str()) {
                Some(source_id) => source_id.to_string(),
                None => {
                    response
                        .not_created
                        .insert(placeholder, SetError::invalid_properties().with_property("id"));
                    continue;
                }
            };
            let source = match self.store.get_active(Collection::Email, &source_id) {
                Some(source) => source,
                None => {
                    response
                        .not_created
                        .insert(placeholder, SetError::not_found());
                    continue;
                }
            };

            let mut value = source.value.clone();
            for property in ["mailboxIds", "keywords", "receivedAt"] {
                if let Some(update) = object.get(property) {
                    value.insert(property.to_string(), update.clone());
                }
            }

            let id = self.store.assign_id(Collection::Email);
            if let Err(err) = EmailModel::validate_create(self, &id, &mut value) {
                response.not_created.insert(placeholder, err);
                continue;
            }

            let thread_id = value
                .get("threadId")
                .and_then(|thread_id| thread_id.as_str())
                .unwrap_or_default()
                .to_string();
            batch.create(id.clone(), value);
            copied_source_ids.push(source_id);

            let mut created = Map::with_capacity(2);
            created.insert("id".to_string(), Value::String(id));
            created.insert("threadId".to_string(), Value::String(thread_id));
            response
                .created
                .insert(placeholder, Value::Object(created));
        }

        if !batch.is_empty() {
            EmailModel::decorate_batch(self, &mut batch);
            self.commit(batch)?;
        }

        self.sync(SyncSource::Mail).await?;
        response.new_state = State::from(EmailModel::state(self));

        // Destroy the originals through a follow-up Email/set.
        if request.on_success_destroy_original.unwrap_or(false) && !copied_source_ids.is_empty() {
            let set_request = SetRequest {
                account_id: Some(response.account_id.clone()),
                destroy: Some(copied_source_ids),
                ..Default::default()
            };
            *next_call = Some(Call {
                id: String::new(),
                name: MethodName::new(MethodObject::Email, MethodFunction::Set),
                method: RequestMethod::Invocation(set_arguments(set_request)),
            });
        }

        Ok(response)
    }
}

fn set_arguments(request: SetRequest) -> Map<String, Value> {
    let mut arguments = Map::new();
    if let Some(account_id) = request.account_id {
        arguments.insert("accountId".to_string(), Value::String(account_id));
    }
    if let Some(destroy) = request.destroy {
        arguments.insert(
            "destroy".to_string(),
            Value::Array(destroy.into_iter().map(Value::String).collect()),
        );
    }
    if let Some(update) = request.update {
        arguments.insert("update".to_string(), Value::Object(update));
    }
    arguments
}
