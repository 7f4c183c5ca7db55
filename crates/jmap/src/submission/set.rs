/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::SubmissionModel;
use crate::api::set::expand_patch;
use crate::api::DataModel;
use crate::Server;
use ahash::AHashMap;
use chrono::{SecondsFormat, Utc};
use jmap_proto::error::set::SetError;
use jmap_proto::error::MethodError;
use jmap_proto::method::set::{SetRequest, SetResponse};
use jmap_proto::request::method::{MethodFunction, MethodName, MethodObject};
use jmap_proto::request::{Call, RequestMethod};
use jmap_proto::types::state::State;
use serde_json::{Map, Value};
use std::future::Future;
use store::write::BatchBuilder;
use store::Collection;

pub trait EmailSubmissionSet: Sync + Send {
    fn email_submission_set(
        &self,
        request: SetRequest,
        next_call: &mut Option<Call<RequestMethod>>,
    ) -> impl Future<Output = jmap_proto::Result<SetResponse>> + Send;
}

impl EmailSubmissionSet for Server {
    /// `/set` for submissions: each create hands the referenced message
    /// to the outbound path before the record is written. After the
    /// outcome, `onSuccessUpdateEmail` / `onSuccessDestroyEmail` become
    /// one implied `Email/set` confined to the submissions that
    /// succeeded, run under the same call tag.
    async fn email_submission_set(
        &self,
        mut request: SetRequest,
        next_call: &mut Option<Call<RequestMethod>>,
    ) -> jmap_proto::Result<SetResponse> {
        let account_id = self.assert_account(request.account_id.take())?;
        request.validate(self.config.max_objects_in_set)?;

        let on_success_update = request
            .arguments
            .remove("onSuccessUpdateEmail")
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            });
        let on_success_destroy = request
            .arguments
            .remove("onSuccessDestroyEmail")
            .and_then(|value| match value {
                Value::Array(ids) => Some(
                    ids.into_iter()
                        .filter_map(|id| id.as_str().map(str::to_string))
                        .collect::<Vec<_>>(),
                ),
                _ => None,
            });

        let _guard = self.store.write_lock(Collection::EmailSubmission).await;

        let old_state = State::from(SubmissionModel::state(self));
        if request
            .if_in_state
            .as_ref()
            .is_some_and(|state| *state != old_state)
        {
            return Err(MethodError::StateMismatch);
        }

        let mut response = SetResponse::new(account_id).with_state(old_state);
        let will_destroy = request.unwrap_destroy();

        // Maps the keys usable in onSuccess arguments (`#placeholder` or
        // submission id) to the id of the message they concern.
        let mut success_email_ids: AHashMap<String, String> = AHashMap::new();

        // Process creates
        let mut batch = BatchBuilder::new();
        batch.with_collection(Collection::EmailSubmission);
        for (placeholder, object) in request.unwrap_create() {
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
            match self.send_message(&object).await {
                Ok(submission) => {
                    let email_id = submission
                        .get("emailId")
                        .and_then(|id| id.as_str())
                        .unwrap_or_default()
                        .to_string();
                    let id = self.store.assign_id(Collection::EmailSubmission);
                    batch.create(id.clone(), submission);
                    success_email_ids.insert(format!("#{}", placeholder), email_id.clone());
                    success_email_ids.insert(id.clone(), email_id);
                    response.created(placeholder, &id);
                }
                Err(err) => {
                    response.not_created.insert(placeholder, err);
                }
            }
        }

        // Process updates
        for (id, patch) in request.unwrap_update() {
            let mut patch = match patch {
                Value::Object(patch) => patch,
                _ => {
                    response.not_updated.insert(
                        id,
                        SetError::invalid_properties().with_description("Expected an object."),
                    );
                    continue;
                }
            };
            if will_destroy.contains(&id) {
                response.not_updated.insert(id, SetError::will_destroy());
                continue;
            }
            let record = match self.store.get_active(Collection::EmailSubmission, &id) {
                Some(record) => record,
                None => {
                    response.not_updated.insert(id, SetError::not_found());
                    continue;
                }
            };
            if let Err(err) = expand_patch(&mut patch, &record.value) {
                response.not_updated.insert(id, err);
                continue;
            }
            let email_id = record.str_value("emailId").unwrap_or_default().to_string();
            batch.update(id.clone(), patch);
            success_email_ids.insert(id.clone(), email_id);
            response.updated.insert(id, Value::Null);
        }

        // Process destroys
        for id in will_destroy {
            match self.store.get_active(Collection::EmailSubmission, &id) {
                Some(record) => {
                    let email_id = record.str_value("emailId").unwrap_or_default().to_string();
                    batch.destroy(id.clone());
                    success_email_ids.insert(id.clone(), email_id);
                    response.destroyed.push(id);
                }
                None => {
                    response.not_destroyed.insert(id, SetError::not_found());
                }
            }
        }

        if !batch.is_empty() {
            self.commit(batch)?;
        }
        response.new_state = State::from(SubmissionModel::state(self));

        // On success
        let mut update_email = Map::new();
        for (key, patch) in on_success_update.unwrap_or_default() {
            if let Some(email_id) = success_email_ids.get(&key) {
                update_email.insert(email_id.clone(), patch);
            }
        }
        let destroy_email = on_success_destroy
            .unwrap_or_default()
            .into_iter()
            .filter_map(|key| success_email_ids.get(&key).cloned())
            .collect::<Vec<_>>();

        if !update_email.is_empty() || !destroy_email.is_empty() {
            let mut arguments = Map::new();
            arguments.insert(
                "accountId".to_string(),
                Value::String(response.account_id.clone()),
            );
            if !update_email.is_empty() {
                arguments.insert("update".to_string(), Value::Object(update_email));
            }
            if !destroy_email.is_empty() {
                arguments.insert(
                    "destroy".to_string(),
                    Value::Array(destroy_email.into_iter().map(Value::String).collect()),
                );
            }
            *next_call = Some(Call {
                id: String::new(),
                name: MethodName::new(MethodObject::Email, MethodFunction::Set),
                method: RequestMethod::Invocation(arguments),
            });
        }

        Ok(response)
    }
}

impl Server {
    /// Validates a submission create, hands the message to the outbound
    /// path and returns the record payload to store.
    async fn send_message(
        &self,
        object: &Map<String, Value>,
    ) -> Result<Map<String, Value>, SetError> {
        let email_id = object
            .get("emailId")
            .and_then(|id| id.as_str())
            .ok_or_else(|| SetError::invalid_properties().with_property("emailId"))?;
        let email = self
            .store
            .get_active(Collection::Email, email_id)
            .ok_or_else(|| {
                SetError::new(jmap_proto::error::set::SetErrorType::InvalidEmail)
                    .with_description("Message not found.")
            })?;

        if let Some(identity_id) = object.get("identityId").and_then(|id| id.as_str()) {
            if self
                .store
                .get_active(Collection::Identity, identity_id)
                .is_none()
            {
                return Err(SetError::invalid_properties()
                    .with_property("identityId")
                    .with_description("Identity not found."));
            }
        }

        let envelope = object.get("envelope").filter(|value| !value.is_null());
        self.remote
            .submit(&self.store, &email, envelope)
            .await
            .map_err(|err| SetError::forbidden_to_send().with_description(err.to_string()))?;

        let mut submission = Map::with_capacity(6);
        submission.insert(
            "emailId".to_string(),
            Value::String(email_id.to_string()),
        );
        if let Some(thread_id) = email.str_value("threadId") {
            submission.insert(
                "threadId".to_string(),
                Value::String(thread_id.to_string()),
            );
        }
        if let Some(identity_id) = object.get("identityId") {
            submission.insert("identityId".to_string(), identity_id.clone());
        }
        if let Some(envelope) = envelope {
            submission.insert("envelope".to_string(), envelope.clone());
        }
        submission.insert(
            "sendAt".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        submission.insert(
            "undoStatus".to_string(),
            Value::String("final".to_string()),
        );

        Ok(submission)
    }
}
