/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::EmailModel;
use crate::api::{DataModel, SyncSource};
use crate::Server;
use chrono::{SecondsFormat, Utc};
use jmap_proto::error::set::SetError;
use jmap_proto::error::MethodError;
use jmap_proto::method::import::{ImportEmail, ImportEmailRequest, ImportEmailResponse};
use jmap_proto::types::state::State;
use serde_json::{Map, Value};
use std::future::Future;
use store::write::BatchBuilder;
use store::Collection;

pub trait EmailImport: Sync + Send {
    fn email_import(
        &self,
        request: ImportEmailRequest,
    ) -> impl Future<Output = jmap_proto::Result<ImportEmailResponse>> + Send;
}

impl EmailImport for Server {
    /// Imports raw messages by blob reference: the blob is fetched, a
    /// local record is created and the copy is appended upstream.
    async fn email_import(
        &self,
        mut request: ImportEmailRequest,
    ) -> jmap_proto::Result<ImportEmailResponse> {
        let account_id = self.assert_account(request.account_id.take())?;

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

        let mut response = ImportEmailResponse {
            account_id,
            old_state,
            new_state: old_state,
            ..Default::default()
        };

        let mut batch = BatchBuilder::new();
        batch.with_collection(Collection::Email);
        for (placeholder, email) in std::mem::take(&mut request.emails) {
            let email: ImportEmail = match serde_json::from_value(email) {
                Ok(email) => email,
                Err(err) => {
                    response.not_created.insert(
                        placeholder,
                        SetError::invalid_properties().with_description(err.to_string()),
                    );
                    continue;
                }
            };

            let blob_id = match &email.blob_id {
                Some(blob_id) => blob_id.clone(),
                None => {
                    response.not_created.insert(
                        placeholder,
                        SetError::invalid_properties().with_property("blobId"),
                    );
                    continue;
                }
            };
            let blob = match self.remote.get_blob(&blob_id).await {
                Ok(blob) => blob,
                Err(err) => {
                    response.not_created.insert(
                        placeholder,
                        SetError::blob_not_found().with_description(err.to_string()),
                    );
                    continue;
                }
            };

            let mailbox_ids = email
                .mailbox_ids
                .iter()
                .filter(|(_, enabled)| **enabled)
                .map(|(id, _)| id.clone())
                .collect::<Vec<_>>();
            if mailbox_ids.is_empty()
                || mailbox_ids.iter().any(|id| {
                    self.store.get_active(Collection::Mailbox, id).is_none()
                })
            {
                response.not_created.insert(
                    placeholder,
                    SetError::invalid_mailboxes()
                        .with_description("Message must belong to existing mailboxes."),
                );
                continue;
            }

            if let Err(err) = self
                .remote
                .import_message(&self.store, &blob, &mailbox_ids)
                .await
            {
                response.not_created.insert(
                    placeholder,
                    SetError::new(jmap_proto::error::set::SetErrorType::InvalidEmail)
                        .with_description(err.to_string()),
                );
                continue;
            }

            let id = self.store.assign_id(Collection::Email);
            let thread_id = self.store.assign_id(Collection::Thread);
            let mut value = Map::new();
            value.insert("blobId".to_string(), Value::String(blob_id));
            value.insert(
                "threadId".to_string(),
                Value::String(thread_id.clone()),
            );
            value.insert(
                "mailboxIds".to_string(),
                Value::Object(
                    mailbox_ids
                        .iter()
                        .map(|id| (id.clone(), Value::Bool(true)))
                        .collect(),
                ),
            );
            value.insert(
                "keywords".to_string(),
                Value::Object(
                    email
                        .keywords
                        .iter()
                        .filter(|(_, enabled)| **enabled)
                        .map(|(keyword, _)| (keyword.clone(), Value::Bool(true)))
                        .collect(),
                ),
            );
            value.insert(
                "receivedAt".to_string(),
                Value::String(email.received_at.clone().unwrap_or_else(|| {
                    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
                })),
            );
            value.insert("size".to_string(), Value::from(blob.len()));
            batch.create(id.clone(), value);

            let mut created = Map::with_capacity(3);
            created.insert("id".to_string(), Value::String(id));
            created.insert("threadId".to_string(), Value::String(thread_id));
            created.insert("size".to_string(), Value::from(blob.len()));
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

        Ok(response)
    }
}
