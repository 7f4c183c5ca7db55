/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{
    addressbook::get::AddressbookGet,
    calendar::{get::CalendarGet, refresh::CalendarRefresh, set::CalendarSet},
    calendar_event::{get::CalendarEventGet, query::CalendarEventQuery, set::CalendarEventSet},
    changes::{get::ChangesLookup, query::QueryChangesLookup},
    contact::{get::ContactGet, query::ContactQuery, set::ContactSet},
    contact_group::{get::ContactGroupGet, set::ContactGroupSet},
    email::{
        copy::JmapEmailCopy, get::EmailGet, import::EmailImport, query::EmailQuery, set::EmailSet,
        snippet::EmailSearchSnippet,
    },
    file::{get::StorageNodeGet, query::StorageNodeQuery},
    identity::get::IdentityGet,
    mailbox::{get::MailboxGet, query::MailboxQuery, set::MailboxSet},
    preferences::{get::PreferencesGet, set::PreferencesSet},
    quota::get::QuotaGet,
    submission::{get::EmailSubmissionGet, query::EmailSubmissionQuery, set::EmailSubmissionSet},
    thread::get::ThreadGet,
    vacation::get::VacationResponseGet,
    Server,
};
use jmap_proto::error::MethodError;
use jmap_proto::request::method::{MethodFunction, MethodName, MethodObject};
use jmap_proto::request::{Call, Request, RequestMethod};
use jmap_proto::response::{Response, ResponseMethod};
use serde_json::{Map, Value};
use std::future::Future;
use std::time::Instant;

pub trait RequestHandler: Sync + Send {
    fn handle_request(&self, request: Request) -> impl Future<Output = Response> + Send;

    fn handle_method_call(
        &self,
        name: MethodName,
        arguments: Map<String, Value>,
        next_call: &mut Option<Call<RequestMethod>>,
    ) -> impl Future<Output = jmap_proto::Result<ResponseMethod>> + Send;
}

impl RequestHandler for Server {
    /// Executes the batch strictly in order. Each call resolves its
    /// back-references against the results accumulated so far, then
    /// dispatches; a failed call yields one `error` response and the
    /// batch continues.
    async fn handle_request(&self, request: Request) -> Response {
        let mut response = Response::new(
            request.created_ids.unwrap_or_default(),
            request.method_calls.len(),
        );
        let add_created_ids = !response.created_ids.is_empty();

        for mut call in request.method_calls {
            loop {
                let mut arguments = match call.method {
                    RequestMethod::Invocation(arguments) => arguments,
                    RequestMethod::Error(err) => {
                        response.push_error(call.id, err);
                        break;
                    }
                };

                // Resolve result and creation-id references
                if let Err(err) = response.resolve_references(&mut arguments) {
                    tracing::debug!(
                        method = call.name.as_str(),
                        error = %err,
                        "reference resolution failed"
                    );
                    response.push_error(call.id, err);
                    break;
                }
                response.resolve_created_ids(&mut arguments);

                let op_start = Instant::now();
                let mut next_call = None;
                match self
                    .handle_method_call(call.name, arguments, &mut next_call)
                    .await
                {
                    Ok(method_response) => {
                        // Register assigned ids for later back-references
                        match &method_response {
                            ResponseMethod::Set(set_response) => {
                                set_response.update_created_ids(&mut response);
                            }
                            ResponseMethod::Copy(copy_response) => {
                                copy_response.update_created_ids(&mut response);
                            }
                            ResponseMethod::ImportEmail(import_response) => {
                                import_response.update_created_ids(&mut response);
                            }
                            _ => {}
                        }
                        response.push_response(call.id.clone(), call.name, method_response);
                    }
                    Err(err) => {
                        tracing::debug!(
                            method = call.name.as_str(),
                            error = %err,
                            "method call failed"
                        );
                        response.push_error(call.id.clone(), err);
                    }
                }

                tracing::debug!(
                    method = call.name.as_str(),
                    elapsed = ?op_start.elapsed(),
                    "JMAP method call"
                );

                // An implied follow-up call runs under the same tag.
                match next_call {
                    Some(next) => {
                        call = Call {
                            id: call.id,
                            name: next.name,
                            method: next.method,
                        };
                    }
                    None => break,
                }
            }
        }

        if !add_created_ids {
            response.created_ids.clear();
        }

        response
    }

    async fn handle_method_call(
        &self,
        name: MethodName,
        arguments: Map<String, Value>,
        next_call: &mut Option<Call<RequestMethod>>,
    ) -> jmap_proto::Result<ResponseMethod> {
        Ok(match (name.fnc, name.obj) {
            (MethodFunction::Get, MethodObject::Mailbox) => {
                self.mailbox_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::Thread) => {
                self.thread_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::Email) => {
                self.email_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::SearchSnippet) => {
                self.email_search_snippet(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::Identity) => {
                self.identity_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::EmailSubmission) => {
                self.email_submission_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::VacationResponse) => {
                self.vacation_response_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::Quota) => {
                self.quota_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::Calendar) => {
                self.calendar_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::CalendarEvent) => {
                self.calendar_event_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::CalendarPreferences) => {
                self.calendar_preferences_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::Addressbook) => {
                self.addressbook_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::Contact) => {
                self.contact_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::ContactGroup) => {
                self.contact_group_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::UserPreferences) => {
                self.user_preferences_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::ClientPreferences) => {
                self.client_preferences_get(parse(arguments)?).await?.into()
            }
            (MethodFunction::Get, MethodObject::StorageNode) => {
                self.storage_node_get(parse(arguments)?).await?.into()
            }

            (MethodFunction::Query, MethodObject::Mailbox) => {
                self.mailbox_query(parse(arguments)?).await?.into()
            }
            (MethodFunction::Query, MethodObject::Email) => {
                self.email_query(parse(arguments)?).await?.into()
            }
            (MethodFunction::Query, MethodObject::CalendarEvent) => {
                self.calendar_event_query(parse(arguments)?).await?.into()
            }
            (MethodFunction::Query, MethodObject::Contact) => {
                self.contact_query(parse(arguments)?).await?.into()
            }
            (MethodFunction::Query, MethodObject::EmailSubmission) => {
                self.email_submission_query(parse(arguments)?).await?.into()
            }
            (MethodFunction::Query, MethodObject::StorageNode) => {
                self.storage_node_query(parse(arguments)?).await?.into()
            }

            (MethodFunction::Changes, _) => self.changes(parse(arguments)?, name.obj)?.into(),
            (MethodFunction::QueryChanges, _) => {
                self.query_changes(parse(arguments)?, name.obj).await?.into()
            }

            (MethodFunction::Set, MethodObject::Mailbox) => {
                self.mailbox_set(parse(arguments)?).await?.into()
            }
            (MethodFunction::Set, MethodObject::Email) => {
                self.email_set(parse(arguments)?).await?.into()
            }
            (MethodFunction::Set, MethodObject::Calendar) => {
                self.calendar_set(parse(arguments)?).await?.into()
            }
            (MethodFunction::Set, MethodObject::CalendarEvent) => {
                self.calendar_event_set(parse(arguments)?).await?.into()
            }
            (MethodFunction::Set, MethodObject::CalendarPreferences) => {
                self.calendar_preferences_set(parse(arguments)?).await?.into()
            }
            (MethodFunction::Set, MethodObject::Contact) => {
                self.contact_set(parse(arguments)?).await?.into()
            }
            (MethodFunction::Set, MethodObject::ContactGroup) => {
                self.contact_group_set(parse(arguments)?).await?.into()
            }
            (MethodFunction::Set, MethodObject::EmailSubmission) => self
                .email_submission_set(parse(arguments)?, next_call)
                .await?
                .into(),
            (MethodFunction::Set, MethodObject::UserPreferences) => {
                self.user_preferences_set(parse(arguments)?).await?.into()
            }
            (MethodFunction::Set, MethodObject::ClientPreferences) => {
                self.client_preferences_set(parse(arguments)?).await?.into()
            }

            (MethodFunction::Import, MethodObject::Email) => {
                self.email_import(parse(arguments)?).await?.into()
            }
            (MethodFunction::Copy, MethodObject::Email) => {
                self.email_copy(parse(arguments)?, next_call).await?.into()
            }
            (MethodFunction::RefreshSynced, MethodObject::Calendar) => {
                self.calendar_refresh_synced(arguments).await?.into()
            }

            (MethodFunction::Echo, MethodObject::Core) => {
                ResponseMethod::Echo(Value::Object(arguments))
            }

            _ => return Err(MethodError::UnknownMethod(name.to_string())),
        })
    }
}

pub(crate) fn parse<T: serde::de::DeserializeOwned>(
    arguments: Map<String, Value>,
) -> jmap_proto::Result<T> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|err| MethodError::invalid_arguments(format!("Invalid arguments: {}", err)))
}
