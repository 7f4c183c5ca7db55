/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::addressbook::AddressbookModel;
use crate::api::DataModel;
use crate::calendar::CalendarModel;
use crate::calendar_event::CalendarEventModel;
use crate::changes::effective_max_changes;
use crate::contact::ContactModel;
use crate::contact_group::ContactGroupModel;
use crate::email::EmailModel;
use crate::mailbox::MailboxModel;
use crate::submission::SubmissionModel;
use crate::thread::ThreadModel;
use crate::Server;
use jmap_proto::error::MethodError;
use jmap_proto::method::changes::{ChangesRequest, ChangesResponse};
use jmap_proto::request::method::MethodObject;
use jmap_proto::types::state::State;
use store::Collection;

pub trait ChangesLookup: Sync + Send {
    fn changes(
        &self,
        request: ChangesRequest,
        object: MethodObject,
    ) -> jmap_proto::Result<ChangesResponse>;
}

impl ChangesLookup for Server {
    fn changes(
        &self,
        request: ChangesRequest,
        object: MethodObject,
    ) -> jmap_proto::Result<ChangesResponse> {
        match object {
            MethodObject::Mailbox => changes_type::<MailboxModel>(self, request),
            MethodObject::Thread => changes_type::<ThreadModel>(self, request),
            MethodObject::Email => changes_type::<EmailModel>(self, request),
            MethodObject::Calendar => changes_type::<CalendarModel>(self, request),
            MethodObject::CalendarEvent => changes_type::<CalendarEventModel>(self, request),
            MethodObject::Addressbook => changes_type::<AddressbookModel>(self, request),
            MethodObject::Contact => changes_type::<ContactModel>(self, request),
            MethodObject::ContactGroup => changes_type::<ContactGroupModel>(self, request),
            MethodObject::EmailSubmission => changes_type::<SubmissionModel>(self, request),
            _ => Err(MethodError::UnknownMethod(format!(
                "{}/changes",
                object
            ))),
        }
    }
}

/// The uniform `/changes` implementation. An entry is created if it is
/// still active and appeared after `sinceState`, updated if active and
/// older, and removed if inactive and older; entries that appeared and
/// disappeared entirely after `sinceState` are omitted.
pub(crate) fn changes_type<T: DataModel>(
    server: &Server,
    mut request: ChangesRequest,
) -> jmap_proto::Result<ChangesResponse> {
    let account_id = server.assert_account(request.account_id.take())?;
    let since = request
        .since_state
        .take()
        .ok_or_else(|| MethodError::invalid_arguments("Missing sinceState argument."))?;
    let new_state = State::from(T::state(server));

    let deleted_modseq = server.store.deleted_modseq();
    if !since.is_initial() && deleted_modseq > 0 && since.modseq() <= deleted_modseq {
        return Err(MethodError::CannotCalculateChanges { new_state });
    }

    let since_modseq = since.modseq();
    let max_changes = effective_max_changes(request.max_changes, server.config.changes_max_results);
    let track_counts = T::COLLECTION == Collection::Mailbox;

    let mut response = ChangesResponse::new(account_id, since, new_state);
    let mut counts_only = true;
    let mut changed = 0usize;

    for record in T::load_all(server) {
        let change_modseq = if track_counts {
            record.change_modseq()
        } else {
            record.modseq
        };
        if change_modseq <= since_modseq {
            continue;
        }
        if !record.active && record.created > since_modseq {
            // Never seen by this client.
            continue;
        }

        changed += 1;
        if changed > max_changes {
            return Err(MethodError::CannotCalculateChanges { new_state });
        }

        if !record.active {
            response.removed.push(record.id);
        } else if record.created > since_modseq {
            response.created.push(record.id);
        } else {
            if record.modseq > since_modseq {
                counts_only = false;
            }
            response.updated.push(record.id);
        }
    }

    if track_counts && !response.updated.is_empty() && counts_only {
        response.changed_properties = Some(
            ["totalEmails", "unreadEmails", "totalThreads", "unreadThreads"]
                .map(str::to_string)
                .to_vec(),
        );
    }

    Ok(response)
}
