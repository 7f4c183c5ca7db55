/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::MailboxModel;
use crate::api::set::set_type;
use crate::Server;
use jmap_proto::method::set::{SetRequest, SetResponse};
use std::future::Future;

pub trait MailboxSet: Sync + Send {
    fn mailbox_set(
        &self,
        request: SetRequest,
    ) -> impl Future<Output = jmap_proto::Result<SetResponse>> + Send;
}

impl MailboxSet for Server {
    async fn mailbox_set(&self, request: SetRequest) -> jmap_proto::Result<SetResponse> {
        set_type::<MailboxModel>(self, request).await
    }
}
