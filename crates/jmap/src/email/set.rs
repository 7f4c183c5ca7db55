/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::EmailModel;
use crate::api::set::set_type;
use crate::Server;
use jmap_proto::method::set::{SetRequest, SetResponse};
use std::future::Future;

pub trait EmailSet: Sync + Send {
    fn email_set(
        &self,
        request: SetRequest,
    ) -> impl Future<Output = jmap_proto::Result<SetResponse>> + Send;
}

impl EmailSet for Server {
    async fn email_set(&self, request: SetRequest) -> jmap_proto::Result<SetResponse> {
        set_type::<EmailModel>(self, request).await
    }
}
