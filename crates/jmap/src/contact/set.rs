/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::ContactModel;
use crate::api::set::set_type;
use crate::Server;
use jmap_proto::method::set::{SetRequest, SetResponse};
use std::future::Future;

pub trait ContactSet: Sync + Send {
    fn contact_set(
        &self,
        request: SetRequest,
    ) -> impl Future<Output = jmap_proto::Result<SetResponse>> + Send;
}

impl ContactSet for Server {
    async fn contact_set(&self, request: SetRequest) -> jmap_proto::Result<SetResponse> {
        set_type::<ContactModel>(self, request).await
    }
}
