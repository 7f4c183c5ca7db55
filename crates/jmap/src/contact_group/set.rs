/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::ContactGroupModel;
use crate::api::set::set_type;
use crate::Server;
use jmap_proto::method::set::{SetRequest, SetResponse};
use std::future::Future;

pub trait ContactGroupSet: Sync + Send {
    fn contact_group_set(
        &self,
        request: SetRequest,
    ) -> impl Future<Output = jmap_proto::Result<SetResponse>> + Send;
}

impl ContactGroupSet for Server {
    async fn contact_group_set(&self, request: SetRequest) -> jmap_proto::Result<SetResponse> {
        set_type::<ContactGroupModel>(self, request).await
    }
}
