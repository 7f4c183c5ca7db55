/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::AddressbookModel;
use crate::api::get::get_type;
use crate::Server;
use jmap_proto::method::get::{GetRequest, GetResponse};
use std::future::Future;

pub trait AddressbookGet: Sync + Send {
    fn addressbook_get(
        &self,
        request: GetRequest,
    ) -> impl Future<Output = jmap_proto::Result<GetResponse>> + Send;
}

impl AddressbookGet for Server {
    async fn addressbook_get(&self, request: GetRequest) -> jmap_proto::Result<GetResponse> {
        get_type::<AddressbookModel>(self, request)
    }
}
