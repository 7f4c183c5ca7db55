/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::StorageNodeModel;
use crate::api::get::get_type;
use crate::Server;
use jmap_proto::method::get::{GetRequest, GetResponse};
use std::future::Future;

pub trait StorageNodeGet: Sync + Send {
    fn storage_node_get(
        &self,
        request: GetRequest,
    ) -> impl Future<Output = jmap_proto::Result<GetResponse>> + Send;
}

impl StorageNodeGet for Server {
    async fn storage_node_get(&self, request: GetRequest) -> jmap_proto::Result<GetResponse> {
        get_type::<StorageNodeModel>(self, request)
    }
}
