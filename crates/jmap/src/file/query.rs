/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::StorageNodeModel;
use crate::api::query::query_type;
use crate::Server;
use jmap_proto::method::query::{QueryRequest, QueryResponse};
use std::future::Future;

pub trait StorageNodeQuery: Sync + Send {
    fn storage_node_query(
        &self,
        request: QueryRequest,
    ) -> impl Future<Output = jmap_proto::Result<QueryResponse>> + Send;
}

impl StorageNodeQuery for Server {
    async fn storage_node_query(&self, request: QueryRequest) -> jmap_proto::Result<QueryResponse> {
        query_type::<StorageNodeModel>(self, request).await
    }
}
