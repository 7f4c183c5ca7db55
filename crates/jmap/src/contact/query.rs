/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::ContactModel;
use crate::api::query::query_type;
use crate::Server;
use jmap_proto::method::query::{QueryRequest, QueryResponse};
use std::future::Future;

pub trait ContactQuery: Sync + Send {
    fn contact_query(
        &self,
        request: QueryRequest,
    ) -> impl Future<Output = jmap_proto::Result<QueryResponse>> + Send;
}

impl ContactQuery for Server {
    async fn contact_query(&self, request: QueryRequest) -> jmap_proto::Result<QueryResponse> {
        query_type::<ContactModel>(self, request).await
    }
}
