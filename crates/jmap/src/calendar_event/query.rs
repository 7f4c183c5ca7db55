/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::CalendarEventModel;
use crate::api::query::query_type;
use crate::Server;
use jmap_proto::method::query::{QueryRequest, QueryResponse};
use std::future::Future;

pub trait CalendarEventQuery: Sync + Send {
    fn calendar_event_query(
        &self,
        request: QueryRequest,
    ) -> impl Future<Output = jmap_proto::Result<QueryResponse>> + Send;
}

impl CalendarEventQuery for Server {
    async fn calendar_event_query(
        &self,
        request: QueryRequest,
    ) -> jmap_proto::Result<QueryResponse> {
        query_type::<CalendarEventModel>(self, request).await
    }
}
