/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::CalendarModel;
use crate::api::set::set_type;
use crate::Server;
use jmap_proto::method::set::{SetRequest, SetResponse};
use std::future::Future;

pub trait CalendarSet: Sync + Send {
    fn calendar_set(
        &self,
        request: SetRequest,
    ) -> impl Future<Output = jmap_proto::Result<SetResponse>> + Send;
}

impl CalendarSet for Server {
    async fn calendar_set(&self, request: SetRequest) -> jmap_proto::Result<SetResponse> {
        set_type::<CalendarModel>(self, request).await
    }
}
