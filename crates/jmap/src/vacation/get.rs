/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::VacationModel;
use crate::api::get::get_type;
use crate::Server;
use jmap_proto::method::get::{GetRequest, GetResponse};
use std::future::Future;

pub trait VacationResponseGet: Sync + Send {
    fn vacation_response_get(
        &self,
        request: GetRequest,
    ) -> impl Future<Output = jmap_proto::Result<GetResponse>> + Send;
}

impl VacationResponseGet for Server {
    async fn vacation_response_get(&self, request: GetRequest) -> jmap_proto::Result<GetResponse> {
        get_type::<VacationModel>(self, request)
    }
}
