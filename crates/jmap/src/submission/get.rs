/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::SubmissionModel;
use crate::api::get::get_type;
use crate::Server;
use jmap_proto::method::get::{GetRequest, GetResponse};
use std::future::Future;

pub trait EmailSubmissionGet: Sync + Send {
    fn email_submission_get(
        &self,
        request: GetRequest,
    ) -> impl Future<Output = jmap_proto::Result<GetResponse>> + Send;
}

impl EmailSubmissionGet for Server {
    async fn email_submission_get(&self, request: GetRequest) -> jmap_proto::Result<GetResponse> {
        get_type::<SubmissionModel>(self, request)
    }
}
