/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{CalendarPreferencesModel, ClientPreferencesModel, UserPreferencesModel};
use crate::api::set::set_type;
use crate::Server;
use jmap_proto::method::set::{SetRequest, SetResponse};
use std::future::Future;

pub trait PreferencesSet: Sync + Send {
    fn user_preferences_set(
        &self,
        request: SetRequest,
    ) -> impl Future<Output = jmap_proto::Result<SetResponse>> + Send;

    fn client_preferences_set(
        &self,
        request: SetRequest,
    ) -> impl Future<Output = jmap_proto::Result<SetResponse>> + Send;

    fn calendar_preferences_set(
        &self,
        request: SetRequest,
    ) -> impl Future<Output = jmap_proto::Result<SetResponse>> + Send;
}

impl PreferencesSet for Server {
    async fn user_preferences_set(&self, request: SetRequest) -> jmap_proto::Result<SetResponse> {
        set_type::<UserPreferencesModel>(self, request).await
    }

    async fn client_preferences_set(
        &self,
        request: SetRequest,
    ) -> jmap_proto::Result<SetResponse> {
        set_type::<ClientPreferencesModel>(self, request).await
    }

    async fn calendar_preferences_set(
        &self,
        request: SetRequest,
    ) -> jmap_proto::Result<SetResponse> {
        set_type::<CalendarPreferencesModel>(self, request).await
    }
}
