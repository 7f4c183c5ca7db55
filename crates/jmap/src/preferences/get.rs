/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{CalendarPreferencesModel, ClientPreferencesModel, UserPreferencesModel};
use crate::api::get::get_type;
use crate::Server;
use jmap_proto::method::get::{GetRequest, GetResponse};
use std::future::Future;

pub trait PreferencesGet: Sync + Send {
    fn user_preferences_get(
        &self,
        request: GetRequest,
    ) -> impl Future<Output = jmap_proto::Result<GetResponse>> + Send;

    fn client_preferences_get(
        &self,
        request: GetRequest,
    ) -> impl Future<Output = jmap_proto::Result<GetResponse>> + Send;

    fn calendar_preferences_get(
        &self,
        request: GetRequest,
    ) -> impl Future<Output = jmap_proto::Result<GetResponse>> + Send;
}

impl PreferencesGet for Server {
    async fn user_preferences_get(&self, request: GetRequest) -> jmap_proto::Result<GetResponse> {
        get_type::<UserPreferencesModel>(self, request)
    }

    async fn client_preferences_get(
        &self,
        request: GetRequest,
    ) -> jmap_proto::Result<GetResponse> {
        get_type::<ClientPreferencesModel>(self, request)
    }

    async fn calendar_preferences_get(
        &self,
        request: GetRequest,
    ) -> jmap_proto::Result<GetResponse> {
        get_type::<CalendarPreferencesModel>(self, request)
    }
}
