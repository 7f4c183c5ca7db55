/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod get;

use crate::api::DataModel;
use store::Collection;

pub(crate) struct QuotaModel;

impl DataModel for QuotaModel {
    const COLLECTION: Collection = Collection::Quota;
}
