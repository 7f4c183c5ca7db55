/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod get;

use crate::api::{DataModel, SyncSource};
use store::Collection;

pub(crate) struct AddressbookModel;

impl DataModel for AddressbookModel {
    const COLLECTION: Collection = Collection::Addressbook;
    const SYNC: SyncSource = SyncSource::Addressbooks;
}
