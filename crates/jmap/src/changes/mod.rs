/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod get;
pub mod query;

/// The effective change cap: the client's `maxChanges` (zero meaning
/// unlimited) bounded by the server limit.
pub(crate) fn effective_max_changes(max_changes: Option<usize>, server_limit: usize) -> usize {
    std::cmp::min(
        max_changes.filter(|max| *max != 0).unwrap_or(usize::MAX),
        server_limit,
    )
}
