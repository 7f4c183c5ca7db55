/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::references::jsptr::JsonPointer;

/// A back-reference argument: the value is produced by applying `path`
/// to the successful results of the earlier call tagged `result_of`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct ResultReference {
    #[serde(rename = "resultOf")]
    pub result_of: String,
    pub name: String,
    pub path: JsonPointer,
}

impl std::fmt::Display for ResultReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[resultOf: {}, name: {}, path: {}]",
            self.result_of, self.name, self.path
        )
    }
}
