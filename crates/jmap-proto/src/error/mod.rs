/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod set;

use crate::types::state::State;
use serde::ser::SerializeMap;
use std::borrow::Cow;

/// A method-level JMAP error, returned to the client as an
/// `["error", {"type": ...}, callTag]` response in place of the
/// method's own result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodError {
    AccountNotFound,
    InvalidArguments(Cow<'static, str>),
    UnknownMethod(String),
    InvalidResultReference(String),
    AnchorNotFound,
    CannotCalculateChanges { new_state: State },
    CannotCalculateQueryChanges { new_query_state: State },
    InvalidMailboxes,
    NotFound,
    NotImplemented,
    StateMismatch,
    RequestTooLarge,
    ServerError(String),
    InternalError(String),
}

impl MethodError {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodError::AccountNotFound => "accountNotFound",
            MethodError::InvalidArguments(_) => "invalidArguments",
            MethodError::UnknownMethod(_) => "unknownMethod",
            MethodError::InvalidResultReference(_) => "invalidResultReference",
            MethodError::AnchorNotFound => "anchorNotFound",
            MethodError::CannotCalculateChanges { .. }
            | MethodError::CannotCalculateQueryChanges { .. } => "cannotCalculateChanges",
            MethodError::InvalidMailboxes => "invalidMailboxes",
            MethodError::NotFound => "notFound",
            MethodError::NotImplemented => "notImplemented",
            MethodError::StateMismatch => "stateMismatch",
            MethodError::RequestTooLarge => "requestTooLarge",
            MethodError::ServerError(_) => "serverError",
            MethodError::InternalError(_) => "internalError",
        }
    }

    pub fn invalid_arguments(details: impl Into<Cow<'static, str>>) -> Self {
        MethodError::InvalidArguments(details.into())
    }

    fn description(&self) -> Option<&str> {
        match self {
            MethodError::InvalidArguments(details) => Some(details.as_ref()),
            MethodError::UnknownMethod(details)
            | MethodError::InvalidResultReference(details)
            | MethodError::ServerError(details)
            | MethodError::InternalError(details) => Some(details.as_str()),
            _ => None,
        }
    }
}

impl std::fmt::Display for MethodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.description() {
            Some(details) => write!(f, "{}: {}", self.as_str(), details),
            None => f.write_str(self.as_str()),
        }
    }
}

impl std::error::Error for MethodError {}

impl serde::Serialize for MethodError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.as_str())?;
        if let Some(description) = self.description() {
            map.serialize_entry("description", description)?;
        }
        match self {
            MethodError::CannotCalculateChanges { new_state } => {
                map.serialize_entry("newState", new_state)?;
            }
            MethodError::CannotCalculateQueryChanges { new_query_state } => {
                map.serialize_entry("newQueryState", new_query_state)?;
            }
            _ => (),
        }
        map.end()
    }
}
