/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodName {
    pub obj: MethodObject,
    pub fnc: MethodFunction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodObject {
    Core,
    Mailbox,
    Thread,
    Email,
    SearchSnippet,
    Identity,
    EmailSubmission,
    VacationResponse,
    Quota,
    Calendar,
    CalendarEvent,
    CalendarPreferences,
    Addressbook,
    Contact,
    ContactGroup,
    UserPreferences,
    ClientPreferences,
    StorageNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodFunction {
    Get,
    Set,
    Changes,
    Query,
    QueryChanges,
    Import,
    Copy,
    RefreshSynced,
    Echo,
    Error,
}

impl Display for MethodName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MethodName {
    pub fn new(obj: MethodObject, fnc: MethodFunction) -> Self {
        Self { obj, fnc }
    }

    pub fn error() -> Self {
        Self {
            obj: MethodObject::Core,
            fnc: MethodFunction::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match (self.fnc, self.obj) {
            (MethodFunction::Get, MethodObject::Mailbox) => "Mailbox/get",
            (MethodFunction::Query, MethodObject::Mailbox) => "Mailbox/query",
            (MethodFunction::Changes, MethodObject::Mailbox) => "Mailbox/changes",
            (MethodFunction::Set, MethodObject::Mailbox) => "Mailbox/set",

            (MethodFunction::Get, MethodObject::Thread) => "Thread/get",
            (MethodFunction::Changes, MethodObject::Thread) => "Thread/changes",

            (MethodFunction::Get, MethodObject::Email) => "Email/get",
            (MethodFunction::Query, MethodObject::Email) => "Email/query",
            (MethodFunction::QueryChanges, MethodObject::Email) => "Email/queryChanges",
            (MethodFunction::Changes, MethodObject::Email) => "Email/changes",
            (MethodFunction::Set, MethodObject::Email) => "Email/set",
            (MethodFunction::Import, MethodObject::Email) => "Email/import",
            (MethodFunction::Copy, MethodObject::Email) => "Email/copy",

            (MethodFunction::Get, MethodObject::SearchSnippet) => "SearchSnippet/get",

            (MethodFunction::Get, MethodObject::Identity) => "Identity/get",

            (MethodFunction::Get, MethodObject::EmailSubmission) => "EmailSubmission/get",
            (MethodFunction::Query, MethodObject::EmailSubmission) => "EmailSubmission/query",
            (MethodFunction::QueryChanges, MethodObject::EmailSubmission) => {
                "EmailSubmission/queryChanges"
            }
            (MethodFunction::Changes, MethodObject::EmailSubmission) => "EmailSubmission/changes",
            (MethodFunction::Set, MethodObject::EmailSubmission) => "EmailSubmission/set",

            (MethodFunction::Get, MethodObject::VacationResponse) => "VacationResponse/get",

            (MethodFunction::Get, MethodObject::Quota) => "Quota/get",

            (MethodFunction::Get, MethodObject::Calendar) => "Calendar/get",
            (MethodFunction::Changes, MethodObject::Calendar) => "Calendar/changes",
            (MethodFunction::Set, MethodObject::Calendar) => "Calendar/set",
            (MethodFunction::RefreshSynced, MethodObject::Calendar) => "Calendar/refreshSynced",

            (MethodFunction::Get, MethodObject::CalendarEvent) => "CalendarEvent/get",
            (MethodFunction::Query, MethodObject::CalendarEvent) => "CalendarEvent/query",
            (MethodFunction::Changes, MethodObject::CalendarEvent) => "CalendarEvent/changes",
            (MethodFunction::Set, MethodObject::CalendarEvent) => "CalendarEvent/set",

            (MethodFunction::Get, MethodObject::CalendarPreferences) => "CalendarPreferences/get",
            (MethodFunction::Set, MethodObject::CalendarPreferences) => "CalendarPreferences/set",

            (MethodFunction::Get, MethodObject::Addressbook) => "Addressbook/get",
            (MethodFunction::Changes, MethodObject::Addressbook) => "Addressbook/changes",

            (MethodFunction::Get, MethodObject::Contact) => "Contact/get",
            (MethodFunction::Query, MethodObject::Contact) => "Contact/query",
            (MethodFunction::Changes, MethodObject::Contact) => "Contact/changes",
            (MethodFunction::Set, MethodObject::Contact) => "Contact/set",

            (MethodFunction::Get, MethodObject::ContactGroup) => "ContactGroup/get",
            (MethodFunction::Changes, MethodObject::ContactGroup) => "ContactGroup/changes",
            (MethodFunction::Set, MethodObject::ContactGroup) => "ContactGroup/set",

            (MethodFunction::Get, MethodObject::UserPreferences) => "UserPreferences/get",
            (MethodFunction::Set, MethodObject::UserPreferences) => "UserPreferences/set",

            (MethodFunction::Get, MethodObject::ClientPreferences) => "ClientPreferences/get",
            (MethodFunction::Set, MethodObject::ClientPreferences) => "ClientPreferences/set",

            (MethodFunction::Get, MethodObject::StorageNode) => "StorageNode/get",
            (MethodFunction::Query, MethodObject::StorageNode) => "StorageNode/query",

            (MethodFunction::Echo, MethodObject::Core) => "Core/echo",
            _ => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        hashify::tiny_map!(s.as_bytes(),
            "Mailbox/get" => (MethodObject::Mailbox, MethodFunction::Get),
            "Mailbox/query" => (MethodObject::Mailbox, MethodFunction::Query),
            "Mailbox/changes" => (MethodObject::Mailbox, MethodFunction::Changes),
            "Mailbox/set" => (MethodObject::Mailbox, MethodFunction::Set),

            "Thread/get" => (MethodObject::Thread, MethodFunction::Get),
            "Thread/changes" => (MethodObject::Thread, MethodFunction::Changes),

            "Email/get" => (MethodObject::Email, MethodFunction::Get),
            "Email/query" => (MethodObject::Email, MethodFunction::Query),
            "Email/queryChanges" => (MethodObject::Email, MethodFunction::QueryChanges),
            "Email/changes" => (MethodObject::Email, MethodFunction::Changes),
            "Email/set" => (MethodObject::Email, MethodFunction::Set),
            "Email/import" => (MethodObject::Email, MethodFunction::Import),
            "Email/copy" => (MethodObject::Email, MethodFunction::Copy),

            "SearchSnippet/get" => (MethodObject::SearchSnippet, MethodFunction::Get),

            "Identity/get" => (MethodObject::Identity, MethodFunction::Get),

            "EmailSubmission/get" => (MethodObject::EmailSubmission, MethodFunction::Get),
            "EmailSubmission/query" => (MethodObject::EmailSubmission, MethodFunction::Query),
            "EmailSubmission/queryChanges" => (MethodObject::EmailSubmission, MethodFunction::QueryChanges),
            "EmailSubmission/changes" => (MethodObject::EmailSubmission, MethodFunction::Changes),
            "EmailSubmission/set" => (MethodObject::EmailSubmission, MethodFunction::Set),

            "VacationResponse/get" => (MethodObject::VacationResponse, MethodFunction::Get),

            "Quota/get" => (MethodObject::Quota, MethodFunction::Get),

            "Calendar/get" => (MethodObject::Calendar, MethodFunction::Get),
            "Calendar/changes" => (MethodObject::Calendar, MethodFunction::Changes),
            "Calendar/set" => (MethodObject::Calendar, MethodFunction::Set),
            "Calendar/refreshSynced" => (MethodObject::Calendar, MethodFunction::RefreshSynced),

            "CalendarEvent/get" => (MethodObject::CalendarEvent, MethodFunction::Get),
            "CalendarEvent/query" => (MethodObject::CalendarEvent, MethodFunction::Query),
            "CalendarEvent/changes" => (MethodObject::CalendarEvent, MethodFunction::Changes),
            "CalendarEvent/set" => (MethodObject::CalendarEvent, MethodFunction::Set),

            "CalendarPreferences/get" => (MethodObject::CalendarPreferences, MethodFunction::Get),
            "CalendarPreferences/set" => (MethodObject::CalendarPreferences, MethodFunction::Set),

            "Addressbook/get" => (MethodObject::Addressbook, MethodFunction::Get),
            "Addressbook/changes" => (MethodObject::Addressbook, MethodFunction::Changes),

            "Contact/get" => (MethodObject::Contact, MethodFunction::Get),
            "Contact/query" => (MethodObject::Contact, MethodFunction::Query),
            "Contact/changes" => (MethodObject::Contact, MethodFunction::Changes),
            "Contact/set" => (MethodObject::Contact, MethodFunction::Set),

            "ContactGroup/get" => (MethodObject::ContactGroup, MethodFunction::Get),
            "ContactGroup/changes" => (MethodObject::ContactGroup, MethodFunction::Changes),
            "ContactGroup/set" => (MethodObject::ContactGroup, MethodFunction::Set),

            "UserPreferences/get" => (MethodObject::UserPreferences, MethodFunction::Get),
            "UserPreferences/set" => (MethodObject::UserPreferences, MethodFunction::Set),

            "ClientPreferences/get" => (MethodObject::ClientPreferences, MethodFunction::Get),
            "ClientPreferences/set" => (MethodObject::ClientPreferences, MethodFunction::Set),

            "StorageNode/get" => (MethodObject::StorageNode, MethodFunction::Get),
            "StorageNode/query" => (MethodObject::StorageNode, MethodFunction::Query),

            "Core/echo" => (MethodObject::Core, MethodFunction::Echo),
        )
        .map(|(obj, fnc)| MethodName { obj, fnc })
    }
}

impl Display for MethodObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MethodObject::Core => "Core",
            MethodObject::Mailbox => "Mailbox",
            MethodObject::Thread => "Thread",
            MethodObject::Email => "Email",
            MethodObject::SearchSnippet => "SearchSnippet",
            MethodObject::Identity => "Identity",
            MethodObject::EmailSubmission => "EmailSubmission",
            MethodObject::VacationResponse => "VacationResponse",
            MethodObject::Quota => "Quota",
            MethodObject::Calendar => "Calendar",
            MethodObject::CalendarEvent => "CalendarEvent",
            MethodObject::CalendarPreferences => "CalendarPreferences",
            MethodObject::Addressbook => "Addressbook",
            MethodObject::Contact => "Contact",
            MethodObject::ContactGroup => "ContactGroup",
            MethodObject::UserPreferences => "UserPreferences",
            MethodObject::ClientPreferences => "ClientPreferences",
            MethodObject::StorageNode => "StorageNode",
        })
    }
}

impl serde::Serialize for MethodName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
