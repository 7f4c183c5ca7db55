/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

/// An opaque state token, monotonically advancing per data type. Two
/// tokens are equal iff the server view of that type is identical.
///
/// `Initial` marks a client that has never synchronized; `Exact` wraps
/// the modification sequence the token was minted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Initial,
    Exact(u64),
}

impl From<u64> for State {
    fn from(modseq: u64) -> Self {
        State::Exact(modseq)
    }
}

impl State {
    pub fn parse(value: &str) -> Option<Self> {
        let (marker, rest) = value.split_at(value.len().min(1));

        match marker {
            "n" if rest.is_empty() => Some(State::Initial),
            "s" => u64::from_str_radix(rest, 16).ok().map(State::Exact),
            _ => None,
        }
    }

    pub fn new_initial() -> Self {
        State::Initial
    }

    pub fn new_exact(modseq: u64) -> Self {
        State::Exact(modseq)
    }

    pub fn modseq(&self) -> u64 {
        match self {
            State::Initial => 0,
            State::Exact(modseq) => *modseq,
        }
    }

    pub fn is_initial(&self) -> bool {
        matches!(self, State::Initial)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Initial => f.write_str("n"),
            State::Exact(modseq) => write!(f, "s{:x}", modseq),
        }
    }
}

impl serde::Serialize for State {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

impl<'de> serde::Deserialize<'de> for State {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <std::borrow::Cow<str>>::deserialize(deserializer)?;

        State::parse(value.as_ref())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid JMAP state {:?}", value)))
    }
}
