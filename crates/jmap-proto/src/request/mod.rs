/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod method;
pub mod reference;

use self::method::MethodName;
use crate::error::MethodError;
use ahash::AHashMap;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;

/// One JMAP request envelope: an ordered batch of method calls.
#[derive(Debug, Default)]
pub struct Request {
    pub using: Vec<String>,
    pub method_calls: Vec<Call<RequestMethod>>,
    pub created_ids: Option<AHashMap<String, String>>,
}

/// A single `[methodName, arguments, callTag]` triple. The same shape
/// carries responses, with the tag echoed back.
#[derive(Debug, Clone)]
pub struct Call<T> {
    pub id: String,
    pub name: MethodName,
    pub method: T,
}

/// Method arguments stay dynamic until back-references have been
/// resolved; a call whose name is unknown is carried as an error so the
/// rest of the batch still executes.
#[derive(Debug, Clone)]
pub enum RequestMethod {
    Invocation(Map<String, Value>),
    Error(MethodError),
}

impl<'de> Deserialize<'de> for Request {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RequestEnvelope {
            #[serde(default)]
            using: Vec<String>,
            #[serde(rename = "methodCalls")]
            method_calls: Vec<Call<RequestMethod>>,
            #[serde(rename = "createdIds")]
            #[serde(default)]
            created_ids: Option<AHashMap<String, String>>,
        }

        let envelope = RequestEnvelope::deserialize(deserializer)?;
        Ok(Request {
            using: envelope.using,
            method_calls: envelope.method_calls,
            created_ids: envelope.created_ids,
        })
    }
}

impl<'de> Deserialize<'de> for Call<RequestMethod> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CallVisitor;

        impl<'de> Visitor<'de> for CallVisitor {
            type Value = Call<RequestMethod>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a [methodName, arguments, callTag] triple")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let name = seq
                    .next_element::<String>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let arguments = seq
                    .next_element::<Map<String, Value>>()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let id = seq
                    .next_element::<String>()?
                    .ok_or_else(|| de::Error::invalid_length(2, &self))?;
                if seq.next_element::<serde::de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(4, &self));
                }

                Ok(match MethodName::parse(&name) {
                    Some(method_name) => Call {
                        id,
                        name: method_name,
                        method: RequestMethod::Invocation(arguments),
                    },
                    None => Call {
                        id,
                        name: MethodName::error(),
                        method: RequestMethod::Error(MethodError::UnknownMethod(format!(
                            "Unknown method {:?}",
                            name
                        ))),
                    },
                })
            }
        }

        deserializer.deserialize_seq(CallVisitor)
    }
}

impl<T: serde::Serialize> serde::Serialize for Call<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple;

        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.name)?;
        tuple.serialize_element(&self.method)?;
        tuple.serialize_element(&self.id)?;
        tuple.end()
    }
}

impl Request {
    pub fn parse(json: &[u8]) -> crate::Result<Self> {
        serde_json::from_slice(json)
            .map_err(|err| MethodError::invalid_arguments(format!("Invalid request: {}", err)))
    }
}
