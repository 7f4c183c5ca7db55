/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use serde_json::Value;

/// An RFC 6901 style pointer with the JMAP `*` wildcard extension.
///
/// Evaluation is tolerant: a segment that does not apply to the current
/// node kind leaves the node as-is instead of failing, and the final
/// result is normalized to an array, matching the convention that a
/// back-reference always resolves to a list of ids or values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPointer {
    items: Vec<JsonPointerItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonPointerItem {
    Key(String),
    Number(u64),
    Wildcard,
}

impl JsonPointer {
    pub fn parse(value: &str) -> Self {
        let mut items = Vec::with_capacity(4);

        for segment in value.split('/') {
            if segment.is_empty() {
                continue;
            }
            let segment = unescape(segment);
            if segment == "*" {
                items.push(JsonPointerItem::Wildcard);
            } else if let Ok(number) = segment.parse::<u64>() {
                items.push(JsonPointerItem::Number(number));
            } else {
                items.push(JsonPointerItem::Key(segment));
            }
        }

        JsonPointer { items }
    }

    /// Applies the pointer to `value`, returning the normalized array of
    /// results. An undefined result yields an empty list; a defined
    /// non-list result is wrapped in a single-element list.
    pub fn resolve(&self, value: &Value) -> Vec<Value> {
        match walk(&self.items, value) {
            Some(Value::Array(items)) => items,
            Some(item) => vec![item],
            None => Vec::new(),
        }
    }
}

fn walk(items: &[JsonPointerItem], value: &Value) -> Option<Value> {
    let (item, rest) = match items.split_first() {
        Some(next) => next,
        None => return Some(value.clone()),
    };

    match (item, value) {
        (JsonPointerItem::Key(key), Value::Object(map)) => {
            map.get(key).and_then(|v| walk(rest, v))
        }
        (JsonPointerItem::Number(n), Value::Array(list)) => {
            list.get(*n as usize).and_then(|v| walk(rest, v))
        }
        (JsonPointerItem::Number(n), Value::Object(map)) => {
            map.get(&n.to_string()).and_then(|v| walk(rest, v))
        }
        (JsonPointerItem::Wildcard, Value::Array(list)) => {
            // Apply the remaining pointer to each element, flattening
            // one level so a list of lists becomes a list.
            let mut results = Vec::with_capacity(list.len());
            for v in list {
                match walk(rest, v) {
                    Some(Value::Array(items)) => results.extend(items),
                    Some(item) => results.push(item),
                    None => (),
                }
            }
            Some(Value::Array(results))
        }
        _ => Some(value.clone()),
    }
}

fn unescape(segment: &str) -> String {
    if !segment.contains('~') {
        return segment.to_string();
    }

    let mut unescaped = String::with_capacity(segment.len());
    let mut chars = segment.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '~' {
            match chars.peek() {
                Some('0') => {
                    chars.next();
                    unescaped.push('~');
                }
                Some('1') => {
                    chars.next();
                    unescaped.push('/');
                }
                _ => unescaped.push('~'),
            }
        } else {
            unescaped.push(ch);
        }
    }
    unescaped
}

/// Unescapes one pointer segment (`~1` to `/`, `~0` to `~`); shared with
/// the `/set update` patch expansion.
pub fn unescape_segment(segment: &str) -> String {
    unescape(segment)
}

impl std::fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for item in &self.items {
            f.write_str("/")?;
            match item {
                JsonPointerItem::Key(key) => {
                    f.write_str(&key.replace('~', "~0").replace('/', "~1"))?
                }
                JsonPointerItem::Number(n) => write!(f, "{}", n)?,
                JsonPointerItem::Wildcard => f.write_str("*")?,
            }
        }
        Ok(())
    }
}

impl<'de> serde::Deserialize<'de> for JsonPointer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <std::borrow::Cow<str>>::deserialize(deserializer)?;
        Ok(JsonPointer::parse(value.as_ref()))
    }
}
