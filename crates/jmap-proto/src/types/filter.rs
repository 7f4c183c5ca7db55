/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A query filter: either a leaf condition mapping predicate names to
/// operands, or an operator node over sub-filters.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Condition(Map<String, Value>),
    Operator(FilterOperator),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOperator {
    pub operator: LogicalOperator,
    pub conditions: Vec<Filter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
    Not,
}

impl Filter {
    pub fn condition(condition: Map<String, Value>) -> Self {
        Filter::Condition(condition)
    }

    pub fn and(conditions: Vec<Filter>) -> Self {
        Filter::Operator(FilterOperator {
            operator: LogicalOperator::And,
            conditions,
        })
    }

    pub fn or(conditions: Vec<Filter>) -> Self {
        Filter::Operator(FilterOperator {
            operator: LogicalOperator::Or,
            conditions,
        })
    }

    pub fn not(conditions: Vec<Filter>) -> Self {
        Filter::Operator(FilterOperator {
            operator: LogicalOperator::Not,
            conditions,
        })
    }

    /// Visits every leaf condition in the tree.
    pub fn walk_conditions<'x>(&'x self, visit: &mut impl FnMut(&'x Map<String, Value>)) {
        match self {
            Filter::Condition(condition) => visit(condition),
            Filter::Operator(op) => {
                for condition in &op.conditions {
                    condition.walk_conditions(visit);
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = Map::deserialize(deserializer)?;

        if let Some(operator) = map.remove("operator") {
            let operator = match operator.as_str() {
                Some("AND") => LogicalOperator::And,
                Some("OR") => LogicalOperator::Or,
                Some("NOT") => LogicalOperator::Not,
                _ => {
                    return Err(serde::de::Error::custom(format!(
                        "unknown filter operator {}",
                        operator
                    )));
                }
            };
            let conditions = match map.remove("conditions") {
                Some(Value::Array(items)) => items
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<Vec<Filter>, _>>()
                    .map_err(serde::de::Error::custom)?,
                Some(_) => {
                    return Err(serde::de::Error::custom("conditions must be an array"));
                }
                None => Vec::new(),
            };
            if !map.is_empty() {
                return Err(serde::de::Error::custom(
                    "cannot mix operator with condition properties",
                ));
            }

            Ok(Filter::Operator(FilterOperator {
                operator,
                conditions,
            }))
        } else {
            Ok(Filter::Condition(map))
        }
    }
}

/// One entry of a `/query` sort specification. The last implicit key is
/// always the object id, ascending, so the full sort is total.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comparator {
    pub property: String,
    pub is_ascending: bool,
    pub collation: Option<String>,
}

impl Default for Comparator {
    fn default() -> Self {
        Comparator {
            property: String::new(),
            is_ascending: true,
            collation: None,
        }
    }
}

impl Comparator {
    pub fn ascending(property: impl Into<String>) -> Self {
        Comparator {
            property: property.into(),
            is_ascending: true,
            collation: None,
        }
    }

    pub fn descending(property: impl Into<String>) -> Self {
        Comparator {
            property: property.into(),
            is_ascending: false,
            collation: None,
        }
    }
}
