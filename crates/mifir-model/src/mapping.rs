//! Field mapping and constants tables.
//!
//! A [`Mapping`] is the single source of truth the assemblers consume:
//! each target field resolves to a dataset column, the constants table,
//! or nothing. The wire form keeps the historical tokens `"None"` and
//! `"[Constant Value]"` so saved configurations stay portable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Wire token for an unset mapping.
pub const UNSET_TOKEN: &str = "None";

/// Wire token for a mapping whose value comes from the constants table.
pub const CONSTANT_TOKEN: &str = "[Constant Value]";

/// Where a target field's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingTarget {
    /// No source; the assembler substitutes a default or sentinel.
    Unset,
    /// Value comes from the constants table, keyed by field name.
    Constant,
    /// Value comes from the named dataset column.
    Column(String),
}

impl MappingTarget {
    pub fn from_token(token: &str) -> Self {
        match token {
            UNSET_TOKEN | "" => MappingTarget::Unset,
            CONSTANT_TOKEN => MappingTarget::Constant,
            column => MappingTarget::Column(column.to_string()),
        }
    }

    pub fn as_token(&self) -> &str {
        match self {
            MappingTarget::Unset => UNSET_TOKEN,
            MappingTarget::Constant => CONSTANT_TOKEN,
            MappingTarget::Column(column) => column,
        }
    }
}

/// Ordered map of target field name to mapping target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    entries: BTreeMap<String, String>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &str, target: MappingTarget) {
        self.entries
            .insert(field.to_string(), target.as_token().to_string());
    }

    pub fn set_column(&mut self, field: &str, column: &str) {
        self.set(field, MappingTarget::Column(column.to_string()));
    }

    pub fn set_constant(&mut self, field: &str) {
        self.set(field, MappingTarget::Constant);
    }

    pub fn target(&self, field: &str) -> MappingTarget {
        self.entries
            .get(field)
            .map(|token| MappingTarget::from_token(token))
            .unwrap_or(MappingTarget::Unset)
    }

    /// True when the field resolves to a column or constant.
    pub fn is_mapped(&self, field: &str) -> bool {
        self.target(field) != MappingTarget::Unset
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, MappingTarget)> {
        self.entries
            .iter()
            .map(|(field, token)| (field.as_str(), MappingTarget::from_token(token)))
    }
}

impl FromIterator<(String, String)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Flat string-keyed constants table.
///
/// Holds per-field constant values plus envelope-level keys that are not
/// catalog fields: `from_org_id`, `to_org_id`, `biz_msg_id`,
/// `creation_date`, and `firm_lei`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constants {
    entries: BTreeMap<String, String>,
}

impl Constants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

impl FromIterator<(String, String)> for Constants {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
