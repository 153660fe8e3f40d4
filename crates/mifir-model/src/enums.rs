//! Type-safe enumerations for catalog and custom field metadata.
//!
//! These enums are serialized as their lowercase string tokens in the
//! custom-field interchange format, so variants round-trip through
//! `as_str`/`FromStr` rather than numeric codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared scalar type of a standard catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Decimal,
    Datetime,
    Boolean,
    Enum,
}

impl FieldType {
    /// Returns the interchange token for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Decimal => "decimal",
            FieldType::Datetime => "datetime",
            FieldType::Boolean => "boolean",
            FieldType::Enum => "enum",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" => Ok(FieldType::String),
            "decimal" => Ok(FieldType::Decimal),
            "datetime" => Ok(FieldType::Datetime),
            "boolean" => Ok(FieldType::Boolean),
            "enum" => Ok(FieldType::Enum),
            _ => Err(format!("Unknown field type: {s}")),
        }
    }
}

/// Requirement level of a standard catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    /// Must be present in every report.
    Required,
    /// Required only when the reported scenario applies.
    Conditional,
    /// May be omitted; a default is substituted where the schema needs one.
    Optional,
}

impl Requirement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Requirement::Required => "required",
            Requirement::Conditional => "conditional",
            Requirement::Optional => "optional",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Requirement::Required)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Requirement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "required" => Ok(Requirement::Required),
            "conditional" => Ok(Requirement::Conditional),
            "optional" => Ok(Requirement::Optional),
            _ => Err(format!("Unknown requirement level: {s}")),
        }
    }
}

/// Declared scalar type of a user-defined custom field.
///
/// Extends the standard set with `Integer`, which the catalog never uses
/// but user data frequently carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    String,
    Decimal,
    Integer,
    Datetime,
    Boolean,
    Enum,
}

impl CustomFieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomFieldType::String => "string",
            CustomFieldType::Decimal => "decimal",
            CustomFieldType::Integer => "integer",
            CustomFieldType::Datetime => "datetime",
            CustomFieldType::Boolean => "boolean",
            CustomFieldType::Enum => "enum",
        }
    }
}

impl fmt::Display for CustomFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CustomFieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" => Ok(CustomFieldType::String),
            "decimal" => Ok(CustomFieldType::Decimal),
            "integer" => Ok(CustomFieldType::Integer),
            "datetime" => Ok(CustomFieldType::Datetime),
            "boolean" => Ok(CustomFieldType::Boolean),
            "enum" => Ok(CustomFieldType::Enum),
            _ => Err(format!("Unknown custom field type: {s}")),
        }
    }
}

/// Category of a user-defined custom field.
///
/// Mirrors [`Requirement`] with an extra `Constant` case meaning the
/// value is fixed across all rows. Emission order in generated reports
/// is required, conditional, optional, constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldCategory {
    Required,
    Conditional,
    Optional,
    Constant,
}

impl CustomFieldCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomFieldCategory::Required => "required",
            CustomFieldCategory::Conditional => "conditional",
            CustomFieldCategory::Optional => "optional",
            CustomFieldCategory::Constant => "constant",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, CustomFieldCategory::Required)
    }

    /// All categories in report emission order.
    pub fn emission_order() -> [CustomFieldCategory; 4] {
        [
            CustomFieldCategory::Required,
            CustomFieldCategory::Conditional,
            CustomFieldCategory::Optional,
            CustomFieldCategory::Constant,
        ]
    }
}

impl fmt::Display for CustomFieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CustomFieldCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "required" => Ok(CustomFieldCategory::Required),
            "conditional" => Ok(CustomFieldCategory::Conditional),
            "optional" => Ok(CustomFieldCategory::Optional),
            "constant" => Ok(CustomFieldCategory::Constant),
            _ => Err(format!("Unknown custom field category: {s}")),
        }
    }
}
