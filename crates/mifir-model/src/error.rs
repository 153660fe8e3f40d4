//! Error types for catalog and registry operations.

use thiserror::Error;

/// Configuration errors from custom-field registry operations.
///
/// These are explicit failure results, not panics: the caller decides
/// whether to surface them or proceed, and the registry state is left
/// unchanged whenever one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("field name cannot be empty")]
    EmptyName,
    #[error("field name '{0}' can only contain letters, numbers, underscores, and hyphens")]
    InvalidName(String),
    #[error("field name '{0}' already exists")]
    DuplicateName(String),
    #[error("field name '{0}' conflicts with a standard MiFIR field")]
    StandardNameCollision(String),
    #[error("XML element name cannot be empty")]
    EmptyXmlName,
    #[error("XML element name '{0}' must start with a letter")]
    XmlNameMustStartWithLetter(String),
    #[error("XML element name '{0}' can only contain letters, numbers, underscores, and hyphens")]
    InvalidXmlName(String),
    #[error("custom field import failed: {0}")]
    Import(String),
}

/// Value-shape errors from validating a value against a declared type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("required field '{0}' cannot be empty")]
    RequiredEmpty(String),
    #[error("'{0}' is not a valid decimal number")]
    NotDecimal(String),
    #[error("'{0}' is not a valid integer")]
    NotInteger(String),
    #[error("'{0}' is not a boolean (expected true/false, 1/0, yes/no, or y/n)")]
    NotBoolean(String),
    #[error("'{value}' is not one of: {allowed}")]
    NotInEnum { value: String, allowed: String },
    #[error("'{0}' is not an ISO 8601 datetime (e.g., 2025-08-19T08:22:23.294Z)")]
    NotDatetime(String),
}

pub type Result<T, E = RegistryError> = std::result::Result<T, E>;
