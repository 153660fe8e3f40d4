//! User-extensible custom field registry.
//!
//! Custom fields are the user-grown analog of the standard catalog: the
//! registry is the sole authority for their existence and uniqueness.
//! Definitions round-trip through a JSON interchange format so a field
//! set can be saved and reloaded across sessions.

use serde::{Deserialize, Serialize};

use crate::catalog::FieldCatalog;
use crate::enums::{CustomFieldCategory, CustomFieldType};
use crate::error::{RegistryError, ValueError};

/// Default placement container for custom fields: the row-level `New`
/// element. Nested placement is declared in the data model but always
/// flattens to this container.
pub const DEFAULT_PARENT_ELEMENT: &str = "New";

/// Boolean tokens accepted by [`CustomFieldRegistry::validate_value`],
/// matched case-insensitively.
pub const BOOLEAN_TOKENS: [&str; 8] = ["true", "false", "1", "0", "yes", "no", "y", "n"];

fn default_parent_element() -> String {
    DEFAULT_PARENT_ELEMENT.to_string()
}

fn default_category() -> CustomFieldCategory {
    CustomFieldCategory::Optional
}

/// A user-defined output field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldSpec {
    pub name: String,
    /// Output tag emitted into the transaction record.
    pub xml_element_name: String,
    pub field_type: CustomFieldType,
    #[serde(default = "default_category")]
    pub category: CustomFieldCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub enum_values: Option<Vec<String>>,
    /// Declared placement container. Only `New` is honored; see DESIGN.md.
    #[serde(default = "default_parent_element")]
    pub parent_element: String,
    #[serde(default)]
    pub notes: String,
}

impl CustomFieldSpec {
    pub fn is_required(&self) -> bool {
        self.category.is_required()
    }

    pub fn is_constant(&self) -> bool {
        self.category == CustomFieldCategory::Constant
    }
}

/// Registry of user-defined custom fields.
///
/// Owns its field set exclusively; callers pass it to the assemblers by
/// reference along with the mapping and constants.
#[derive(Debug, Clone, Default)]
pub struct CustomFieldRegistry {
    fields: Vec<CustomFieldSpec>,
}

impl CustomFieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field after validating its name against both catalogs and
    /// its XML element name. The registry is unchanged on failure.
    pub fn add(&mut self, field: CustomFieldSpec, catalog: &FieldCatalog) -> Result<(), RegistryError> {
        self.validate_name(&field.name, catalog)?;
        Self::validate_xml_name(&field.xml_element_name)?;
        self.fields.push(field);
        Ok(())
    }

    /// Removes a field by name. Removing a non-existent name succeeds.
    pub fn remove(&mut self, name: &str) {
        self.fields.retain(|f| f.name != name);
    }

    pub fn field(&self, name: &str) -> Option<&CustomFieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// All fields in insertion order.
    pub fn all_fields(&self) -> &[CustomFieldSpec] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn by_category(&self, category: CustomFieldCategory) -> Vec<&CustomFieldSpec> {
        self.fields
            .iter()
            .filter(|f| f.category == category)
            .collect()
    }

    /// Fields ordered for report emission: required, conditional,
    /// optional, constant; insertion order within each category.
    pub fn in_emission_order(&self) -> Vec<&CustomFieldSpec> {
        CustomFieldCategory::emission_order()
            .into_iter()
            .flat_map(|category| self.by_category(category))
            .collect()
    }

    /// Validates a candidate field name: non-empty, alphanumeric plus
    /// `_`/`-`, and not colliding with either catalog.
    pub fn validate_name(&self, name: &str, catalog: &FieldCatalog) -> Result<(), RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if !is_identifier(name) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        if self.contains(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        if catalog.contains(name) {
            return Err(RegistryError::StandardNameCollision(name.to_string()));
        }
        Ok(())
    }

    /// Validates an output element name: non-empty, starts with a
    /// letter, alphanumeric plus `_`/`-`.
    pub fn validate_xml_name(name: &str) -> Result<(), RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyXmlName);
        }
        if !name.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Err(RegistryError::XmlNameMustStartWithLetter(name.to_string()));
        }
        if !is_identifier(name) {
            return Err(RegistryError::InvalidXmlName(name.to_string()));
        }
        Ok(())
    }

    /// Serializes all fields to the JSON interchange format, preserving
    /// insertion order. Types and categories are string tokens.
    pub fn export_json(&self) -> Result<String, RegistryError> {
        serde_json::to_string_pretty(&self.fields)
            .map_err(|e| RegistryError::Import(e.to_string()))
    }

    /// Replaces the field set wholesale from interchange JSON.
    ///
    /// Imports are all-or-nothing: on any decode failure the registry is
    /// left unchanged. Returns the number of fields imported.
    pub fn import_json(&mut self, json: &str) -> Result<usize, RegistryError> {
        let imported: Vec<CustomFieldSpec> =
            serde_json::from_str(json).map_err(|e| RegistryError::Import(e.to_string()))?;
        let count = imported.len();
        self.fields = imported;
        Ok(count)
    }

    /// Validates a value against a field's declared type.
    ///
    /// An empty value is valid exactly when the field is not required.
    pub fn validate_value(field: &CustomFieldSpec, value: &str) -> Result<(), ValueError> {
        if value.is_empty() {
            if field.is_required() {
                return Err(ValueError::RequiredEmpty(field.name.clone()));
            }
            return Ok(());
        }
        match field.field_type {
            CustomFieldType::Decimal => value
                .parse::<f64>()
                .map(|_| ())
                .map_err(|_| ValueError::NotDecimal(value.to_string())),
            CustomFieldType::Integer => value
                .parse::<i64>()
                .map(|_| ())
                .map_err(|_| ValueError::NotInteger(value.to_string())),
            CustomFieldType::Boolean => {
                if BOOLEAN_TOKENS
                    .iter()
                    .any(|token| value.eq_ignore_ascii_case(token))
                {
                    Ok(())
                } else {
                    Err(ValueError::NotBoolean(value.to_string()))
                }
            }
            CustomFieldType::Enum => match &field.enum_values {
                Some(allowed) if !allowed.iter().any(|v| v == value) => {
                    Err(ValueError::NotInEnum {
                        value: value.to_string(),
                        allowed: allowed.join(", "),
                    })
                }
                _ => Ok(()),
            },
            CustomFieldType::Datetime => {
                // Loose structural check, not a full parser: a date/time
                // separator plus a UTC-or-offset marker.
                let tail_offset = value.len() >= 6
                    && value
                        .get(value.len() - 6..)
                        .is_some_and(|tail| tail.contains(['+', '-']));
                if value.contains('T') && (value.contains('Z') || tail_offset) {
                    Ok(())
                } else {
                    Err(ValueError::NotDatetime(value.to_string()))
                }
            }
            CustomFieldType::String => Ok(()),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
