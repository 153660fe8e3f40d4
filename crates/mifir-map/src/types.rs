//! Resolver output types.

use std::collections::BTreeMap;

use mifir_model::Mapping;
use serde::Serialize;

/// The resolver's proposal: target field to source column, with a
/// confidence score and a human-readable explanation per field.
///
/// The three maps are keyed identically; confidence and explanations are
/// only populated for fields present in `targets`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuggestionSet {
    targets: BTreeMap<String, String>,
    confidence: BTreeMap<String, f32>,
    explanations: BTreeMap<String, String>,
}

impl SuggestionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a column to a field, replacing any earlier assignment.
    pub fn assign(&mut self, field: &str, column: &str) {
        self.targets.insert(field.to_string(), column.to_string());
    }

    pub fn column(&self, field: &str) -> Option<&str> {
        self.targets.get(field).map(String::as_str)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.targets.contains_key(field)
    }

    /// True when the column is already the target of some field.
    pub fn uses_column(&self, column: &str) -> bool {
        self.targets.values().any(|c| c == column)
    }

    pub fn set_confidence(&mut self, field: &str, score: f32) {
        self.confidence.insert(field.to_string(), score);
    }

    pub fn confidence(&self, field: &str) -> Option<f32> {
        self.confidence.get(field).copied()
    }

    pub fn set_explanation(&mut self, field: &str, text: String) {
        self.explanations.insert(field.to_string(), text);
    }

    pub fn explanation(&self, field: &str) -> Option<&str> {
        self.explanations.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.targets
            .iter()
            .map(|(field, column)| (field.as_str(), column.as_str()))
    }

    /// Converts the proposal into a persistable [`Mapping`].
    pub fn to_mapping(&self) -> Mapping {
        let mut mapping = Mapping::new();
        for (field, column) in &self.targets {
            mapping.set_column(field, column);
        }
        mapping
    }
}
