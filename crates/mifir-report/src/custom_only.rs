//! Custom-fields-only assembler.
//!
//! Shares the envelope with the primary assembler but the per-row body
//! carries nothing except the registry's fields, in category order.
//! This variant never synthesizes values: a field with no resolvable
//! value and no default is omitted, required or not.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesStart, BytesText, Event};
use tracing::info;

use mifir_model::{
    Constants, CustomFieldRegistry, CustomFieldSpec, Dataset, Mapping, MappingTarget, RowView,
};

use crate::common::{CUSTOM_ONLY_PROFILE, close_envelope, end_element, open_envelope, start_element};

#[derive(Debug, Clone, Copy, Default)]
pub struct CustomOnlyGenerator;

impl CustomOnlyGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(
        &self,
        dataset: &Dataset,
        mapping: &Mapping,
        constants: &Constants,
        registry: &CustomFieldRegistry,
    ) -> Result<String> {
        self.generate_at(Utc::now(), dataset, mapping, constants, registry)
    }

    pub fn generate_at(
        &self,
        now: DateTime<Utc>,
        dataset: &Dataset,
        mapping: &Mapping,
        constants: &Constants,
        registry: &CustomFieldRegistry,
    ) -> Result<String> {
        info!(
            rows = dataset.row_count(),
            fields = registry.all_fields().len(),
            "assembling custom-fields-only report"
        );
        let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
        open_envelope(&mut xml, &CUSTOM_ONLY_PROFILE, constants, now)?;
        for row in dataset.rows() {
            start_element(&mut xml, "Tx")?;
            start_element(&mut xml, "New")?;
            for field in registry.in_emission_order() {
                let value = resolve_value(field, &row, mapping, constants);
                if value.is_empty() {
                    continue;
                }
                let mut start = BytesStart::new(field.xml_element_name.as_str());
                start.push_attribute(("data-category", field.category.as_str()));
                xml.write_event(Event::Start(start))?;
                xml.write_event(Event::Text(BytesText::new(&value)))?;
                end_element(&mut xml, &field.xml_element_name)?;
            }
            end_element(&mut xml, "New")?;
            end_element(&mut xml, "Tx")?;
        }
        close_envelope(&mut xml)?;
        String::from_utf8(xml.into_inner()).context("report output is not valid UTF-8")
    }
}

/// Resolves a custom field's value: mapped source first, then the
/// declared default. Empty means "omit".
fn resolve_value(
    field: &CustomFieldSpec,
    row: &RowView<'_>,
    mapping: &Mapping,
    constants: &Constants,
) -> String {
    let resolved = match mapping.target(&field.name) {
        MappingTarget::Unset => String::new(),
        MappingTarget::Constant => constants
            .get(&field.name)
            .map(str::to_string)
            .unwrap_or_default(),
        MappingTarget::Column(column) => row.value(&column),
    };
    if resolved.is_empty() {
        field.default_value.clone()
    } else {
        resolved
    }
}
