use chrono::{DateTime, TimeZone, Utc};

use mifir_model::{
    CellValue, Constants, CustomFieldCategory, CustomFieldRegistry, CustomFieldSpec,
    CustomFieldType, Dataset, FieldCatalog, Mapping,
};
use mifir_report::CustomOnlyGenerator;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 19, 22, 23, 0).unwrap()
}

fn spec(
    name: &str,
    tag: &str,
    category: CustomFieldCategory,
    default_value: &str,
) -> CustomFieldSpec {
    CustomFieldSpec {
        name: name.to_string(),
        xml_element_name: tag.to_string(),
        field_type: CustomFieldType::String,
        category,
        description: String::new(),
        default_value: default_value.to_string(),
        enum_values: None,
        parent_element: "New".to_string(),
        notes: String::new(),
    }
}

fn registry_with(fields: Vec<CustomFieldSpec>) -> CustomFieldRegistry {
    let catalog = FieldCatalog::standard();
    let mut registry = CustomFieldRegistry::new();
    for field in fields {
        registry.add(field, &catalog).unwrap();
    }
    registry
}

fn one_row_dataset(columns: &[&str], row: &[&str]) -> Dataset {
    let mut dataset = Dataset::new(columns.iter().map(|c| (*c).to_string()).collect());
    dataset.push_row(
        row.iter()
            .map(|v| CellValue::Text((*v).to_string()))
            .collect(),
    );
    dataset
}

#[test]
fn envelope_uses_custom_profile_defaults() {
    let registry = registry_with(vec![spec(
        "desk_code",
        "DeskCd",
        CustomFieldCategory::Optional,
        "",
    )]);
    let data = one_row_dataset(&["desk"], &["FX-1"]);
    let mut mapping = Mapping::new();
    mapping.set_column("desk_code", "desk");

    let out = CustomOnlyGenerator::new()
        .generate_at(fixed_now(), &data, &mapping, &Constants::new(), &registry)
        .unwrap();

    assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(out.contains("<BizMsgIdr>CUSTOM_FIELDS_20250819_222300</BizMsgIdr>"));
    assert!(out.contains("<MsgDefIdr>auth.016.001.01</MsgDefIdr>"));
    assert!(out.contains("<CreDt>2025-08-19T22:23:00Z</CreDt>"));
    assert_eq!(out.matches("<Id>CUSTOM</Id>").count(), 2);
}

#[test]
fn body_carries_only_custom_fields_with_category_attribute() {
    let registry = registry_with(vec![
        spec("client_ref", "ClntRef", CustomFieldCategory::Required, ""),
        spec("desk_code", "DeskCd", CustomFieldCategory::Optional, ""),
    ]);
    let data = one_row_dataset(&["ref", "desk"], &["R-77", "FX-1"]);
    let mut mapping = Mapping::new();
    mapping.set_column("client_ref", "ref");
    mapping.set_column("desk_code", "desk");

    let out = CustomOnlyGenerator::new()
        .generate_at(fixed_now(), &data, &mapping, &Constants::new(), &registry)
        .unwrap();

    assert!(out.contains(r#"<ClntRef data-category="required">R-77</ClntRef>"#));
    assert!(out.contains(r#"<DeskCd data-category="optional">FX-1</DeskCd>"#));
    // Required before optional, both inside Tx/New, no standard slots.
    let required = out.find("<ClntRef").unwrap();
    let optional = out.find("<DeskCd").unwrap();
    assert!(required < optional);
    assert!(out.contains("<Tx>"));
    assert!(out.contains("<New>"));
    assert!(!out.contains("<TxId>"));
    assert!(!out.contains("<ExctgPty>"));
    assert!(!out.contains("<FinInstrm>"));
}

#[test]
fn valueless_fields_are_omitted_even_when_required() {
    let registry = registry_with(vec![spec(
        "client_ref",
        "ClntRef",
        CustomFieldCategory::Required,
        "",
    )]);
    let data = one_row_dataset(&["other"], &["x"]);

    let out = CustomOnlyGenerator::new()
        .generate_at(
            fixed_now(),
            &data,
            &Mapping::new(),
            &Constants::new(),
            &registry,
        )
        .unwrap();

    assert!(!out.contains("<ClntRef"));
    // The per-row record is still emitted, just empty.
    assert!(out.contains("<New>"));
}

#[test]
fn default_value_fills_unresolved_fields() {
    let registry = registry_with(vec![spec(
        "desk_code",
        "DeskCd",
        CustomFieldCategory::Optional,
        "UNASSIGNED",
    )]);
    let data = one_row_dataset(&["desk"], &[""]);
    let mut mapping = Mapping::new();
    mapping.set_column("desk_code", "desk");

    let out = CustomOnlyGenerator::new()
        .generate_at(fixed_now(), &data, &mapping, &Constants::new(), &registry)
        .unwrap();

    assert!(out.contains(r#"<DeskCd data-category="optional">UNASSIGNED</DeskCd>"#));
}

#[test]
fn constant_mapping_resolves_from_constants_table() {
    let registry = registry_with(vec![spec(
        "venue_code",
        "VenueCd",
        CustomFieldCategory::Constant,
        "",
    )]);
    let data = one_row_dataset(&["other"], &["x"]);
    let mut mapping = Mapping::new();
    mapping.set_constant("venue_code");
    let mut constants = Constants::new();
    constants.set("venue_code", "XOFF");

    let out = CustomOnlyGenerator::new()
        .generate_at(fixed_now(), &data, &mapping, &constants, &registry)
        .unwrap();

    assert!(out.contains(r#"<VenueCd data-category="constant">XOFF</VenueCd>"#));
}

#[test]
fn one_record_per_row() {
    let registry = registry_with(vec![spec(
        "desk_code",
        "DeskCd",
        CustomFieldCategory::Optional,
        "",
    )]);
    let mut data = Dataset::new(vec!["desk".to_string()]);
    for value in ["FX-1", "FX-2", "FX-3"] {
        data.push_row(vec![CellValue::Text(value.to_string())]);
    }
    let mut mapping = Mapping::new();
    mapping.set_column("desk_code", "desk");

    let out = CustomOnlyGenerator::new()
        .generate_at(fixed_now(), &data, &mapping, &Constants::new(), &registry)
        .unwrap();

    assert_eq!(out.matches("<New>").count(), 3);
    let first = out.find(">FX-1<").unwrap();
    let second = out.find(">FX-2<").unwrap();
    let third = out.find(">FX-3<").unwrap();
    assert!(first < second && second < third);
}
