use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;

use mifir_model::{
    CellValue, Constants, CustomFieldCategory, CustomFieldRegistry, CustomFieldSpec,
    CustomFieldType, Dataset, FieldCatalog, Mapping,
};
use mifir_report::ReportGenerator;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 19, 22, 23, 0).unwrap()
}

fn dataset(columns: &[&str], rows: &[&[&str]]) -> Dataset {
    let mut dataset = Dataset::new(columns.iter().map(|c| (*c).to_string()).collect());
    for row in rows {
        dataset.push_row(
            row.iter()
                .map(|v| CellValue::Text((*v).to_string()))
                .collect(),
        );
    }
    dataset
}

fn generate(dataset: &Dataset, mapping: &Mapping, constants: &Constants) -> String {
    let registry = CustomFieldRegistry::new();
    ReportGenerator::new()
        .generate_at(fixed_now(), dataset, mapping, constants, &registry)
        .unwrap()
}

fn section<'a>(out: &'a str, open: &str, close: &str) -> &'a str {
    let start = out.find(open).unwrap_or_else(|| panic!("missing {open}"));
    let end = out.find(close).unwrap_or_else(|| panic!("missing {close}"));
    &out[start..end]
}

#[test]
fn one_transaction_per_row_in_input_order() {
    let data = dataset(&["trade_id"], &[&["TXNB"], &["TXNA"], &["TXNC"]]);
    let mut mapping = Mapping::new();
    mapping.set_column("transaction_id", "trade_id");
    let out = generate(&data, &mapping, &Constants::new());

    assert_eq!(out.matches("<TxId>").count(), 3);
    let b = out.find("<TxId>TXNB</TxId>").unwrap();
    let a = out.find("<TxId>TXNA</TxId>").unwrap();
    let c = out.find("<TxId>TXNC</TxId>").unwrap();
    assert!(b < a && a < c);
}

#[test]
fn transaction_ids_match_schema_pattern() {
    let data = dataset(
        &["trade_id", "note"],
        &[&["txn-1001/a", "x"], &["", "y"], &["!!!", "z"]],
    );
    let mut mapping = Mapping::new();
    mapping.set_column("transaction_id", "trade_id");
    let out = generate(&data, &mapping, &Constants::new());

    let pattern = Regex::new(r"<TxId>([^<]*)</TxId>").unwrap();
    let shape = Regex::new(r"^[A-Z0-9]{1,52}$").unwrap();
    let ids: Vec<&str> = pattern
        .captures_iter(&out)
        .map(|c| c.get(1).unwrap().as_str())
        .collect();
    assert_eq!(ids.len(), 3);
    for id in &ids {
        assert!(shape.is_match(id), "bad TxId: {id}");
    }
    assert_eq!(ids[0], "TXN1001A");
    // Empty and stripped-to-nothing values fall back to the fixed id.
    assert_eq!(ids[1], "AUTOTXN001");
    assert_eq!(ids[2], "AUTOTXN001");
}

#[test]
fn unmapped_transaction_id_is_synthesized_per_row() {
    let data = dataset(&["note"], &[&["first"], &["second"]]);
    let out = generate(&data, &Mapping::new(), &Constants::new());

    let pattern = Regex::new(r"<TxId>(AUTOTXN20250819222300\d{3})</TxId>").unwrap();
    let ids: Vec<&str> = pattern
        .captures_iter(&out)
        .map(|c| c.get(1).unwrap().as_str())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn lei_shaped_buyer_takes_legal_entity_branch() {
    let data = dataset(&["buyer"], &[&["2138001ME4Z9Z8DZNS52"]]);
    let mut mapping = Mapping::new();
    mapping.set_column("buyer_lei", "buyer");
    let out = generate(&data, &mapping, &Constants::new());

    let buyer = section(&out, "<Buyr>", "</Buyr>");
    assert!(buyer.contains("<LEI>2138001ME4Z9Z8DZNS52</LEI>"));
    assert!(!buyer.contains("<Prsn>"));

    // Unmapped seller degrades to the sentinel, which is not LEI-shaped.
    let seller = section(&out, "<Sellr>", "</Sellr>");
    assert!(!seller.contains("<LEI>"));
    assert!(seller.contains("<Nm>Counterparty Seller</Nm>"));
    assert!(seller.contains("<Id>UNKNOWN_ID</Id>"));
    assert!(seller.contains("<Cd>NOID</Cd>"));
}

#[test]
fn person_branch_carries_mapped_details() {
    let data = dataset(
        &["buyer_id", "first", "last", "born", "country", "nid"],
        &[&[
            "9001",
            "MATHIEU",
            "DE KONINCK",
            "1994-08-31 12:30:00",
            "BE",
            "BE592344987958",
        ]],
    );
    let mut mapping = Mapping::new();
    mapping.set_column("buyer_lei", "buyer_id");
    mapping.set_column("buyer_first_name", "first");
    mapping.set_column("buyer_last_name", "last");
    mapping.set_column("buyer_birth_date", "born");
    mapping.set_column("buyer_country", "country");
    mapping.set_column("buyer_national_id", "nid");
    let out = generate(&data, &mapping, &Constants::new());

    let buyer = section(&out, "<Buyr>", "</Buyr>");
    assert!(buyer.contains("<FrstNm>MATHIEU</FrstNm>"));
    assert!(buyer.contains("<Nm>DE KONINCK</Nm>"));
    assert!(buyer.contains("<BirthDt>1994-08-31</BirthDt>"));
    assert!(buyer.contains("<Id>BE592344987958</Id>"));
    assert!(buyer.contains("<Cd>NIDN</Cd>"));
    assert!(buyer.contains("<CtryOfBrnch>BE</CtryOfBrnch>"));
    assert!(!buyer.contains("<LEI>"));
}

#[test]
fn country_of_branch_never_attaches_to_legal_entities() {
    let data = dataset(
        &["buyer", "country"],
        &[&["2138001ME4Z9Z8DZNS52", "BE"]],
    );
    let mut mapping = Mapping::new();
    mapping.set_column("buyer_lei", "buyer");
    mapping.set_column("buyer_country", "country");
    let out = generate(&data, &mapping, &Constants::new());

    let buyer = section(&out, "<Buyr>", "</Buyr>");
    assert!(!buyer.contains("<CtryOfBrnch>"));
}

#[test]
fn counterparty_inference_follows_side_column() {
    let data = dataset(
        &["taker", "maker", "side"],
        &[&["549300XYZABCDEFG5678", "213800ABCDEFGHIJ1234", "buy"]],
    );
    let mut mapping = Mapping::new();
    mapping.set_column("taker_user_id", "taker");
    mapping.set_column("maker_user_id", "maker");
    mapping.set_column("taker_side", "side");
    let out = generate(&data, &mapping, &Constants::new());

    let buyer = section(&out, "<Buyr>", "</Buyr>");
    assert!(buyer.contains("<LEI>549300XYZABCDEFG5678</LEI>"));
    let seller = section(&out, "<Sellr>", "</Sellr>");
    assert!(seller.contains("<LEI>213800ABCDEFGHIJ1234</LEI>"));

    // With a sell-side row the pairing reverses.
    let data = dataset(
        &["taker", "maker", "side"],
        &[&["549300XYZABCDEFG5678", "213800ABCDEFGHIJ1234", "sell"]],
    );
    let out = generate(&data, &mapping, &Constants::new());
    let buyer = section(&out, "<Buyr>", "</Buyr>");
    assert!(buyer.contains("<LEI>213800ABCDEFGHIJ1234</LEI>"));
    let seller = section(&out, "<Sellr>", "</Sellr>");
    assert!(seller.contains("<LEI>549300XYZABCDEFG5678</LEI>"));
}

#[test]
fn isin_preference_short_circuits_other_branch() {
    let data = dataset(&["isin"], &[&["US0231351067"]]);
    let mut mapping = Mapping::new();
    mapping.set_column("instrument_isin", "isin");
    let out = generate(&data, &mapping, &Constants::new());

    let instrument = section(&out, "<FinInstrm>", "</FinInstrm>");
    assert!(instrument.contains("<ISIN>US0231351067</ISIN>"));
    assert!(!instrument.contains("<Othr>"));
}

#[test]
fn unmapped_instrument_gets_generic_description() {
    let data = dataset(&["note"], &[&["x"]]);
    let out = generate(&data, &Mapping::new(), &Constants::new());

    let instrument = section(&out, "<FinInstrm>", "</FinInstrm>");
    assert!(instrument.contains("<FullNm>CRYPTO_DERIVATIVE</FullNm>"));
    assert!(instrument.contains("<ClssfctnTp>SESTXC</ClssfctnTp>"));
    assert!(instrument.contains("<NtnlCcy>USD</NtnlCcy>"));
    assert!(instrument.contains("<PricMltplr>1</PricMltplr>"));
    assert!(instrument.contains("<Id>UNKNOWN_INSTRUMENT</Id>"));
    assert!(instrument.contains("<DlvryTp>CASH</DlvryTp>"));
}

#[test]
fn instrument_symbol_feeds_full_name_fallback() {
    let data = dataset(&["symbol"], &[&["BTC_USD"]]);
    let mut mapping = Mapping::new();
    mapping.set_column("instrument_symbol", "symbol");
    let out = generate(&data, &mapping, &Constants::new());
    let instrument = section(&out, "<FinInstrm>", "</FinInstrm>");
    assert!(instrument.contains("<FullNm>BTC_USD</FullNm>"));
}

#[test]
fn empty_mapping_still_yields_complete_record() {
    let data = dataset(&["note"], &[&["x"]]);
    let out = generate(&data, &Mapping::new(), &Constants::new());

    assert!(out.contains("<ExctgPty>YOUR_FIRM_LEI_HERE</ExctgPty>"));
    assert!(out.contains("<InvstmtPtyInd>true</InvstmtPtyInd>"));
    assert!(out.contains("<SubmitgPty>YOUR_FIRM_LEI_HERE</SubmitgPty>"));
    assert!(out.contains("<TrnsmssnInd>false</TrnsmssnInd>"));
    assert!(out.contains("<TradDt>2025-08-19T22:23:00.000Z</TradDt>"));
    assert!(out.contains("<TradgCpcty>AOTC</TradgCpcty>"));
    assert!(out.contains("<Unit>1.0</Unit>"));
    assert!(out.contains(r#"<Amt Ccy="USD">100.00</Amt>"#));
    assert!(out.contains("<Sgn>true</Sgn>"));
    assert!(out.contains("<TradVn>XOFF</TradVn>"));
    assert!(out.contains("<Clnt>NORE</Clnt>"));
    assert!(out.contains("<ShrtSellgInd>UNDI</ShrtSellgInd>"));
    assert!(out.contains("<SctiesFincgTxInd>false</SctiesFincgTxInd>"));
}

#[test]
fn reporting_party_constant_feeds_executing_and_submitting() {
    let data = dataset(&["note"], &[&["x"]]);
    let mut mapping = Mapping::new();
    mapping.set_constant("reporting_party_lei");
    let mut constants = Constants::new();
    constants.set("reporting_party_lei", "2138001ME4Z9Z8DZNS52");
    let out = generate(&data, &mapping, &constants);

    assert!(out.contains("<ExctgPty>2138001ME4Z9Z8DZNS52</ExctgPty>"));
    assert!(out.contains("<SubmitgPty>2138001ME4Z9Z8DZNS52</SubmitgPty>"));
}

#[test]
fn partial_timestamp_is_spliced_onto_current_date() {
    let data = dataset(&["Timestamp"], &[&["22:23.3"]]);
    let mut mapping = Mapping::new();
    mapping.set_column("trade_datetime", "Timestamp");
    let out = generate(&data, &mapping, &Constants::new());
    assert!(out.contains("<TradDt>2025-08-19T22:23.3:00.000Z</TradDt>"));
}

#[test]
fn legacy_capacity_and_side_values_are_coerced() {
    let data = dataset(
        &["capacity", "position"],
        &[&["principal", "long"], &["DEAL", "short"]],
    );
    let mut mapping = Mapping::new();
    mapping.set_column("trading_capacity", "capacity");
    mapping.set_column("short_sale_indicator", "position");
    let out = generate(&data, &mapping, &Constants::new());

    let first = out.find("<TradgCpcty>AOTC</TradgCpcty>").unwrap();
    let second = out.find("<TradgCpcty>DEAL</TradgCpcty>").unwrap();
    assert!(first < second);
    assert!(out.contains("<ShrtSellgInd>UNDI</ShrtSellgInd>"));
    assert!(out.contains("<ShrtSellgInd>SELL</ShrtSellgInd>"));
}

#[test]
fn decision_maker_only_for_own_firm_side() {
    let firm_lei = "2138005EFA978Y43G944";
    let data = dataset(
        &["buyer", "seller", "decider", "algo"],
        &[&[firm_lei, "549300XYZABCDEFG5678", "BE592344987958", "ALGO7"]],
    );
    let mut mapping = Mapping::new();
    mapping.set_column("buyer_lei", "buyer");
    mapping.set_column("seller_lei", "seller");
    mapping.set_column("investment_decision_person", "decider");
    mapping.set_column("execution_decision_algo", "algo");

    let mut constants = Constants::new();
    constants.set("firm_lei", firm_lei);
    let out = generate(&data, &mapping, &constants);

    let buyer = section(&out, "<Buyr>", "</Buyr>");
    assert!(buyer.contains("<DcsnMakr>"));
    assert!(buyer.contains("<Id>BE592344987958</Id>"));
    // Seller is an external counterparty; no attribution there.
    let seller = section(&out, "<Sellr>", "</Sellr>");
    assert!(!seller.contains("<ExctnWthnFirm>"));

    // Without the firm constant nothing is attributed at all.
    let out = generate(&data, &mapping, &Constants::new());
    assert!(!out.contains("<DcsnMakr>"));
}

#[test]
fn execution_attribution_goes_on_the_seller_side() {
    let firm_lei = "2138005EFA978Y43G944";
    let data = dataset(
        &["buyer", "seller", "algo"],
        &[&["549300XYZABCDEFG5678", firm_lei, "ALGO7"]],
    );
    let mut mapping = Mapping::new();
    mapping.set_column("buyer_lei", "buyer");
    mapping.set_column("seller_lei", "seller");
    mapping.set_column("execution_decision_algo", "algo");
    let mut constants = Constants::new();
    constants.set("firm_lei", firm_lei);
    let out = generate(&data, &mapping, &constants);

    let seller = section(&out, "<Sellr>", "</Sellr>");
    assert!(seller.contains("<ExctnWthnFirm>"));
    assert!(seller.contains("<Algo>"));
    assert!(seller.contains("<Id>ALGO7</Id>"));
}

#[test]
fn generation_is_deterministic_with_pinned_clock() {
    let data = dataset(
        &["trade_id", "price"],
        &[&["TXN1", "144.01"], &["TXN2", "150.00"]],
    );
    let mut mapping = Mapping::new();
    mapping.set_column("transaction_id", "trade_id");
    mapping.set_column("price_amount", "price");

    let first = generate(&data, &mapping, &Constants::new());
    let second = generate(&data, &mapping, &Constants::new());
    assert_eq!(first, second);
}

#[test]
fn custom_fields_append_after_standard_block() {
    let catalog = FieldCatalog::standard();
    let mut registry = CustomFieldRegistry::new();
    registry
        .add(
            CustomFieldSpec {
                name: "desk_code".to_string(),
                xml_element_name: "DeskCd".to_string(),
                field_type: CustomFieldType::String,
                category: CustomFieldCategory::Required,
                description: String::new(),
                default_value: "UNASSIGNED".to_string(),
                enum_values: None,
                parent_element: "New".to_string(),
                notes: String::new(),
            },
            &catalog,
        )
        .unwrap();
    registry
        .add(
            CustomFieldSpec {
                name: "fill_ratio".to_string(),
                xml_element_name: "FillRatio".to_string(),
                field_type: CustomFieldType::Decimal,
                category: CustomFieldCategory::Optional,
                description: String::new(),
                default_value: String::new(),
                enum_values: None,
                parent_element: "New".to_string(),
                notes: String::new(),
            },
            &catalog,
        )
        .unwrap();

    let data = dataset(&["desk", "ratio"], &[&["", "not-a-number"]]);
    let mut mapping = Mapping::new();
    mapping.set_column("desk_code", "desk");
    mapping.set_column("fill_ratio", "ratio");

    let out = ReportGenerator::new()
        .generate_at(
            fixed_now(),
            &data,
            &mapping,
            &Constants::new(),
            &registry,
        )
        .unwrap();

    // Required-with-default falls back; invalid decimal is omitted.
    assert!(out.contains("<DeskCd>UNASSIGNED</DeskCd>"));
    assert!(!out.contains("<FillRatio>"));
    let attrs_end = out.find("</AddtlAttrbts>").unwrap();
    let custom = out.find("<DeskCd>").unwrap();
    assert!(custom > attrs_end);
}
