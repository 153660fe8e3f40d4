//! Per-row transaction record assembly.
//!
//! The record body follows a fixed schedule of eleven slots in ESMAUG
//! 1.1.0 document order. Simple scalar slots are plain entries in
//! [`TX_SCHEDULE`]; the buyer, seller, and instrument slots carry
//! branching logic of their own. Custom fields are appended after the
//! schedule. Assembly never fails on missing data: every slot has a
//! default or sentinel.

use anyhow::Result;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use mifir_model::{Constants, CustomFieldRegistry, Mapping, RowView};

use crate::common::{Xml, end_element, mapped_value, start_element, write_text_element};
use crate::normalize::{
    BUYER_SENTINEL, SELLER_SENTINEL, FIRM_SENTINEL, clean_transaction_id,
    coerce_short_sale_indicator, coerce_trading_capacity, current_timestamp, date_only,
    is_lei_format, normalize_datetime, synthesize_transaction_id,
};

/// Everything one row's assembly can see. Read-only; rows are
/// independent of each other.
pub(crate) struct RowContext<'a> {
    pub row: RowView<'a>,
    pub mapping: &'a Mapping,
    pub constants: &'a Constants,
    pub registry: &'a CustomFieldRegistry,
    pub now: DateTime<Utc>,
}

impl RowContext<'_> {
    fn value(&self, field: &str) -> String {
        mapped_value(&self.row, self.mapping, self.constants, field)
    }

    fn is_mapped(&self, field: &str) -> bool {
        self.mapping.is_mapped(field)
    }

    /// The reporting firm's own LEI, if configured. Gates decision-maker
    /// attribution.
    fn firm_lei(&self) -> Option<&str> {
        self.constants
            .get("firm_lei")
            .or_else(|| self.constants.get("reporting_party_lei"))
    }
}

type SlotFn = fn(&mut Xml, &RowContext<'_>) -> Result<()>;

/// ESMAUG 1.1.0 slot order. Positions are load-bearing: reordering this
/// table produces schema-invalid documents.
const TX_SCHEDULE: &[SlotFn] = &[
    write_transaction_id,      // 1. TxId
    write_executing_party,     // 2. ExctgPty
    write_investment_party,    // 3. InvstmtPtyInd
    write_submitting_party,    // 4. SubmitgPty
    write_buyer,               // 5. Buyr
    write_seller,              // 6. Sellr
    write_order_transmission,  // 7. OrdrTrnsmssn
    write_trade_details,       // 8. Tx
    write_instrument,          // 9. FinInstrm
    write_executing_person,    // 10. ExctgPrsn
    write_additional_attributes, // 11. AddtlAttrbts
];

/// Emits one `Tx/New` record for the context row.
pub(crate) fn write_transaction(xml: &mut Xml, ctx: &RowContext<'_>) -> Result<()> {
    start_element(xml, "Tx")?;
    start_element(xml, "New")?;
    for slot in TX_SCHEDULE {
        slot(xml, ctx)?;
    }
    write_custom_fields(xml, ctx)?;
    end_element(xml, "New")?;
    end_element(xml, "Tx")?;
    Ok(())
}

fn write_transaction_id(xml: &mut Xml, ctx: &RowContext<'_>) -> Result<()> {
    let tx_id = if ctx.is_mapped("transaction_id") {
        clean_transaction_id(&ctx.value("transaction_id"))
    } else {
        synthesize_transaction_id(ctx.now, &ctx.row.fingerprint())
    };
    write_text_element(xml, "TxId", &tx_id)
}

fn write_executing_party(xml: &mut Xml, ctx: &RowContext<'_>) -> Result<()> {
    let value = if ctx.is_mapped("executing_party") {
        ctx.value("executing_party")
    } else {
        let reporting = ctx.value("reporting_party_lei");
        if reporting.is_empty() {
            FIRM_SENTINEL.to_string()
        } else {
            reporting
        }
    };
    write_text_element(xml, "ExctgPty", &value)
}

fn write_investment_party(xml: &mut Xml, ctx: &RowContext<'_>) -> Result<()> {
    let value = if ctx.is_mapped("investment_party_ind") {
        ctx.value("investment_party_ind")
    } else {
        "true".to_string()
    };
    write_text_element(xml, "InvstmtPtyInd", &value)
}

fn write_submitting_party(xml: &mut Xml, ctx: &RowContext<'_>) -> Result<()> {
    let value = if ctx.is_mapped("reporting_party_lei") {
        ctx.value("reporting_party_lei")
    } else {
        ctx.constants
            .get("reporting_party_lei")
            .unwrap_or(FIRM_SENTINEL)
            .to_string()
    };
    write_text_element(xml, "SubmitgPty", &value)
}

fn write_order_transmission(xml: &mut Xml, ctx: &RowContext<'_>) -> Result<()> {
    start_element(xml, "OrdrTrnsmssn")?;
    let value = if ctx.is_mapped("transmission_indicator") {
        ctx.value("transmission_indicator")
    } else {
        "false".to_string()
    };
    write_text_element(xml, "TrnsmssnInd", &value)?;
    end_element(xml, "OrdrTrnsmssn")
}

fn write_trade_details(xml: &mut Xml, ctx: &RowContext<'_>) -> Result<()> {
    start_element(xml, "Tx")?;

    let trade_dt = if ctx.is_mapped("trade_datetime") {
        normalize_datetime(&ctx.value("trade_datetime"), ctx.now)
    } else {
        current_timestamp(ctx.now)
    };
    write_text_element(xml, "TradDt", &trade_dt)?;

    let capacity = if ctx.is_mapped("trading_capacity") {
        coerce_trading_capacity(&ctx.value("trading_capacity"))
    } else {
        "AOTC".to_string()
    };
    write_text_element(xml, "TradgCpcty", &capacity)?;

    start_element(xml, "Qty")?;
    let quantity = if ctx.is_mapped("quantity") {
        ctx.value("quantity")
    } else {
        "1.0".to_string()
    };
    write_text_element(xml, "Unit", &quantity)?;
    end_element(xml, "Qty")?;

    start_element(xml, "Pric")?;
    start_element(xml, "Pric")?;
    start_element(xml, "MntryVal")?;
    let amount = if ctx.is_mapped("price_amount") {
        ctx.value("price_amount")
    } else {
        "100.00".to_string()
    };
    let currency = if ctx.is_mapped("price_currency") {
        ctx.value("price_currency")
    } else {
        "USD".to_string()
    };
    let mut amt = BytesStart::new("Amt");
    amt.push_attribute(("Ccy", currency.as_str()));
    xml.write_event(Event::Start(amt))?;
    xml.write_event(Event::Text(quick_xml::events::BytesText::new(&amount)))?;
    end_element(xml, "Amt")?;
    write_text_element(xml, "Sgn", "true")?;
    end_element(xml, "MntryVal")?;
    end_element(xml, "Pric")?;
    end_element(xml, "Pric")?;

    let venue = if ctx.is_mapped("trading_venue") {
        ctx.value("trading_venue")
    } else {
        "XOFF".to_string()
    };
    write_text_element(xml, "TradVn", &venue)?;

    end_element(xml, "Tx")
}

/// First mapped field of a fallback chain, resolved to its value.
fn first_mapped(ctx: &RowContext<'_>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find(|field| ctx.is_mapped(field))
        .map(|field| ctx.value(field))
}

fn write_instrument(xml: &mut Xml, ctx: &RowContext<'_>) -> Result<()> {
    start_element(xml, "FinInstrm")?;

    // ISIN preference: a mapped, non-blank ISIN short-circuits the
    // entire Othr description.
    if ctx.is_mapped("instrument_isin") {
        let isin = ctx.value("instrument_isin");
        if !isin.trim().is_empty() {
            write_text_element(xml, "ISIN", isin.trim())?;
            return end_element(xml, "FinInstrm");
        }
    }

    start_element(xml, "Othr")?;
    start_element(xml, "FinInstrmGnlAttrbts")?;

    let full_name = first_mapped(
        ctx,
        &["instrument_full_name", "instrument_name", "instrument_symbol"],
    )
    .unwrap_or_else(|| "CRYPTO_DERIVATIVE".to_string());
    write_text_element(xml, "FullNm", &full_name)?;

    let classification = first_mapped(ctx, &["instrument_classification", "classification_type"])
        .unwrap_or_else(|| "SESTXC".to_string());
    write_text_element(xml, "ClssfctnTp", &classification)?;

    let notional_ccy = first_mapped(ctx, &["instrument_notional_currency", "notional_currency"])
        .unwrap_or_else(|| "USD".to_string());
    write_text_element(xml, "NtnlCcy", &notional_ccy)?;
    end_element(xml, "FinInstrmGnlAttrbts")?;

    start_element(xml, "DerivInstrmAttrbts")?;
    let multiplier = if ctx.is_mapped("price_multiplier") {
        ctx.value("price_multiplier")
    } else {
        "1".to_string()
    };
    write_text_element(xml, "PricMltplr", &multiplier)?;

    start_element(xml, "UndrlygInstrm")?;
    start_element(xml, "Othr")?;
    start_element(xml, "Sngl")?;
    if ctx.is_mapped("instrument_isin") {
        write_text_element(xml, "ISIN", &ctx.value("instrument_isin"))?;
    } else {
        write_text_element(xml, "Id", "UNKNOWN_INSTRUMENT")?;
    }
    end_element(xml, "Sngl")?;
    end_element(xml, "Othr")?;
    end_element(xml, "UndrlygInstrm")?;

    let delivery = if ctx.is_mapped("delivery_type") {
        ctx.value("delivery_type")
    } else {
        "CASH".to_string()
    };
    write_text_element(xml, "DlvryTp", &delivery)?;
    end_element(xml, "DerivInstrmAttrbts")?;

    end_element(xml, "Othr")?;
    end_element(xml, "FinInstrm")
}

fn write_executing_person(xml: &mut Xml, ctx: &RowContext<'_>) -> Result<()> {
    start_element(xml, "ExctgPrsn")?;
    let value = if ctx.is_mapped("executing_person") {
        ctx.value("executing_person")
    } else {
        "NORE".to_string()
    };
    write_text_element(xml, "Clnt", &value)?;
    end_element(xml, "ExctgPrsn")
}

fn write_additional_attributes(xml: &mut Xml, ctx: &RowContext<'_>) -> Result<()> {
    start_element(xml, "AddtlAttrbts")?;
    let short_sale = if ctx.is_mapped("short_sale_indicator") {
        coerce_short_sale_indicator(&ctx.value("short_sale_indicator"))
    } else {
        "UNDI".to_string()
    };
    write_text_element(xml, "ShrtSellgInd", &short_sale)?;

    let financing = if ctx.is_mapped("securities_financing_indicator") {
        ctx.value("securities_financing_indicator")
    } else {
        "false".to_string()
    };
    write_text_element(xml, "SctiesFincgTxInd", &financing)?;
    end_element(xml, "AddtlAttrbts")
}

/// Which counterparty side is being written. The two sides are mirror
/// images apart from field names and the taker/maker pairing rule.
#[derive(Clone, Copy)]
enum Side {
    Buyer,
    Seller,
}

impl Side {
    fn wrapper(self) -> &'static str {
        match self {
            Side::Buyer => "Buyr",
            Side::Seller => "Sellr",
        }
    }

    fn sentinel(self) -> &'static str {
        match self {
            Side::Buyer => BUYER_SENTINEL,
            Side::Seller => SELLER_SENTINEL,
        }
    }

    fn field(self, suffix: &str) -> String {
        match self {
            Side::Buyer => format!("buyer_{suffix}"),
            Side::Seller => format!("seller_{suffix}"),
        }
    }

    fn default_name(self) -> &'static str {
        match self {
            Side::Buyer => "Counterparty Buyer",
            Side::Seller => "Counterparty Seller",
        }
    }
}

fn write_buyer(xml: &mut Xml, ctx: &RowContext<'_>) -> Result<()> {
    write_counterparty(xml, ctx, Side::Buyer)
}

fn write_seller(xml: &mut Xml, ctx: &RowContext<'_>) -> Result<()> {
    write_counterparty(xml, ctx, Side::Seller)
}

/// Resolves a counterparty identifier: direct mapping first, then the
/// taker/maker pairing driven by the side column, then the sentinel.
/// The taker is the buyer exactly when the side column reads "buy".
fn resolve_counterparty(ctx: &RowContext<'_>, side: Side) -> String {
    let direct = ctx.value(&side.field("lei"));
    if !direct.is_empty() {
        return direct;
    }

    let taker_side = ctx.value("taker_side").to_lowercase();
    let use_taker = match side {
        Side::Buyer => taker_side == "buy",
        Side::Seller => taker_side == "sell",
    };
    let inferred = if use_taker {
        ctx.value("taker_user_id")
    } else {
        ctx.value("maker_user_id")
    };
    if !inferred.is_empty() {
        return inferred;
    }

    side.sentinel().to_string()
}

fn write_counterparty(xml: &mut Xml, ctx: &RowContext<'_>, side: Side) -> Result<()> {
    let identifier = resolve_counterparty(ctx, side);
    let legal_entity = is_lei_format(&identifier);

    start_element(xml, side.wrapper())?;
    start_element(xml, "AcctOwnr")?;
    start_element(xml, "Id")?;

    if legal_entity {
        write_text_element(xml, "LEI", &identifier)?;
    } else {
        write_person(xml, ctx, side)?;
    }
    end_element(xml, "Id")?;

    // Country of branch belongs to the person branch only; a bare LEI
    // never carries it.
    if !legal_entity {
        let country_field = side.field("country");
        if ctx.is_mapped(&country_field) {
            write_text_element(xml, "CtryOfBrnch", &ctx.value(&country_field))?;
        }
    }
    end_element(xml, "AcctOwnr")?;

    // Decision-maker attribution is only for the reporting firm's own
    // side of the trade, never for external counterparties.
    if legal_entity && ctx.firm_lei() == Some(identifier.as_str()) {
        write_decision_maker(xml, ctx, side)?;
    }

    end_element(xml, side.wrapper())
}

fn write_person(xml: &mut Xml, ctx: &RowContext<'_>, side: Side) -> Result<()> {
    start_element(xml, "Prsn")?;

    let first_name_field = side.field("first_name");
    if ctx.is_mapped(&first_name_field) {
        write_text_element(xml, "FrstNm", &ctx.value(&first_name_field))?;
    }

    let last_name_field = side.field("last_name");
    if ctx.is_mapped(&last_name_field) {
        write_text_element(xml, "Nm", &ctx.value(&last_name_field))?;
    } else {
        write_text_element(xml, "Nm", side.default_name())?;
    }

    let birth_field = side.field("birth_date");
    if ctx.is_mapped(&birth_field) {
        write_text_element(xml, "BirthDt", &date_only(&ctx.value(&birth_field)))?;
    }

    start_element(xml, "Othr")?;
    let national_id_field = side.field("national_id");
    if ctx.is_mapped(&national_id_field) {
        write_text_element(xml, "Id", &ctx.value(&national_id_field))?;
        start_element(xml, "SchmeNm")?;
        write_text_element(xml, "Cd", "NIDN")?;
        end_element(xml, "SchmeNm")?;
    } else {
        write_text_element(xml, "Id", "UNKNOWN_ID")?;
        start_element(xml, "SchmeNm")?;
        write_text_element(xml, "Cd", "NOID")?;
        end_element(xml, "SchmeNm")?;
    }
    end_element(xml, "Othr")?;

    end_element(xml, "Prsn")
}

fn write_decision_maker(xml: &mut Xml, ctx: &RowContext<'_>, side: Side) -> Result<()> {
    let (wrapper, person_field, algo_field) = match side {
        Side::Buyer => ("DcsnMakr", "investment_decision_person", "investment_decision_algo"),
        Side::Seller => ("ExctnWthnFirm", "execution_decision_person", "execution_decision_algo"),
    };

    let has_person = ctx.is_mapped(person_field);
    let has_algo = ctx.is_mapped(algo_field);
    if !has_person && !has_algo {
        return Ok(());
    }

    start_element(xml, wrapper)?;
    if has_person {
        start_element(xml, "Prsn")?;
        write_text_element(xml, "Id", &ctx.value(person_field))?;
        end_element(xml, "Prsn")?;
    } else {
        start_element(xml, "Algo")?;
        write_text_element(xml, "Id", &ctx.value(algo_field))?;
        end_element(xml, "Algo")?;
    }
    end_element(xml, wrapper)
}

/// Appends custom fields in category order. A value that fails its
/// declared type is treated as absent; required fields with a declared
/// default fall back to it.
fn write_custom_fields(xml: &mut Xml, ctx: &RowContext<'_>) -> Result<()> {
    for field in ctx.registry.in_emission_order() {
        if !ctx.is_mapped(&field.name) {
            continue;
        }
        let value = ctx.value(&field.name);
        let valid = CustomFieldRegistry::validate_value(field, &value).is_ok();
        if valid && !value.is_empty() {
            write_text_element(xml, &field.xml_element_name, &value)?;
        } else if field.is_required() && value.is_empty() && !field.default_value.is_empty() {
            write_text_element(xml, &field.xml_element_name, &field.default_value)?;
        } else if !valid {
            debug!(field = %field.name, "custom value failed type validation; omitted");
        }
    }
    Ok(())
}
