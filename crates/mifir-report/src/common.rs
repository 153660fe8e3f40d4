//! Shared envelope construction and value resolution for both
//! assemblers.

use anyhow::Result;
use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use mifir_model::{Constants, Mapping, MappingTarget, RowView};

/// BizData envelope namespace.
pub const ENVELOPE_NS: &str = "urn:iso:std:iso:20022:tech:xsd:head.003.001.01";

/// Business application header namespace.
pub const APP_HDR_NS: &str = "urn:iso:std:iso:20022:tech:xsd:head.001.001.01";

/// Transaction-report document namespace.
pub const DOCUMENT_NS: &str = "urn:iso:std:iso:20022:tech:xsd:auth.016.001.01";

/// XML Schema instance namespace.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

pub const ENVELOPE_SCHEMA_LOCATION: &str =
    "urn:iso:std:iso:20022:tech:xsd:head.003.001.01 head.003.001.01.xsd";
pub const APP_HDR_SCHEMA_LOCATION: &str =
    "urn:iso:std:iso:20022:tech:xsd:head.001.001.01 head.001.001.01_ESMAUG_1.0.0.xsd";
pub const DOCUMENT_SCHEMA_LOCATION: &str =
    "urn:iso:std:iso:20022:tech:xsd:auth.016.001.01 auth.016.001.01_ESMAUG_Reporting_1.1.0.xsd";

/// Message definition identifier, fixed for RTS 22 transaction reports.
pub const MSG_DEF_IDR: &str = "auth.016.001.01";

/// Output writer used by the assemblers.
pub type Xml = Writer<Vec<u8>>;

/// Header defaults distinguishing the two assemblers.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeProfile {
    pub default_from: &'static str,
    pub default_to: &'static str,
    pub message_id_prefix: &'static str,
}

/// Header defaults for the primary transaction report.
pub const REPORT_PROFILE: EnvelopeProfile = EnvelopeProfile {
    default_from: "KD",
    default_to: "CY",
    message_id_prefix: "KD_DATTRA_generated_",
};

/// Header defaults for the custom-fields-only report.
pub const CUSTOM_ONLY_PROFILE: EnvelopeProfile = EnvelopeProfile {
    default_from: "CUSTOM",
    default_to: "CUSTOM",
    message_id_prefix: "CUSTOM_FIELDS_",
};

pub fn write_text_element(xml: &mut Xml, name: &str, text: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub fn start_element(xml: &mut Xml, name: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

pub fn end_element(xml: &mut Xml, name: &str) -> Result<()> {
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Opens the BizData envelope: prolog, header block, and the payload
/// chain down to the open report container. Callers emit one `Tx` per
/// row and then call [`close_envelope`].
pub fn open_envelope(
    xml: &mut Xml,
    profile: &EnvelopeProfile,
    constants: &Constants,
    now: DateTime<Utc>,
) -> Result<()> {
    xml.write_event(Event::Decl(quick_xml::events::BytesDecl::new(
        "1.0",
        Some("UTF-8"),
        None,
    )))?;

    let mut root = BytesStart::new("BizData");
    root.push_attribute(("xmlns", ENVELOPE_NS));
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("xsi:schemaLocation", ENVELOPE_SCHEMA_LOCATION));
    xml.write_event(Event::Start(root))?;

    write_header(xml, profile, constants, now)?;

    start_element(xml, "Pyld")?;
    let mut document = BytesStart::new("Document");
    document.push_attribute(("xmlns", DOCUMENT_NS));
    document.push_attribute(("xmlns:xsi", XSI_NS));
    document.push_attribute(("xsi:schemaLocation", DOCUMENT_SCHEMA_LOCATION));
    xml.write_event(Event::Start(document))?;
    start_element(xml, "FinInstrmRptgTxRpt")?;
    Ok(())
}

pub fn close_envelope(xml: &mut Xml) -> Result<()> {
    end_element(xml, "FinInstrmRptgTxRpt")?;
    end_element(xml, "Document")?;
    end_element(xml, "Pyld")?;
    end_element(xml, "BizData")?;
    Ok(())
}

fn write_header(
    xml: &mut Xml,
    profile: &EnvelopeProfile,
    constants: &Constants,
    now: DateTime<Utc>,
) -> Result<()> {
    start_element(xml, "Hdr")?;
    let mut app_hdr = BytesStart::new("AppHdr");
    app_hdr.push_attribute(("xmlns", APP_HDR_NS));
    app_hdr.push_attribute(("xmlns:xsi", XSI_NS));
    app_hdr.push_attribute(("xsi:schemaLocation", APP_HDR_SCHEMA_LOCATION));
    xml.write_event(Event::Start(app_hdr))?;

    write_party(
        xml,
        "Fr",
        constants.get("from_org_id").unwrap_or(profile.default_from),
    )?;
    write_party(
        xml,
        "To",
        constants.get("to_org_id").unwrap_or(profile.default_to),
    )?;

    let message_id = constants
        .get("biz_msg_id")
        .map(str::to_string)
        .unwrap_or_else(|| {
            format!(
                "{}{}",
                profile.message_id_prefix,
                now.format("%Y%m%d_%H%M%S")
            )
        });
    write_text_element(xml, "BizMsgIdr", &message_id)?;
    write_text_element(xml, "MsgDefIdr", MSG_DEF_IDR)?;

    let creation = constants
        .get("creation_date")
        .map(str::to_string)
        .unwrap_or_else(|| now.format("%Y-%m-%dT%H:%M:%SZ").to_string());
    write_text_element(xml, "CreDt", &creation)?;

    end_element(xml, "AppHdr")?;
    end_element(xml, "Hdr")?;
    Ok(())
}

/// Organisation identification chain used for both header parties.
fn write_party(xml: &mut Xml, wrapper: &str, org_id: &str) -> Result<()> {
    start_element(xml, wrapper)?;
    start_element(xml, "OrgId")?;
    start_element(xml, "Id")?;
    start_element(xml, "OrgId")?;
    start_element(xml, "Othr")?;
    write_text_element(xml, "Id", org_id)?;
    end_element(xml, "Othr")?;
    end_element(xml, "OrgId")?;
    end_element(xml, "Id")?;
    end_element(xml, "OrgId")?;
    end_element(xml, wrapper)?;
    Ok(())
}

/// Resolves a field through the mapping: dataset column, constants
/// table, or empty for unset. Missing columns and blank cells resolve
/// empty; the assemblers substitute defaults downstream.
pub fn mapped_value(
    row: &RowView<'_>,
    mapping: &Mapping,
    constants: &Constants,
    field: &str,
) -> String {
    match mapping.target(field) {
        MappingTarget::Unset => String::new(),
        MappingTarget::Constant => constants
            .get(field)
            .map(str::to_string)
            .unwrap_or_default(),
        MappingTarget::Column(column) => row.value(&column),
    }
}
