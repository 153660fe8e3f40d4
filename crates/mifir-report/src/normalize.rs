//! Value normalization and enumeration coercions.
//!
//! These are the graceful-degradation rules of the assembler: malformed
//! or legacy inputs are reshaped into schema-admissible values, never
//! rejected.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sha2::{Digest, Sha256};

/// Placeholder emitted when no buyer identifier resolves.
pub const BUYER_SENTINEL: &str = "BUYER_LEI_HERE";

/// Placeholder emitted when no seller identifier resolves.
pub const SELLER_SENTINEL: &str = "SELLER_LEI_HERE";

/// Placeholder emitted when the reporting firm's LEI is unconfigured.
pub const FIRM_SENTINEL: &str = "YOUR_FIRM_LEI_HERE";

/// LEI shape test for branch selection: exactly 20 alphanumerics, and
/// not one of the known placeholder sentinels.
pub fn is_lei_format(identifier: &str) -> bool {
    if matches!(identifier, BUYER_SENTINEL | SELLER_SENTINEL | FIRM_SENTINEL) {
        return false;
    }
    identifier.len() == 20 && identifier.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Normalizes a mapped transaction identifier to `[A-Z0-9]{1,52}`.
///
/// Non-alphanumerics are stripped after uppercasing; a value that
/// strips to nothing gets a fixed fallback identifier.
pub fn clean_transaction_id(raw: &str) -> String {
    let cleaned: String = raw
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(52)
        .collect();
    if cleaned.is_empty() {
        "AUTOTXN001".to_string()
    } else {
        cleaned
    }
}

/// Synthesizes a transaction identifier from the wall clock and a hash
/// of the row content, keeping repeated rows in one batch distinct.
pub fn synthesize_transaction_id(now: DateTime<Utc>, row_fingerprint: &str) -> String {
    let digest = Sha256::digest(row_fingerprint.as_bytes());
    let bucket =
        u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) % 1000;
    let id = format!("AUTOTXN{}{bucket:03}", now.format("%Y%m%d%H%M%S"));
    id.chars().take(52).collect()
}

/// Full UTC timestamp with milliseconds, used for unmapped datetimes.
pub fn current_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Best-effort timestamp normalization, not a full parser.
///
/// Values already carrying a date separator and UTC marker pass through
/// unchanged. Bare time fragments (a colon, under 15 characters, as
/// exchange exports often truncate to `22:23.3`) get today's date
/// spliced in front and zero seconds appended. Anything else passes
/// through as-is for the reviewer to catch.
pub fn normalize_datetime(raw: &str, now: DateTime<Utc>) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return current_timestamp(now);
    }
    if value.contains('T') && value.contains('Z') {
        return value.to_string();
    }
    if value.contains(':') && value.len() < 15 {
        return format!("{}T{value}:00.000Z", now.format("%Y-%m-%d"));
    }
    value.to_string()
}

/// Reduces a birth-date value to a calendar date (`YYYY-MM-DD`),
/// stripping any time component. Falls back to cutting at the first
/// space when no supported format parses.
pub fn date_only(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return String::new();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed.date_naive().format("%Y-%m-%d").to_string();
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return parsed.date().format("%Y-%m-%d").to_string();
        }
    }
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        return value.to_string();
    }
    match value.split_once(' ') {
        Some((date, _)) => date.to_string(),
        None => value.to_string(),
    }
}

/// Coerces a trading-capacity value into {DEAL, MTCH, AOTC}.
///
/// Legacy inputs such as buy/sell/principal collapse into AOTC, as does
/// anything unrecognized.
pub fn coerce_trading_capacity(raw: &str) -> String {
    let lower = raw.to_lowercase();
    if matches!(lower.as_str(), "buy" | "sell" | "prin" | "principal") {
        return "AOTC".to_string();
    }
    let upper = raw.to_uppercase();
    if matches!(upper.as_str(), "DEAL" | "MTCH" | "AOTC") {
        return upper;
    }
    "AOTC".to_string()
}

/// Coerces a short-sale value into {SESH, SELL, SSEX, UNDI}.
pub fn coerce_short_sale_indicator(raw: &str) -> String {
    let upper = raw.to_uppercase();
    if matches!(upper.as_str(), "NSHO" | "LONG" | "BUY") {
        return "UNDI".to_string();
    }
    if matches!(raw.to_lowercase().as_str(), "short" | "sell") {
        return "SELL".to_string();
    }
    if matches!(upper.as_str(), "SESH" | "SELL" | "SSEX" | "UNDI") {
        return upper;
    }
    "UNDI".to_string()
}
