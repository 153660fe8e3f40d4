//! Synonym dictionaries for name-based field matching.

/// Synonym tokens per target field, checked against dataset column names
/// by substring containment first, then fuzzy similarity.
///
/// Order within each list matters: the first token with a substring hit
/// wins, so more specific tokens come first.
pub fn synonym_patterns(field: &str) -> Option<&'static [&'static str]> {
    let patterns: &[&str] = match field {
        // Transaction core fields
        "transaction_id" => &["trade_id", "tx_id", "transaction", "fill_id", "order_id"],
        "price_amount" => &["price", "amount", "rate", "px"],
        "quantity" => &["quantity", "qty", "size", "volume", "amount"],
        "execution_datetime" => &[
            "timestamp",
            "time",
            "datetime",
            "date",
            "execution",
            "trade_time",
        ],
        "trade_datetime" => &["timestamp", "time", "datetime", "date", "trade_time"],
        // Instrument identification
        "instrument_isin" => &["isin", "instrument", "symbol", "ticker", "product"],
        // Party identification
        "buyer_lei" => &["buyer", "maker_user", "maker_id", "client_id"],
        "seller_lei" => &["seller", "taker_user", "taker_id", "counterparty"],
        // Trading details
        "trading_capacity" => &["capacity", "role", "type"],
        "trading_venue" => &["venue", "exchange", "mic"],
        // Side and position information
        "short_sale_indicator" => &["position", "side", "long_short", "direction"],
        "clearing_indicator" => &["clearing", "cleared", "ccp"],
        // System information
        "tech_record_id" => &["record_id", "system_id", "internal_id"],
        _ => return None,
    };
    Some(patterns)
}

/// Column-name tokens identifying the taker-side party column.
pub const TAKER_COLUMN_TOKENS: [&str; 2] = ["taker_user", "taker_id"];

/// Column-name tokens identifying the maker-side party column.
pub const MAKER_COLUMN_TOKENS: [&str; 2] = ["maker_user", "maker_id"];

/// Column-name tokens identifying the buy/sell side column.
pub const SIDE_COLUMN_TOKENS: [&str; 3] = ["ordertype", "side", "buy_sell"];

/// Column-name tokens identifying an instrument symbol column, used for
/// constant suggestions.
pub const SYMBOL_COLUMN_TOKENS: [&str; 3] = ["symbol", "instrument", "product"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_fields_have_patterns() {
        assert!(synonym_patterns("transaction_id").is_some());
        assert!(synonym_patterns("buyer_lei").is_some());
        assert!(synonym_patterns("settlement_date").is_none());
    }
}
