//! Three-pass mapping resolver.
//!
//! Pass 1 matches column names against per-field synonym lists. Pass 2
//! assigns still-unclaimed columns by content shape. Pass 3 applies
//! relational rules across fields; it may overwrite earlier passes,
//! since a consistent counterparty pairing beats two independent name
//! hits.

use mifir_model::{Constants, Dataset, FieldCatalog};
use tracing::debug;

use crate::patterns::{
    MAKER_COLUMN_TOKENS, SIDE_COLUMN_TOKENS, SYMBOL_COLUMN_TOKENS, TAKER_COLUMN_TOKENS,
    synonym_patterns,
};
use crate::score;
use crate::sniff;
use crate::types::SuggestionSet;

/// Fuzzy-match floor for pass-1 name matching.
const NAME_MATCH_THRESHOLD: f64 = 0.6;

/// Sample values inspected per column.
const SAMPLE_LIMIT: usize = 5;

/// Heuristic resolver from dataset columns to catalog fields.
pub struct MappingResolver<'a> {
    catalog: &'a FieldCatalog,
    columns: Vec<String>,
    samples: Vec<(String, Vec<String>)>,
}

impl<'a> MappingResolver<'a> {
    pub fn new(catalog: &'a FieldCatalog, dataset: &Dataset) -> Self {
        let samples = dataset.column_samples(SAMPLE_LIMIT);
        let columns = samples.iter().map(|(column, _)| column.clone()).collect();
        Self {
            catalog,
            columns,
            samples,
        }
    }

    /// Runs all three passes and scores the surviving assignments.
    pub fn suggest(&self) -> SuggestionSet {
        let mut set = SuggestionSet::new();
        self.match_by_name(&mut set);
        self.match_by_content(&mut set);
        self.apply_relationships(&mut set);

        let fields: Vec<String> = set.iter().map(|(f, _)| f.to_string()).collect();
        for field in fields {
            let Some(column) = set.column(&field).map(str::to_string) else {
                continue;
            };
            let samples = self.samples_for(&column);
            let score = score::confidence(&field, &column, samples);
            set.set_confidence(&field, score);
            set.set_explanation(&field, score::explanation(&field, &column, samples, score));
        }
        set
    }

    /// Pass 1: synonym substring containment, then fuzzy similarity.
    fn match_by_name(&self, set: &mut SuggestionSet) {
        for field in self.catalog.fields() {
            let Some(patterns) = synonym_patterns(&field.name) else {
                continue;
            };

            let substring_hit = patterns.iter().find_map(|pattern| {
                let pattern = pattern.to_lowercase();
                self.columns
                    .iter()
                    .find(|column| column.to_lowercase().contains(&pattern))
            });
            if let Some(column) = substring_hit {
                debug!(field = %field.name, column = %column, "name substring match");
                set.assign(&field.name, column);
                continue;
            }

            let mut best: Option<(&str, f64)> = None;
            for pattern in patterns {
                for column in &self.columns {
                    let ratio = score::name_ratio(pattern, column);
                    if ratio > NAME_MATCH_THRESHOLD
                        && best.is_none_or(|(_, best_ratio)| ratio > best_ratio)
                    {
                        best = Some((column, ratio));
                    }
                }
            }
            if let Some((column, ratio)) = best {
                debug!(field = %field.name, column, ratio, "fuzzy name match");
                set.assign(&field.name, column);
            }
        }
    }

    /// Pass 2: claim leftover columns by the shape of their values.
    fn match_by_content(&self, set: &mut SuggestionSet) {
        for (column, samples) in &self.samples {
            if samples.is_empty() || set.uses_column(column) {
                continue;
            }

            if sniff::any_lei_shaped(samples) {
                for field in ["buyer_lei", "seller_lei"] {
                    if !set.has_field(field) {
                        debug!(field, column = %column, "LEI-shaped content match");
                        set.assign(field, column);
                        break;
                    }
                }
            } else if sniff::any_isin_shaped(samples) {
                if !set.has_field("instrument_isin") {
                    debug!(column = %column, "ISIN-shaped content match");
                    set.assign("instrument_isin", column);
                }
            } else if sniff::has_time_token(samples) {
                for field in ["execution_datetime", "trade_datetime"] {
                    if !set.has_field(field) {
                        debug!(field, column = %column, "time-token content match");
                        set.assign(field, column);
                        break;
                    }
                }
            } else if sniff::looks_like_price(samples) {
                if !set.has_field("price_amount") {
                    set.assign("price_amount", column);
                }
            } else if sniff::looks_like_quantity(samples) {
                if !set.has_field("quantity") {
                    set.assign("quantity", column);
                }
            } else if sniff::all_boolean(samples)
                && !set.has_field("clearing_indicator")
                && column.to_lowercase().contains("clear")
            {
                set.assign("clearing_indicator", column);
            }
        }
    }

    /// Pass 3: cross-field rules. A lone execution timestamp also serves
    /// as the trade timestamp, and taker/maker party columns resolve to
    /// buyer/seller from the side column's vocabulary.
    fn apply_relationships(&self, set: &mut SuggestionSet) {
        if let Some(timestamp) = set.column("execution_datetime").map(str::to_string)
            && !set.has_field("trade_datetime")
        {
            set.assign("trade_datetime", &timestamp);
        }

        let taker = self.find_column_containing(&TAKER_COLUMN_TOKENS);
        let maker = self.find_column_containing(&MAKER_COLUMN_TOKENS);
        let side = self.find_column_containing(&SIDE_COLUMN_TOKENS);
        let (Some(taker), Some(maker), Some(side)) = (taker, maker, side) else {
            return;
        };

        let side_samples = self.samples_for(&side);
        let taker_buys = side_samples
            .iter()
            .any(|sample| sample.to_lowercase().contains("buy"));
        if taker_buys {
            debug!(%taker, %maker, "side column names the taker's direction");
            set.assign("buyer_lei", &taker);
            set.assign("seller_lei", &maker);
        } else {
            set.assign("buyer_lei", &maker);
            set.assign("seller_lei", &taker);
        }
    }

    /// Suggests constant values worth pre-seeding: fixed defaults for
    /// OTC crypto-derivative reporting plus an ISIN placeholder derived
    /// from the symbol column.
    pub fn suggest_constants(&self) -> Constants {
        let mut constants = Constants::new();
        for (key, value) in [
            ("reporting_party_lei", "YOUR_FIRM_LEI_HERE"),
            ("instrument_isin", "DSB_ISIN_FOR_DERIVATIVE"),
            ("instrument_cfi", "FXXXXX"),
            ("trading_venue", "XOFF"),
            ("trading_capacity", "PRIN"),
            ("price_currency", "USD"),
            ("short_sale_indicator", "NSHO"),
            ("commodity_derivative_indicator", "N"),
            ("clearing_indicator", "N"),
            ("securities_financing_indicator", "N"),
        ] {
            constants.set(key, value);
        }

        if let Some(symbol_column) = self.find_column_containing(&SYMBOL_COLUMN_TOKENS) {
            let symbols = self.samples_for(&symbol_column);
            match symbols.len() {
                1 => {
                    constants.set(
                        "instrument_isin",
                        &format!("DSB_ISIN_FOR_{}", symbols[0].to_uppercase()),
                    );
                }
                2..=5 => {
                    constants.set(
                        "instrument_isin",
                        &format!("MULTIPLE_INSTRUMENTS_DETECTED_{}", symbols.len()),
                    );
                }
                _ => {}
            }
        }
        constants
    }

    fn samples_for(&self, column: &str) -> &[String] {
        self.samples
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, samples)| samples.as_slice())
            .unwrap_or_default()
    }

    fn find_column_containing(&self, tokens: &[&str]) -> Option<String> {
        for token in tokens {
            for column in &self.columns {
                if column.to_lowercase().contains(token) {
                    return Some(column.clone());
                }
            }
        }
        None
    }
}
