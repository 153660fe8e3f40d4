//! Confidence scoring and explanation text for resolver proposals.

use rapidfuzz::distance::indel::normalized_similarity;

use crate::patterns::synonym_patterns;
use crate::sniff;

/// Weight of the name-similarity component.
const NAME_WEIGHT: f32 = 0.6;
/// Weight of the content-confidence component.
const CONTENT_WEIGHT: f32 = 0.4;

/// Confidence below this reads as low; at or above 0.8 as high.
const MEDIUM_THRESHOLD: f32 = 0.6;
const HIGH_THRESHOLD: f32 = 0.8;

/// Fuzzy similarity of two lowercased names, in `[0, 1]`.
pub fn name_ratio(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    normalized_similarity(a.chars(), b.chars())
}

/// Name-similarity component: best synonym ratio when the field has a
/// synonym list, direct field-to-column ratio otherwise.
pub fn name_similarity(field: &str, column: &str) -> f32 {
    if let Some(patterns) = synonym_patterns(field) {
        return patterns
            .iter()
            .map(|pattern| name_ratio(pattern, column))
            .fold(0.0_f64, f64::max) as f32;
    }
    name_ratio(field, column) as f32
}

/// Content-confidence component, judged from sample values per field
/// family. Columns with no usable samples score zero.
pub fn content_confidence(field: &str, samples: &[String]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    match field {
        "buyer_lei" | "seller_lei" | "reporting_party_lei" => {
            if sniff::any_lei_shaped(samples) {
                1.0
            } else if samples.iter().all(|s| s.chars().all(|c| c.is_ascii_digit())) {
                // Internal numeric IDs that still need LEI substitution.
                0.7
            } else {
                0.5
            }
        }
        "instrument_isin" => {
            if sniff::any_isin_shaped(samples) {
                1.0
            } else if samples.iter().all(|s| s.contains('_') || s.len() > 3) {
                // Venue tickers such as BTC_USD.
                0.8
            } else {
                0.5
            }
        }
        "execution_datetime" | "trade_datetime" => {
            if sniff::has_time_token(samples) {
                0.9
            } else if samples.iter().any(|s| s.contains('T') && s.contains('Z')) {
                1.0
            } else {
                0.5
            }
        }
        "price_amount" => {
            if sniff::looks_like_price(samples) {
                0.9
            } else {
                0.5
            }
        }
        "quantity" => {
            if sniff::looks_like_quantity(samples) {
                0.9
            } else {
                0.5
            }
        }
        _ => 0.5,
    }
}

/// Weighted confidence score for a proposed field-to-column assignment.
pub fn confidence(field: &str, column: &str, samples: &[String]) -> f32 {
    NAME_WEIGHT * name_similarity(field, column) + CONTENT_WEIGHT * content_confidence(field, samples)
}

fn tier(score: f32) -> &'static str {
    if score >= HIGH_THRESHOLD {
        "high"
    } else if score >= MEDIUM_THRESHOLD {
        "medium"
    } else {
        "low"
    }
}

/// One-line explanation of why a field maps to a column: confidence
/// tier, the synonym that matched (if any), a short sample preview, and
/// a data-quality warning where the samples clearly need substitution.
pub fn explanation(field: &str, column: &str, samples: &[String], score: f32) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(patterns) = synonym_patterns(field) {
        let column_lower = column.to_lowercase();
        if let Some(hit) = patterns.iter().find(|p| column_lower.contains(&p.to_lowercase())) {
            parts.push(format!("name contains '{hit}'"));
        }
    }

    let preview: Vec<&str> = samples.iter().take(3).map(String::as_str).collect();
    if !preview.is_empty() {
        parts.push(format!("sample values: {}", preview.join(", ")));

        match field {
            "buyer_lei" | "seller_lei"
                if preview.iter().all(|s| s.chars().all(|c| c.is_ascii_digit())) =>
            {
                parts.push("warning: contains internal IDs, replace with LEIs".to_string());
            }
            "instrument_isin" if preview.iter().any(|s| s.contains('_')) => {
                parts.push("warning: contains venue ticker, replace with DSB ISIN".to_string());
            }
            "execution_datetime" | "trade_datetime"
                if preview.iter().any(|s| s.contains(':')) =>
            {
                parts.push("warning: partial timestamp, needs full UTC format".to_string());
            }
            _ => {}
        }
    }

    format!("{} confidence: {}", tier(score), parts.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn synonym_fields_score_against_their_patterns() {
        // "price" vs "price" is a perfect synonym hit.
        assert!((name_similarity("price_amount", "price") - 1.0).abs() < 1e-6);
        // Direct comparison for fields without synonym lists.
        assert!(name_similarity("price_currency", "price_currency") > 0.99);
    }

    #[test]
    fn lei_samples_score_full_content_confidence() {
        let samples = strings(&["2138001ME4Z9Z8DZNS52"]);
        assert!((content_confidence("buyer_lei", &samples) - 1.0).abs() < 1e-6);
        let digits = strings(&["1001", "1002"]);
        assert!((content_confidence("buyer_lei", &digits) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn datetime_time_token_beats_iso_branch() {
        let samples = strings(&["2025-08-19T22:23:00Z"]);
        // Full ISO stamps still carry a time token, which wins first.
        assert!((content_confidence("execution_datetime", &samples) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn empty_samples_score_zero_content() {
        assert_eq!(content_confidence("quantity", &[]), 0.0);
    }

    #[test]
    fn explanation_carries_tier_synonym_and_warning() {
        let samples = strings(&["1001", "1002"]);
        let score = confidence("buyer_lei", "maker_user_id", &samples);
        let text = explanation("buyer_lei", "maker_user_id", &samples, score);
        assert!(text.starts_with("high confidence") || text.starts_with("medium confidence"));
        assert!(text.contains("name contains 'maker_user'"));
        assert!(text.contains("sample values: 1001, 1002"));
        assert!(text.contains("replace with LEIs"));
    }

    #[test]
    fn partial_timestamp_gets_utc_warning() {
        let samples = strings(&["22:23.3"]);
        let text = explanation("execution_datetime", "Time", &samples, 0.7);
        assert!(text.contains("needs full UTC format"));
    }
}
