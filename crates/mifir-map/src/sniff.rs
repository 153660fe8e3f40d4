//! Content-shape recognizers for sample values.
//!
//! These are best-effort classifiers, not validators: any 20-character
//! alphanumeric identifier passes the LEI shape test, not only real
//! LEIs. Downstream consumers treat every hit as advisory.

use std::sync::LazyLock;

use regex::Regex;

/// LEI shape: 18 alphanumerics followed by 2 check digits.
static LEI_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z0-9]{18}[0-9]{2}$").expect("lei regex"));

/// ISIN shape: 2-letter country prefix, 9 alphanumerics, 1 check digit.
static ISIN_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z]{2}[A-Z0-9]{9}[0-9]$").expect("isin regex"));

/// Embedded time token, e.g. `22:23`.
static TIME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}:\d{1,2}").expect("time regex"));

/// Boolean-ish token.
static BOOLEAN_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(true|false|0|1|y|n|yes|no)$").expect("boolean regex"));

pub fn is_lei_shaped(value: &str) -> bool {
    LEI_SHAPE.is_match(value)
}

pub fn is_isin_shaped(value: &str) -> bool {
    ISIN_SHAPE.is_match(value)
}

pub fn is_boolean_token(value: &str) -> bool {
    BOOLEAN_TOKEN.is_match(value)
}

/// True when any sample has the LEI shape.
pub fn any_lei_shaped(samples: &[String]) -> bool {
    samples.iter().any(|s| is_lei_shaped(s))
}

/// True when any sample has the ISIN shape.
pub fn any_isin_shaped(samples: &[String]) -> bool {
    samples.iter().any(|s| is_isin_shaped(s))
}

/// True when any sample contains a time token.
pub fn has_time_token(samples: &[String]) -> bool {
    samples.iter().any(|s| TIME_TOKEN.is_match(s))
}

/// True when every sample is a boolean-ish token.
pub fn all_boolean(samples: &[String]) -> bool {
    !samples.is_empty() && samples.iter().all(|s| is_boolean_token(s))
}

/// Mean of the numerically parseable samples, if any parse.
pub fn numeric_mean(samples: &[String]) -> Option<f64> {
    let values: Vec<f64> = samples.iter().filter_map(|s| s.parse::<f64>().ok()).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Price-like: mean of parseable samples in (1, 1,000,000).
pub fn looks_like_price(samples: &[String]) -> bool {
    numeric_mean(samples).is_some_and(|mean| mean > 1.0 && mean < 1_000_000.0)
}

/// Quantity-like: mean of parseable samples in (0, 100].
pub fn looks_like_quantity(samples: &[String]) -> bool {
    numeric_mean(samples).is_some_and(|mean| mean > 0.0 && mean <= 100.0)
}
