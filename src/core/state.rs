//! Linked base/quote amounts and their transitions
//!
//! One amount is always what the user typed; the other is derived from it
//! and the current rate. Derived amounts are rounded half away from zero to
//! three decimals and always printed with three fractional digits.

use super::catalog::{CurrencyCode, CurrencyPair};

pub const NEUTRAL_AMOUNT: &str = "0";

/// Rounds to three decimals, half away from zero.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub fn format_amount(value: f64) -> String {
    let rounded = round3(value);
    // normalize -0.0
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.3}")
}

/// Text for a derived amount, or `None` when the value cannot be written as
/// a finite decimal at three digits.
fn derived_amount(value: f64) -> Option<String> {
    round3(value).is_finite().then(|| format_amount(value))
}

/// Parses an amount typed by the user.
///
/// Surrounding whitespace is ignored and the Rust float grammar applies, so
/// `"12."` and `".5"` are numbers. Empty and non-finite input is not.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionState {
    base_code: CurrencyCode,
    quote_code: CurrencyCode,
    base_amount: String,
    quote_amount: String,
    rate: Option<f64>,
    loading: bool,
}

impl ConversionState {
    pub fn new(base_code: CurrencyCode, quote_code: CurrencyCode) -> Self {
        Self {
            base_code,
            quote_code,
            base_amount: NEUTRAL_AMOUNT.to_string(),
            quote_amount: NEUTRAL_AMOUNT.to_string(),
            rate: None,
            loading: false,
        }
    }

    pub fn base_code(&self) -> &CurrencyCode {
        &self.base_code
    }

    pub fn quote_code(&self) -> &CurrencyCode {
        &self.quote_code
    }

    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.base_code.clone(), self.quote_code.clone())
    }

    pub fn base_amount(&self) -> &str {
        &self.base_amount
    }

    pub fn quote_amount(&self) -> &str {
        &self.quote_amount
    }

    pub fn rate(&self) -> Option<f64> {
        self.rate
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub(crate) fn set_base_code(&mut self, code: CurrencyCode) {
        self.base_code = code;
    }

    pub(crate) fn set_quote_code(&mut self, code: CurrencyCode) {
        self.quote_code = code;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Adopts a freshly fetched rate and resets the amounts to one base unit.
    pub(crate) fn apply_rate(&mut self, rate: f64) {
        self.rate = Some(rate);
        self.base_amount = "1".to_string();
        self.quote_amount = derived_amount(rate).unwrap_or_default();
        self.loading = false;
    }

    pub fn edit_base_amount(&mut self, raw: &str) {
        self.base_amount = raw.to_string();
        let Some(amount) = parse_amount(raw) else {
            self.quote_amount.clear();
            return;
        };
        if let Some(rate) = self.rate {
            // Out-of-range results count as non-numeric input.
            self.quote_amount = derived_amount(amount * rate).unwrap_or_default();
        }
    }

    pub fn edit_quote_amount(&mut self, raw: &str) {
        self.quote_amount = raw.to_string();
        let Some(amount) = parse_amount(raw) else {
            self.base_amount.clear();
            return;
        };
        if let Some(rate) = self.rate {
            self.base_amount = derived_amount(amount / rate).unwrap_or_default();
        }
    }
}
