//! Display formatting for converted prices

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use super::converter::normalize_amount;
use super::currency::CurrencyCode;

/// Currencies displayed without fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZeroDecimalSet(BTreeSet<CurrencyCode>);

impl ZeroDecimalSet {
    pub fn new(codes: impl IntoIterator<Item = CurrencyCode>) -> Self {
        Self(codes.into_iter().collect())
    }

    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.0.contains(code)
    }

    fn decimal_places(&self, code: &CurrencyCode) -> u32 {
        if self.contains(code) { 0 } else { 2 }
    }
}

impl Default for ZeroDecimalSet {
    fn default() -> Self {
        Self::new(["JPY", "INR"].map(CurrencyCode::known))
    }
}

/// Display symbols keyed by currency code.
#[derive(Debug, Clone)]
pub struct SymbolTable(HashMap<CurrencyCode, String>);

const DEFAULT_SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("INR", "₹"),
    ("CAD", "C$"),
    ("AUD", "A$"),
    ("SGD", "S$"),
    ("NZD", "NZ$"),
    ("CNY", "CN¥"),
];

impl SymbolTable {
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, code: CurrencyCode, symbol: impl Into<String>) {
        self.0.insert(code, symbol.into());
    }

    pub fn symbol(&self, code: &CurrencyCode) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (code, symbol) in DEFAULT_SYMBOLS {
            table.insert(CurrencyCode::known(*code), *symbol);
        }
        table
    }
}

/// Rounds half away from zero and renders exactly `dp` fractional digits.
fn round_to_string(amount: f64, dp: u32) -> String {
    // Parse the shortest round-trip text so 2.675 rounds as written.
    let value = Decimal::from_str(&amount.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(amount));
    match value {
        Some(value) => {
            let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(dp);
            rounded.to_string()
        }
        // Outside Decimal's range; std formatting is close enough there.
        None => format!("{:.*}", dp as usize, amount),
    }
}

/// Formats `amount` for display in `currency`.
///
/// Zero-decimal currencies are rounded to an integer, everything else gets
/// two fractional digits. Rounding is half away from zero. Currencies
/// without a known symbol are prefixed with their code instead.
pub fn format_price(
    amount: f64,
    currency: &CurrencyCode,
    zero_decimal: &ZeroDecimalSet,
    symbols: &SymbolTable,
) -> String {
    let amount = normalize_amount(amount);
    let digits = round_to_string(amount, zero_decimal.decimal_places(currency));
    let prefix = symbols.symbol(currency).unwrap_or(currency.as_str());
    format!("{prefix}{digits}")
}

/// Label for a currency selector option, e.g. "🇺🇸 USD - US Dollar".
pub fn currency_option_label(code: &CurrencyCode) -> String {
    let label = match code.as_str() {
        "USD" => "🇺🇸 USD - US Dollar",
        "EUR" => "🇪🇺 EUR - Euro",
        "GBP" => "🇬🇧 GBP - British Pound",
        "CAD" => "🇨🇦 CAD - Canadian Dollar",
        "AUD" => "🇦🇺 AUD - Australian Dollar",
        "JPY" => "🇯🇵 JPY - Japanese Yen",
        "INR" => "🇮🇳 INR - Indian Rupee",
        "SGD" => "🇸🇬 SGD - Singapore Dollar",
        "NZD" => "🇳🇿 NZD - New Zealand Dollar",
        "CHF" => "🇨🇭 CHF - Swiss Franc",
        "NOK" => "🇳🇴 NOK - Norwegian Krone",
        "SEK" => "🇸🇪 SEK - Swedish Krona",
        "DKK" => "🇩🇰 DKK - Danish Krone",
        other => other,
    };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    fn jpy_only() -> ZeroDecimalSet {
        ZeroDecimalSet::new([code("JPY")])
    }

    #[test]
    fn test_zero_decimal_currency() {
        let symbols = SymbolTable::default();
        assert_eq!(format_price(1234.0, &code("JPY"), &jpy_only(), &symbols), "¥1234");
        assert_eq!(format_price(1234.5, &code("JPY"), &jpy_only(), &symbols), "¥1235");
        assert_eq!(format_price(1234.49, &code("JPY"), &jpy_only(), &symbols), "¥1234");
    }

    #[test]
    fn test_two_decimal_rounding() {
        let symbols = SymbolTable::default();
        let none = ZeroDecimalSet::empty();
        assert_eq!(format_price(19.999, &code("USD"), &none, &symbols), "$20.00");
        assert_eq!(format_price(5.0, &code("EUR"), &none, &symbols), "€5.00");
        assert_eq!(format_price(0.0, &code("GBP"), &none, &symbols), "£0.00");
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        let symbols = SymbolTable::default();
        let none = ZeroDecimalSet::empty();
        assert_eq!(format_price(2.675, &code("USD"), &none, &symbols), "$2.68");
        assert_eq!(format_price(0.125, &code("USD"), &none, &symbols), "$0.13");
        assert_eq!(format_price(2.5, &code("JPY"), &jpy_only(), &symbols), "¥3");
    }

    #[test]
    fn test_unknown_symbol_falls_back_to_code() {
        let symbols = SymbolTable::default();
        let none = ZeroDecimalSet::empty();
        assert_eq!(format_price(5.0, &code("XYZ"), &none, &symbols), "XYZ5.00");
        assert_eq!(
            format_price(5.0, &code("USD"), &none, &SymbolTable::empty()),
            "USD5.00"
        );
    }

    #[test]
    fn test_invalid_amount_renders_as_zero() {
        let symbols = SymbolTable::default();
        let none = ZeroDecimalSet::empty();
        assert_eq!(format_price(-12.0, &code("USD"), &none, &symbols), "$0.00");
        assert_eq!(format_price(f64::NAN, &code("USD"), &none, &symbols), "$0.00");
    }

    #[test]
    fn test_default_zero_decimal_set() {
        let set = ZeroDecimalSet::default();
        assert!(set.contains(&code("JPY")));
        assert!(set.contains(&code("INR")));
        assert!(!set.contains(&code("USD")));
    }

    #[test]
    fn test_currency_option_label() {
        assert_eq!(currency_option_label(&code("EUR")), "🇪🇺 EUR - Euro");
        assert_eq!(currency_option_label(&code("XYZ")), "XYZ");
    }
}
