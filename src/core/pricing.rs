//! Explicit pricing context threaded through conversion and display

use super::config::AppConfig;
use super::converter::{apply_regional_markup, convert};
use super::currency::CurrencyCode;
use super::format::{SymbolTable, ZeroDecimalSet, format_price};
use super::rates::RateTable;

/// Everything needed to price an amount for one visitor.
///
/// Markup is applied to the source amount before conversion, and rounding
/// only happens once, when the converted amount is formatted.
#[derive(Debug, Clone)]
pub struct PricingContext {
    pub rates: RateTable,
    pub zero_decimal: ZeroDecimalSet,
    pub symbols: SymbolTable,
    pub markup_factor: f64,
    pub is_domestic: bool,
    /// Append the ISO code after the formatted price, e.g. "$20.00 USD".
    pub show_code: bool,
}

impl PricingContext {
    pub fn new(rates: RateTable) -> Self {
        Self {
            rates,
            zero_decimal: ZeroDecimalSet::default(),
            symbols: SymbolTable::default(),
            markup_factor: 1.0,
            is_domestic: true,
            show_code: false,
        }
    }

    pub fn from_config(config: &AppConfig, rates: RateTable, is_domestic: bool) -> Self {
        Self {
            rates,
            zero_decimal: config.zero_decimal_currencies.clone(),
            symbols: SymbolTable::default(),
            markup_factor: config.markup.factor,
            is_domestic,
            show_code: config.show_currency_code,
        }
    }

    /// Whether this visitor pays a markup on top of the converted price.
    pub fn applies_markup(&self) -> bool {
        !self.is_domestic
            && self.markup_factor.is_finite()
            && self.markup_factor > 0.0
            && self.markup_factor != 1.0
    }

    /// Marked-up and converted amount, unrounded.
    pub fn price(&self, amount: f64, from: &CurrencyCode, to: &CurrencyCode) -> f64 {
        let marked_up = apply_regional_markup(amount, self.is_domestic, self.markup_factor);
        convert(marked_up, from, to, &self.rates)
    }

    pub fn format(&self, amount: f64, currency: &CurrencyCode) -> String {
        let formatted = format_price(amount, currency, &self.zero_decimal, &self.symbols);
        if self.show_code {
            format!("{formatted} {currency}")
        } else {
            formatted
        }
    }

    pub fn display(&self, amount: f64, from: &CurrencyCode, to: &CurrencyCode) -> String {
        self.format(self.price(amount, from, to), to)
    }
}
