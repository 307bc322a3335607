//! Currency discovery from a storefront page snapshot
//!
//! A page exposes its currencies in several places: host platform globals,
//! meta tags, the localization form, or just the text of its prices. Each
//! place is a [`Detector`]; a [`DetectorChain`] asks them in order and the
//! first answer wins.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::currency::CurrencyCode;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EnabledCurrency {
    pub iso_code: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HostCurrency {
    pub active: Option<String>,
    pub code: Option<String>,
    /// Rate of `active` per unit of the shop currency.
    pub rate: Option<f64>,
    #[serde(default)]
    pub code_enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HostShop {
    pub currency: Option<String>,
    pub money_format: Option<String>,
    pub enabled_currencies: Option<Vec<EnabledCurrency>>,
}

/// Globals published by the host storefront platform.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HostGlobals {
    pub currency: Option<HostCurrency>,
    pub shop: Option<HostShop>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetaTags {
    /// Comma separated list, e.g. "USD, EUR".
    pub currencies: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LocalizationForm {
    /// Values of the currency inputs and options.
    #[serde(default)]
    pub values: Vec<String>,
    pub selected: Option<String>,
}

/// A price element and the data attributes it carries.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PriceElement {
    pub currency_code: Option<String>,
    pub currency: Option<String>,
    pub price: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub original_price: Option<String>,
    pub original_currency: Option<String>,
    #[serde(default)]
    pub text: String,
}

/// Everything the detectors and the renderer know about a page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorefrontSnapshot {
    #[serde(default)]
    pub host: HostGlobals,
    #[serde(default)]
    pub meta: MetaTags,
    pub localization_form: Option<LocalizationForm>,
    #[serde(default)]
    pub price_elements: Vec<PriceElement>,
}

impl StorefrontSnapshot {
    fn host_currency(&self) -> Option<&HostCurrency> {
        self.host.currency.as_ref()
    }

    fn host_shop(&self) -> Option<&HostShop> {
        self.host.shop.as_ref()
    }

    /// Rate the host platform reports for its active currency.
    pub fn host_rate(&self) -> Option<(CurrencyCode, f64)> {
        let currency = self.host_currency()?;
        let code = parse_code(currency.active.as_deref()?)?;
        let rate = currency.rate.filter(|r| r.is_finite() && *r > 0.0)?;
        Some((code, rate))
    }

    /// Whether the host wants the currency code appended to prices.
    pub fn code_enabled(&self) -> bool {
        self.host_currency().is_some_and(|c| c.code_enabled)
    }
}

/// One way of finding a value on a page.
pub trait Detector<T>: Send + Sync {
    fn name(&self) -> &'static str;
    fn detect(&self, page: &StorefrontSnapshot) -> Option<T>;
}

/// Detector backed by a plain function.
pub struct FnDetector<T> {
    name: &'static str,
    detect: fn(&StorefrontSnapshot) -> Option<T>,
}

impl<T> FnDetector<T> {
    pub fn new(name: &'static str, detect: fn(&StorefrontSnapshot) -> Option<T>) -> Self {
        Self { name, detect }
    }
}

impl<T> Detector<T> for FnDetector<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn detect(&self, page: &StorefrontSnapshot) -> Option<T> {
        (self.detect)(page)
    }
}

/// Always answers with a fixed value. Goes last in a chain.
pub struct StaticDetector<T>(pub T);

impl<T: Clone + Send + Sync> Detector<T> for StaticDetector<T> {
    fn name(&self) -> &'static str {
        "static default"
    }

    fn detect(&self, _page: &StorefrontSnapshot) -> Option<T> {
        Some(self.0.clone())
    }
}

/// Ordered detectors with first-match-wins semantics.
pub struct DetectorChain<T> {
    detectors: Vec<Box<dyn Detector<T>>>,
}

impl<T> DetectorChain<T> {
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    pub fn with(mut self, detector: impl Detector<T> + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    pub fn detect(&self, page: &StorefrontSnapshot) -> Option<T> {
        self.detectors.iter().find_map(|detector| {
            let found = detector.detect(page);
            if found.is_some() {
                debug!(detector = detector.name(), "Detector matched");
            }
            found
        })
    }
}

impl<T> Default for DetectorChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_code(value: &str) -> Option<CurrencyCode> {
    value.parse().ok()
}

/// Parses codes, dropping invalid entries and duplicates. Empty means no match.
fn parse_codes<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<Vec<CurrencyCode>> {
    let mut codes: Vec<CurrencyCode> = Vec::new();
    for code in values.into_iter().filter_map(parse_code) {
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    (!codes.is_empty()).then_some(codes)
}

/// First run of three uppercase ASCII letters in `text`.
fn find_code_run(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    bytes
        .windows(3)
        .position(|w| w.iter().all(u8::is_ascii_uppercase))
        .map(|i| &text[i..i + 3])
}

// Multi-character symbols come before "$" so "C$" is not read as USD.
const TEXT_SYMBOLS: &[(&str, &str)] = &[
    ("C$", "CAD"),
    ("A$", "AUD"),
    ("S$", "SGD"),
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("₹", "INR"),
];

/// Guesses a currency from displayed price text by symbol, then by an
/// embedded three letter code.
pub fn extract_currency_from_text(text: &str) -> Option<CurrencyCode> {
    TEXT_SYMBOLS
        .iter()
        .find(|(symbol, _)| text.contains(symbol))
        .map(|(_, code)| CurrencyCode::known(*code))
        .or_else(|| find_code_run(text).and_then(parse_code))
}

/// Reads a price from display text such as "Rs. 1,299.00".
///
/// Everything but digits and dots is dropped (so grouping commas vanish),
/// then the longest leading number is parsed. Unparseable text gives 0.
pub fn extract_price_from_text(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in cleaned.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }
    cleaned[..end].parse().unwrap_or(0.0)
}

fn host_enabled_currencies(page: &StorefrontSnapshot) -> Option<Vec<CurrencyCode>> {
    let enabled = page.host_shop()?.enabled_currencies.as_ref()?;
    parse_codes(enabled.iter().map(|c| c.iso_code.as_str()))
}

fn meta_enabled_currencies(page: &StorefrontSnapshot) -> Option<Vec<CurrencyCode>> {
    parse_codes(page.meta.currencies.as_deref()?.split(','))
}

fn form_enabled_currencies(page: &StorefrontSnapshot) -> Option<Vec<CurrencyCode>> {
    let form = page.localization_form.as_ref()?;
    parse_codes(form.values.iter().map(String::as_str))
}

fn price_element_currencies(page: &StorefrontSnapshot) -> Option<Vec<CurrencyCode>> {
    let mut codes: Vec<CurrencyCode> = Vec::new();
    for element in &page.price_elements {
        let code = element
            .currency_code
            .as_deref()
            .or(element.currency.as_deref())
            .and_then(parse_code)
            .or_else(|| extract_currency_from_text(&element.text));
        if let Some(code) = code
            && !codes.contains(&code)
        {
            codes.push(code);
        }
    }
    (!codes.is_empty()).then_some(codes)
}

/// Enabled currencies: host globals, meta tag, localization form, price
/// elements, then `defaults`.
pub fn enabled_currencies_chain(defaults: Vec<CurrencyCode>) -> DetectorChain<Vec<CurrencyCode>> {
    DetectorChain::new()
        .with(FnDetector::new("host enabled currencies", host_enabled_currencies))
        .with(FnDetector::new("meta currencies", meta_enabled_currencies))
        .with(FnDetector::new("localization form", form_enabled_currencies))
        .with(FnDetector::new("price elements", price_element_currencies))
        .with(StaticDetector(defaults))
}

fn host_active_currency(page: &StorefrontSnapshot) -> Option<CurrencyCode> {
    parse_code(page.host_currency()?.active.as_deref()?)
}

fn host_currency_code(page: &StorefrontSnapshot) -> Option<CurrencyCode> {
    parse_code(page.host_currency()?.code.as_deref()?)
}

fn meta_currency(page: &StorefrontSnapshot) -> Option<CurrencyCode> {
    parse_code(page.meta.currency.as_deref()?)
}

fn form_selected_currency(page: &StorefrontSnapshot) -> Option<CurrencyCode> {
    parse_code(page.localization_form.as_ref()?.selected.as_deref()?)
}

/// Currency the visitor is currently browsing in.
pub fn current_currency_chain() -> DetectorChain<CurrencyCode> {
    DetectorChain::new()
        .with(FnDetector::new("host active currency", host_active_currency))
        .with(FnDetector::new("host currency code", host_currency_code))
        .with(FnDetector::new("meta currency", meta_currency))
        .with(FnDetector::new("localization selection", form_selected_currency))
        .with(StaticDetector(CurrencyCode::known("USD")))
}

fn shop_currency(page: &StorefrontSnapshot) -> Option<CurrencyCode> {
    parse_code(page.host_shop()?.currency.as_deref()?)
}

fn money_format_currency(page: &StorefrontSnapshot) -> Option<CurrencyCode> {
    let format = page.host_shop()?.money_format.as_deref()?;
    parse_code(find_code_run(format)?)
}

/// The shop's own currency.
pub fn base_currency_chain() -> DetectorChain<CurrencyCode> {
    DetectorChain::new()
        .with(FnDetector::new("shop currency", shop_currency))
        .with(FnDetector::new("money format", money_format_currency))
        .with(StaticDetector(CurrencyCode::known("USD")))
}

/// Result of running all three chains over a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedCurrencies {
    pub enabled: Vec<CurrencyCode>,
    pub current: CurrencyCode,
    pub base: CurrencyCode,
}

impl DetectedCurrencies {
    pub fn from_page(page: &StorefrontSnapshot, defaults: &[CurrencyCode]) -> Self {
        let enabled = enabled_currencies_chain(defaults.to_vec())
            .detect(page)
            .unwrap_or_else(|| defaults.to_vec());
        let current = current_currency_chain()
            .detect(page)
            .unwrap_or_else(|| CurrencyCode::known("USD"));
        let base = base_currency_chain()
            .detect(page)
            .unwrap_or_else(|| CurrencyCode::known("USD"));
        Self {
            enabled,
            current,
            base,
        }
    }

    pub fn is_enabled(&self, code: &CurrencyCode) -> bool {
        self.enabled.contains(code)
    }

    /// Currency to render prices in: `requested`, else the current one.
    /// Anything the shop has not enabled falls back to the base.
    pub fn display_currency(&self, requested: Option<&CurrencyCode>) -> CurrencyCode {
        let wanted = requested.unwrap_or(&self.current);
        if self.is_enabled(wanted) || *wanted == self.base {
            wanted.clone()
        } else {
            warn!(currency = %wanted, base = %self.base, "Currency not enabled, using base");
            self.base.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    fn codes(list: &[&str]) -> Vec<CurrencyCode> {
        list.iter().map(|c| code(c)).collect()
    }

    fn page(json: &str) -> StorefrontSnapshot {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_host_globals_win_over_meta() {
        let page = page(
            r#"{
                "host": {"shop": {"enabled_currencies": [{"iso_code": "INR"}, {"iso_code": "USD"}]}},
                "meta": {"currencies": "EUR, GBP"}
            }"#,
        );
        let enabled = enabled_currencies_chain(vec![]).detect(&page).unwrap();
        assert_eq!(enabled, codes(&["INR", "USD"]));
    }

    #[test]
    fn test_meta_then_form_then_prices() {
        let meta = page(r#"{"meta": {"currencies": "eur, gbp ,bogus"}}"#);
        assert_eq!(
            enabled_currencies_chain(vec![]).detect(&meta).unwrap(),
            codes(&["EUR", "GBP"])
        );

        let form = page(r#"{"localization_form": {"values": ["CAD", "", "AUD", "CAD"]}}"#);
        assert_eq!(
            enabled_currencies_chain(vec![]).detect(&form).unwrap(),
            codes(&["CAD", "AUD"])
        );

        let prices = page(
            r#"{"price_elements": [
                {"currency_code": "JPY", "text": "¥100"},
                {"currency": "EUR", "text": ""},
                {"text": "C$12.00"},
                {"text": "12.00 CHF"},
                {"text": "no currency here"}
            ]}"#,
        );
        assert_eq!(
            enabled_currencies_chain(vec![]).detect(&prices).unwrap(),
            codes(&["JPY", "EUR", "CAD", "CHF"])
        );
    }

    #[test]
    fn test_empty_form_falls_through_to_defaults() {
        let page = page(r#"{"localization_form": {"values": []}}"#);
        let defaults = codes(&["USD", "EUR", "GBP", "CAD", "AUD"]);
        assert_eq!(
            enabled_currencies_chain(defaults.clone()).detect(&page).unwrap(),
            defaults
        );
    }

    #[test]
    fn test_current_currency_order() {
        let full = page(
            r#"{
                "host": {"currency": {"active": "EUR", "code": "GBP"}},
                "meta": {"currency": "CAD"},
                "localization_form": {"selected": "AUD"}
            }"#,
        );
        assert_eq!(current_currency_chain().detect(&full), Some(code("EUR")));

        let code_only = page(r#"{"host": {"currency": {"code": "GBP"}}, "meta": {"currency": "CAD"}}"#);
        assert_eq!(current_currency_chain().detect(&code_only), Some(code("GBP")));

        let form_only = page(r#"{"localization_form": {"selected": "aud"}}"#);
        assert_eq!(current_currency_chain().detect(&form_only), Some(code("AUD")));

        let empty = StorefrontSnapshot::default();
        assert_eq!(current_currency_chain().detect(&empty), Some(code("USD")));
    }

    #[test]
    fn test_base_currency_from_money_format() {
        let shop = page(r#"{"host": {"shop": {"currency": "INR", "money_format": "${{amount}} USD"}}}"#);
        assert_eq!(base_currency_chain().detect(&shop), Some(code("INR")));

        let format = page(r#"{"host": {"shop": {"money_format": "Rs. {{amount}} INR"}}}"#);
        assert_eq!(base_currency_chain().detect(&format), Some(code("INR")));

        let nothing = StorefrontSnapshot::default();
        assert_eq!(base_currency_chain().detect(&nothing), Some(code("USD")));
    }

    #[test]
    fn test_extract_currency_from_text() {
        assert_eq!(extract_currency_from_text("$19.99"), Some(code("USD")));
        assert_eq!(extract_currency_from_text("A$19.99"), Some(code("AUD")));
        assert_eq!(extract_currency_from_text("₹1,299"), Some(code("INR")));
        assert_eq!(extract_currency_from_text("Price: 10 SEK"), Some(code("SEK")));
        assert_eq!(extract_currency_from_text("Sold out"), None);
    }

    #[test]
    fn test_extract_price_from_text() {
        assert_eq!(extract_price_from_text("$19.99"), 19.99);
        assert_eq!(extract_price_from_text("Rs. 1,299.00"), 1299.0);
        // Dots before the first digit belong to a prefix such as "Rs."
        assert_eq!(extract_price_from_text("Rs.499"), 499.0);
        assert_eq!(extract_price_from_text("€5"), 5.0);
        assert_eq!(extract_price_from_text("1.299.00"), 1.299);
        assert_eq!(extract_price_from_text("Sold out"), 0.0);
        assert_eq!(extract_price_from_text(""), 0.0);
    }

    #[test]
    fn test_detected_currencies_from_page() {
        let page = page(
            r#"{
                "host": {
                    "currency": {"active": "USD", "rate": 0.012, "code_enabled": true},
                    "shop": {"currency": "INR", "enabled_currencies": [{"iso_code": "INR"}, {"iso_code": "USD"}]}
                }
            }"#,
        );
        let detected = DetectedCurrencies::from_page(&page, &[]);
        assert_eq!(detected.enabled, codes(&["INR", "USD"]));
        assert_eq!(detected.current, code("USD"));
        assert_eq!(detected.base, code("INR"));
        assert!(detected.is_enabled(&code("USD")));
        assert_eq!(page.host_rate(), Some((code("USD"), 0.012)));
        assert!(page.code_enabled());
    }

    #[test]
    fn test_display_currency_falls_back_to_base() {
        let detected = DetectedCurrencies {
            enabled: codes(&["INR", "USD"]),
            current: code("USD"),
            base: code("INR"),
        };
        assert_eq!(detected.display_currency(None), code("USD"));
        assert_eq!(detected.display_currency(Some(&code("INR"))), code("INR"));
        assert_eq!(detected.display_currency(Some(&code("EUR"))), code("INR"));
    }
}
