//! Buyer country signals

use anyhow::Result;
use async_trait::async_trait;

use super::currency::CurrencyCode;

/// Resolves the visitor's ISO 3166 alpha-2 country code.
#[async_trait]
pub trait CountryProvider: Send + Sync {
    async fn country_code(&self) -> Result<Option<String>>;
}

const COUNTRY_CURRENCIES: &[(&str, &str)] = &[
    ("US", "USD"),
    ("CA", "CAD"),
    ("GB", "GBP"),
    ("AU", "AUD"),
    ("IN", "INR"),
    ("JP", "JPY"),
    ("SG", "SGD"),
    ("NZ", "NZD"),
    ("CH", "CHF"),
    ("NO", "NOK"),
    ("SE", "SEK"),
    ("DK", "DKK"),
    ("EU", "EUR"),
];

/// Currency to offer a visitor from `country`.
///
/// The mapped currency is used only if the shop enables it; otherwise the
/// first enabled currency, and the base when nothing is enabled.
pub fn currency_for_country(
    country: &str,
    enabled: &[CurrencyCode],
    base: &CurrencyCode,
) -> CurrencyCode {
    let country = country.trim().to_ascii_uppercase();
    COUNTRY_CURRENCIES
        .iter()
        .find(|(c, _)| *c == country)
        .map(|(_, currency)| CurrencyCode::known(*currency))
        .filter(|currency| enabled.contains(currency))
        .or_else(|| enabled.first().cloned())
        .unwrap_or_else(|| base.clone())
}

/// An unknown country counts as domestic, so it never pays the markup.
pub fn is_domestic(country: Option<&str>, home_country: &str) -> bool {
    match country {
        Some(country) => country.trim().eq_ignore_ascii_case(home_country.trim()),
        None => true,
    }
}

/// Suggests switching currency when the visitor is still on the base
/// currency and their country maps to a different enabled one.
pub fn suggest_currency(
    country: Option<&str>,
    current: Option<&CurrencyCode>,
    enabled: &[CurrencyCode],
    base: &CurrencyCode,
) -> Option<CurrencyCode> {
    if current.is_some_and(|c| c != base) {
        return None;
    }
    let suggested = currency_for_country(country?, enabled, base);
    (suggested != *base && enabled.contains(&suggested)).then_some(suggested)
}
