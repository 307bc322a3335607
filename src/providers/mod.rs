pub mod caching;
pub mod exchange_rate_api;
pub mod ipapi;
pub mod util;

use crate::core::currency::{CurrencyCode, CurrencyRateProvider};
use crate::core::geo::CountryProvider;
use crate::core::rates::RateTable;
use tracing::warn;

/// Fetches rates for `base`, falling back to the static `{base: 1.0}` table
/// when the source fails.
pub async fn fetch_rates_or_fallback(
    provider: &dyn CurrencyRateProvider,
    base: &CurrencyCode,
) -> RateTable {
    match provider.fetch_rates(base).await {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, %base, "Failed to fetch exchange rates, using fallback");
            RateTable::fallback(base.clone())
        }
    }
}

/// Resolves the visitor's country, treating any failure as unknown.
pub async fn resolve_country(provider: &dyn CountryProvider) -> Option<String> {
    match provider.country_code().await {
        Ok(country) => country,
        Err(e) => {
            warn!(error = %e, "Error detecting country");
            None
        }
    }
}
