use crate::core::cache::Cache;
use crate::core::currency::{CurrencyCode, CurrencyRateProvider};
use crate::core::geo::CountryProvider;
use crate::core::rates::RateTable;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// How long a detected country stays valid.
pub const COUNTRY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const COUNTRY_KEY: &str = "user_country";

// Caching for CurrencyRateProvider, one entry per base currency for the session
pub struct CachingRateProvider<T: CurrencyRateProvider> {
    inner: T,
    cache: Arc<dyn Cache<String, RateTable>>,
}

impl<T: CurrencyRateProvider> CachingRateProvider<T> {
    pub fn new(inner: T, cache: Arc<dyn Cache<String, RateTable>>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<T: CurrencyRateProvider> CurrencyRateProvider for CachingRateProvider<T> {
    async fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateTable> {
        let key = base.to_string();
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Cache hit for rates: {}", key);
            return Ok(cached);
        }
        let table = self.inner.fetch_rates(base).await?;
        self.cache.put(key, table.clone(), None).await;
        Ok(table)
    }
}

// Caching for CountryProvider, persisted with a 24 hour expiry
pub struct CachingCountryProvider<T: CountryProvider> {
    inner: T,
    cache: Arc<dyn Cache<String, String>>,
    ttl: Duration,
}

impl<T: CountryProvider> CachingCountryProvider<T> {
    pub fn new(inner: T, cache: Arc<dyn Cache<String, String>>) -> Self {
        Self {
            inner,
            cache,
            ttl: COUNTRY_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[async_trait]
impl<T: CountryProvider> CountryProvider for CachingCountryProvider<T> {
    async fn country_code(&self) -> Result<Option<String>> {
        let key = COUNTRY_KEY.to_string();
        if let Some(country) = self.cache.get(&key).await {
            debug!("Cache hit for country: {}", country);
            return Ok(Some(country));
        }
        let country = self.inner.country_code().await?;
        // Unknown countries are not cached so the next run asks again
        if let Some(country) = &country {
            self.cache.put(key, country.clone(), Some(self.ttl)).await;
        }
        Ok(country)
    }
}
