use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use super::util::{http_client, with_retry};
use crate::core::currency::{CurrencyCode, CurrencyRateProvider};
use crate::core::rates::RateTable;

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
    time_last_updated: Option<i64>,
}

/// Rate source speaking the exchangerate-api `/v4/latest/{BASE}` format.
pub struct ExchangeRateApiProvider {
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateTable> {
        let url = format!("{}/v4/latest/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let client = http_client()?;
        let response = with_retry(|| client.get(&url).send(), 2, 300)
            .await
            .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse rates response for {}: {}", base, e))?;

        let mut table = RateTable::from_raw(base.clone(), &data.rates);
        table.updated_at = data
            .time_last_updated
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single());
        debug!(count = table.len(), "Received exchange rates");
        Ok(table)
    }
}
