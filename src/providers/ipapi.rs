use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::util::{http_client, with_retry};
use crate::core::geo::CountryProvider;

#[derive(Debug, Deserialize)]
struct IpapiResponse {
    country_code: Option<String>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

/// IP geolocation through ipapi's `/json/` endpoint.
pub struct IpapiProvider {
    base_url: String,
}

impl IpapiProvider {
    pub fn new(base_url: &str) -> Self {
        IpapiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CountryProvider for IpapiProvider {
    #[instrument(name = "IpapiLookup", skip(self))]
    async fn country_code(&self) -> Result<Option<String>> {
        let url = format!("{}/json/", self.base_url);
        debug!("Requesting geolocation from {}", url);

        let client = http_client()?;
        let response = with_retry(|| client.get(&url).send(), 1, 300)
            .await
            .map_err(|e| anyhow!("Geolocation request error: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("Geolocation HTTP error: {}", response.status()));
        }

        let data: IpapiResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse geolocation response: {}", e))?;

        if data.error {
            return Err(anyhow!(
                "Geolocation lookup failed: {}",
                data.reason.as_deref().unwrap_or("unknown reason")
            ));
        }

        Ok(data
            .country_code
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty()))
    }
}
