//! Exchange rate table relative to a single base currency

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::currency::CurrencyCode;

/// Rates expressed per one unit of `base`. The base always maps to 1.0 and
/// every stored rate is finite and strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RateSnapshot")]
pub struct RateTable {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, f64>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Serialized form, validated through [`RateTable::from_raw`] on the way in.
#[derive(Deserialize)]
struct RateSnapshot {
    base: CurrencyCode,
    #[serde(default)]
    rates: HashMap<String, f64>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<RateSnapshot> for RateTable {
    fn from(snapshot: RateSnapshot) -> Self {
        let mut table = RateTable::from_raw(snapshot.base, &snapshot.rates);
        table.updated_at = snapshot.updated_at;
        table
    }
}

impl RateTable {
    /// Static `{base: 1.0}` table used when no rate source is reachable.
    pub fn fallback(base: CurrencyCode) -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(base.clone(), 1.0);
        Self {
            base,
            rates,
            updated_at: None,
        }
    }

    /// Builds a table from raw provider data, dropping entries that would
    /// break the table invariants.
    pub fn from_raw(base: CurrencyCode, raw: &HashMap<String, f64>) -> Self {
        let mut table = Self::fallback(base);
        for (code, rate) in raw {
            let Ok(code) = code.parse::<CurrencyCode>() else {
                warn!(code = %code, "Skipping rate with invalid currency code");
                continue;
            };
            table.insert(code, *rate);
        }
        table
    }

    /// Inserts a rate. Non-positive or non-finite rates are ignored, as is
    /// any attempt to change the base self-rate.
    pub fn insert(&mut self, code: CurrencyCode, rate: f64) {
        if code == self.base {
            return;
        }
        if !rate.is_finite() || rate <= 0.0 {
            warn!(%code, rate, "Skipping invalid exchange rate");
            return;
        }
        self.rates.insert(code, rate);
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn get(&self, code: &CurrencyCode) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Rate for `code`, or 1.0 when the table has no entry for it.
    pub fn rate_or_default(&self, code: &CurrencyCode) -> f64 {
        match self.get(code) {
            Some(rate) => rate,
            None => {
                debug!(%code, "No rate available, using 1.0");
                1.0
            }
        }
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, f64)> {
        self.rates.iter().map(|(code, rate)| (code, *rate))
    }
}
