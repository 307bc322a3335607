pub mod convert;
pub mod detect;
pub mod rates;
pub mod render;
pub mod setup;
pub mod ui;

use crate::core::CurrencyCode;
use crate::core::detect::StorefrontSnapshot;
use anyhow::{Context, Result};
use std::path::Path;

/// Parses a currency code given on the command line.
pub fn parse_currency(value: &str) -> Result<CurrencyCode> {
    value
        .parse()
        .with_context(|| format!("Invalid currency code: {value}"))
}

/// Reads a storefront snapshot saved as JSON.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<StorefrontSnapshot> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page snapshot: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse page snapshot: {}", path.display()))
}
