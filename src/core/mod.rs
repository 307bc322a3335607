//! Core pricing logic and abstractions

pub mod cache;
pub mod config;
pub mod converter;
pub mod currency;
pub mod detect;
pub mod format;
pub mod geo;
pub mod log;
pub mod pricing;
pub mod rates;
pub mod render;

// Re-export main types for cleaner imports
pub use converter::{apply_regional_markup, convert};
pub use currency::{CurrencyCode, CurrencyRateProvider};
pub use format::{SymbolTable, ZeroDecimalSet, format_price};
pub use geo::CountryProvider;
pub use pricing::PricingContext;
pub use rates::RateTable;
