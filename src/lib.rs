pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::convert::Conversion;
use crate::cli::detect::DetectionReport;
use crate::core::config::AppConfig;
use crate::core::detect::DetectedCurrencies;
use crate::core::geo;
use crate::core::{CurrencyCode, PricingContext, RateTable};
use crate::providers::caching::{CachingCountryProvider, CachingRateProvider};
use crate::providers::exchange_rate_api::ExchangeRateApiProvider;
use crate::providers::ipapi::IpapiProvider;
use crate::store::memory::MemoryCache;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Commands that need configuration and network access.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Convert {
        amount: f64,
        from: Option<String>,
        to: String,
        country: Option<String>,
    },
    Rates {
        base: Option<String>,
    },
    Detect {
        page: PathBuf,
        country: Option<String>,
    },
    Render {
        page: PathBuf,
        to: Option<String>,
        country: Option<String>,
    },
}

/// Rates and visitor country, fetched together.
struct Lookup {
    rates: RateTable,
    country: Option<String>,
}

/// Sources the commands fetch from, wrapped in their caches.
struct Sources {
    rates: CachingRateProvider<ExchangeRateApiProvider>,
    country: CachingCountryProvider<IpapiProvider>,
}

impl Sources {
    fn new(config: &AppConfig) -> Self {
        let rate_cache = Arc::new(MemoryCache::<String, RateTable>::new());
        Self {
            rates: CachingRateProvider::new(
                ExchangeRateApiProvider::new(config.providers.exchange_rate_url()),
                rate_cache,
            ),
            country: CachingCountryProvider::new(
                IpapiProvider::new(config.providers.ipapi_url()),
                store::open_geo_cache(config),
            ),
        }
    }

    /// Fetches rates for `base` and the visitor country concurrently. An
    /// explicit `country` skips geolocation.
    async fn lookup(&self, base: &CurrencyCode, country: Option<String>) -> Lookup {
        let spinner = cli::ui::new_spinner("Fetching exchange rates...");
        let rates_future = providers::fetch_rates_or_fallback(&self.rates, base);
        let country_future = async {
            match country {
                Some(country) => Some(country.trim().to_ascii_uppercase()),
                None => providers::resolve_country(&self.country).await,
            }
        };
        let (rates, country) = futures::join!(rates_future, country_future);
        spinner.finish_and_clear();

        debug!(%base, rates = rates.len(), ?country, "Lookup complete");
        Lookup { rates, country }
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("shopfx starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let sources = Sources::new(&config);
    let home_country = config.home_country();

    match command {
        AppCommand::Convert {
            amount,
            from,
            to,
            country,
        } => {
            let from = match from {
                Some(from) => cli::parse_currency(&from)?,
                None => config.base_currency.clone(),
            };
            let to = cli::parse_currency(&to)?;

            let lookup = sources.lookup(&from, country).await;
            let is_domestic = geo::is_domestic(lookup.country.as_deref(), &home_country);
            let ctx = PricingContext::from_config(&config, lookup.rates, is_domestic);

            let conversion = Conversion::new(&ctx, amount, &from, &to, lookup.country);
            println!("{}", conversion.display_as_text());
        }
        AppCommand::Rates { base } => {
            let base = match base {
                Some(base) => cli::parse_currency(&base)?,
                None => config.base_currency.clone(),
            };

            let spinner = cli::ui::new_spinner("Fetching exchange rates...");
            let rates = providers::fetch_rates_or_fallback(&sources.rates, &base).await;
            spinner.finish_and_clear();

            let ctx = PricingContext::from_config(&config, rates, true);
            println!("{}", ctx.rates.display_as_table(&ctx));
        }
        AppCommand::Detect { page, country } => {
            let page = cli::load_snapshot(&page)?;
            let detected = DetectedCurrencies::from_page(&page, &config.default_currencies);

            let country = match country {
                Some(country) => Some(country.trim().to_ascii_uppercase()),
                None => providers::resolve_country(&sources.country).await,
            };
            let suggestion = geo::suggest_currency(
                country.as_deref(),
                Some(&detected.current),
                &detected.enabled,
                &detected.base,
            );

            let report = DetectionReport {
                detected,
                country,
                suggestion,
            };
            println!("{}", report.display_as_table());
        }
        AppCommand::Render { page, to, country } => {
            let page = cli::load_snapshot(&page)?;
            let detected = DetectedCurrencies::from_page(&page, &config.default_currencies);
            let requested = to.as_deref().map(cli::parse_currency).transpose()?;
            let target = detected.display_currency(requested.as_ref());

            let lookup = sources.lookup(&detected.base, country).await;
            let mut rates = lookup.rates;
            if let Some((code, rate)) = page.host_rate()
                && !rates.contains(&code)
            {
                debug!(%code, rate, "Using rate reported by the page");
                rates.insert(code, rate);
            }

            let is_domestic = geo::is_domestic(lookup.country.as_deref(), &home_country);
            let mut ctx = PricingContext::from_config(&config, rates, is_domestic);
            ctx.show_code |= page.code_enabled();

            let rendered =
                crate::core::render::render_price_elements(&page, &detected.base, &ctx, &target);
            println!("{}", cli::render::display_rendered(&page, &target, &rendered));
        }
    }

    Ok(())
}
