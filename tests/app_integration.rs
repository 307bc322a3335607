use std::fs;
use tempfile::TempDir;
use tracing::info;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const INR_RATES: &str = r#"{
        "base": "INR",
        "time_last_updated": 1704067200,
        "rates": {"INR": 1, "USD": 0.012, "EUR": 0.011, "JPY": 1.78}
    }"#;

    pub async fn create_mock_server(country: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v4/latest/INR"))
            .respond_with(ResponseTemplate::new(200).set_body_string(INR_RATES))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!(r#"{{"country_code": "{country}"}}"#)),
            )
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub const PAGE: &str = r#"{
        "host": {
            "currency": {"active": "USD", "rate": 0.0125},
            "shop": {
                "currency": "INR",
                "enabled_currencies": [{"iso_code": "INR"}, {"iso_code": "USD"}]
            }
        },
        "price_elements": [
            {"price": "1000", "text": "₹1,000"},
            {"price_min": "500", "price_max": "900", "text": "₹500 - ₹900"}
        ]
    }"#;
}

/// Writes a config pointing every provider at `server_uri`, with the
/// country cache kept inside `dir`.
fn write_config(dir: &TempDir, server_uri: &str) -> String {
    let config_path = dir.path().join("config.yaml");
    let config_content = format!(
        r#"
        base_currency: "INR"
        home_country: "IN"
        markup:
          factor: 1.1
        providers:
          exchange_rate:
            base_url: {server_uri}
          ipapi:
            base_url: {server_uri}
        data_path: {}
    "#,
        dir.path().join("data").display()
    );
    fs::write(&config_path, &config_content).expect("Failed to write config file");
    config_path.to_string_lossy().into_owned()
}

fn write_page(dir: &TempDir) -> std::path::PathBuf {
    let page_path = dir.path().join("page.json");
    fs::write(&page_path, test_utils::PAGE).expect("Failed to write page snapshot");
    page_path
}

#[test_log::test(tokio::test)]
async fn test_convert_flow_with_mock() {
    let mock_server = test_utils::create_mock_server("US").await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&dir, &mock_server.uri());

    let result = shopfx::run_command(
        shopfx::AppCommand::Convert {
            amount: 1000.0,
            from: None,
            to: "USD".to_string(),
            country: None,
        },
        Some(&config_path),
    )
    .await;
    assert!(
        result.is_ok(),
        "Convert command failed with: {:?}",
        result.err()
    );

    // The detected country is persisted for the next run
    let config = shopfx::core::config::AppConfig::load_from_path(&config_path).unwrap();
    let cache = shopfx::store::open_geo_cache(&config);
    assert_eq!(
        cache.get(&"user_country".to_string()).await,
        Some("US".to_string())
    );
}

#[test_log::test(tokio::test)]
async fn test_rates_flow_with_mock() {
    let mock_server = test_utils::create_mock_server("IN").await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&dir, &mock_server.uri());

    let result =
        shopfx::run_command(shopfx::AppCommand::Rates { base: None }, Some(&config_path)).await;
    assert!(result.is_ok(), "Rates command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_rates_unavailable_falls_back() {
    // Nothing mounted, every request is a 404
    let mock_server = wiremock::MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&dir, &mock_server.uri());

    let result = shopfx::run_command(
        shopfx::AppCommand::Convert {
            amount: 250.0,
            from: Some("INR".to_string()),
            to: "EUR".to_string(),
            country: None,
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Fallback failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_detect_and_render_flow_with_mock() {
    let mock_server = test_utils::create_mock_server("US").await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&dir, &mock_server.uri());
    let page = write_page(&dir);

    let result = shopfx::run_command(
        shopfx::AppCommand::Detect {
            page: page.clone(),
            country: None,
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Detect command failed with: {:?}", result.err());

    let result = shopfx::run_command(
        shopfx::AppCommand::Render {
            page,
            to: Some("USD".to_string()),
            country: Some("us".to_string()),
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Render command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_invalid_currency_is_rejected() {
    let mock_server = test_utils::create_mock_server("IN").await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&dir, &mock_server.uri());

    let result = shopfx::run_command(
        shopfx::AppCommand::Convert {
            amount: 10.0,
            from: None,
            to: "dollars".to_string(),
            country: Some("IN".to_string()),
        },
        Some(&config_path),
    )
    .await;
    let err = result.expect_err("Invalid currency should fail");
    info!(error = %err, "Command rejected");
    assert!(err.to_string().contains("Invalid currency code"));
}

#[test_log::test(tokio::test)]
async fn test_pricing_flow_end_to_end() {
    use shopfx::core::config::AppConfig;
    use shopfx::core::detect::DetectedCurrencies;
    use shopfx::core::geo;
    use shopfx::core::{CurrencyRateProvider, PricingContext};
    use shopfx::providers::exchange_rate_api::ExchangeRateApiProvider;

    let mock_server = test_utils::create_mock_server("US").await;
    let provider = ExchangeRateApiProvider::new(&mock_server.uri());
    let config = AppConfig::default();

    let rates = provider
        .fetch_rates(&"INR".parse().unwrap())
        .await
        .expect("Rates should be fetched");

    let page: shopfx::core::detect::StorefrontSnapshot =
        serde_json::from_str(test_utils::PAGE).unwrap();
    let detected = DetectedCurrencies::from_page(&page, &config.default_currencies);
    let target = detected.display_currency(None);
    assert_eq!(target.as_str(), "USD");

    let is_domestic = geo::is_domestic(Some("US"), &config.home_country());
    let ctx = PricingContext::from_config(&config, rates, is_domestic);

    let rendered =
        shopfx::core::render::render_price_elements(&page, &detected.base, &ctx, &target);
    let texts: Vec<&str> = rendered.iter().map(|r| r.text.as_str()).collect();
    // 1000 INR * 1.1 markup * 0.012
    assert_eq!(texts, vec!["$13.20", "From $6.60"]);
}
