use ratewatch::core::{Currency, RateEntry, RatesProvider, RatesUpdate, RatesViewModel};
use ratewatch::providers::RatesApiProvider;
use rust_decimal::Decimal;
use std::fs;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const EUR_RESPONSE: &str = r#"{
        "amount": 1.0,
        "base": "EUR",
        "date": "2024-05-10",
        "rates": {"AUD": 1.6138, "GBP": 0.8594, "JPY": 129.34, "USD": 1.1615}
    }"#;

    pub const AUD_RESPONSE: &str = r#"{
        "amount": 1.0,
        "base": "AUD",
        "date": "2024-05-10",
        "rates": {"EUR": 0.61966, "GBP": 0.53253, "JPY": 80.146, "USD": 0.71973}
    }"#;

    pub async fn mount_rates(server: &MockServer, base: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("base", base))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    pub async fn create_mock_server() -> MockServer {
        let server = MockServer::start().await;
        mount_rates(&server, "EUR", 200, EUR_RESPONSE).await;
        mount_rates(&server, "AUD", 200, AUD_RESPONSE).await;
        server
    }

    pub fn write_config(file: &tempfile::NamedTempFile, base_url: &str, amount: &str) {
        let config_content = format!(
            r#"
            provider:
              base_url: {base_url}
              timeout_secs: 2
            poll_interval_ms: 20
            base: "EUR"
            amount: "{amount}"
        "#
        );
        std::fs::write(file.path(), config_content).expect("Failed to write config file");
    }
}

async fn next_rates(view_model: &mut RatesViewModel) -> Vec<RateEntry> {
    loop {
        let update = tokio::time::timeout(Duration::from_secs(5), view_model.next_update())
            .await
            .expect("Timed out waiting for rates")
            .expect("Polling stopped");
        match update {
            RatesUpdate::Rates { rates, .. } => return rates,
            RatesUpdate::Failure => info!("Fetch failed, waiting for the next one"),
        }
    }
}

#[test_log::test(tokio::test)]
async fn test_view_model_against_mock_api() {
    let server = test_utils::create_mock_server().await;
    let provider = RatesApiProvider::new(&server.uri(), Duration::from_secs(2)).unwrap();
    let eur: Currency = "EUR".parse().unwrap();
    let mut view_model = RatesViewModel::new(
        Arc::new(provider),
        Duration::from_millis(20),
        RateEntry::base(eur, Some(Decimal::ONE)),
    );

    view_model.start();
    let rates = next_rates(&mut view_model).await;

    let symbols: Vec<&str> = rates.iter().map(RateEntry::symbol).collect();
    assert_eq!(symbols, vec!["EUR", "AUD", "GBP", "JPY", "USD"]);
    assert_eq!(rates[0].rate, Decimal::ONE);

    view_model.set_multiplier(Some(Decimal::TEN));
    let rates = next_rates(&mut view_model).await;
    assert!(rates.iter().all(|e| e.multiplier == Some(Decimal::TEN)));

    let aud = "AUD".parse().unwrap();
    assert!(view_model.select_currency(&aud));
    assert_eq!(
        view_model.base().multiplier,
        Some(Decimal::from_str("16.138").unwrap())
    );

    // Updates queued for EUR before the switch are dropped
    let rates = next_rates(&mut view_model).await;
    let symbols: Vec<&str> = rates.iter().map(RateEntry::symbol).collect();
    assert_eq!(symbols, vec!["AUD", "EUR", "GBP", "JPY", "USD"]);
    assert_eq!(rates[0].rate, Decimal::ONE);
    assert_eq!(
        rates[1].amount(),
        Decimal::from_str("16.138")
            .unwrap()
            .checked_mul(Decimal::from_str("0.61966").unwrap())
    );
    assert_eq!(view_model.failure(), Some(false));

    view_model.stop();
    assert!(view_model.next_update().await.is_none());
}

#[test_log::test(tokio::test)]
async fn test_view_model_keeps_rates_on_failure() {
    let server = wiremock::MockServer::start().await;
    test_utils::mount_rates(&server, "EUR", 200, test_utils::EUR_RESPONSE).await;
    test_utils::mount_rates(&server, "GBP", 500, "Internal Server Error").await;
    let provider = RatesApiProvider::new(&server.uri(), Duration::from_secs(2)).unwrap();
    let mut view_model = RatesViewModel::new(
        Arc::new(provider),
        Duration::from_millis(20),
        RateEntry::base("EUR".parse().unwrap(), None),
    );

    view_model.start();
    let before = next_rates(&mut view_model).await;
    assert!(view_model.select(2));

    let update = tokio::time::timeout(Duration::from_secs(5), view_model.next_update())
        .await
        .expect("Timed out waiting for failure")
        .expect("Polling stopped");

    assert_eq!(update, RatesUpdate::Failure);
    assert_eq!(view_model.failure(), Some(true));
    assert_eq!(view_model.rates(), Some(before.as_slice()));
    assert_eq!(view_model.base().symbol(), "GBP");
}

#[test_log::test(tokio::test)]
async fn test_provider_fetches_latest_rates() {
    let server = test_utils::create_mock_server().await;
    let provider = RatesApiProvider::new(&server.uri(), Duration::from_secs(2)).unwrap();

    let snapshot = provider.fetch_rates(&"AUD".parse().unwrap()).await.unwrap();

    assert_eq!(snapshot.base.symbol(), "AUD");
    assert_eq!(snapshot.date.to_string(), "2024-05-10");
    assert_eq!(snapshot.rates.len(), 4);
}

#[test_log::test(tokio::test)]
async fn test_convert_command_with_mock() {
    let server = test_utils::create_mock_server().await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &server.uri(), "10");

    let result = ratewatch::run_command(
        ratewatch::AppCommand::Convert {
            base: Some("AUD".parse().unwrap()),
            amount: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    assert!(
        result.is_ok(),
        "Convert command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_convert_command_reports_http_error() {
    let server = wiremock::MockServer::start().await;
    test_utils::mount_rates(&server, "EUR", 503, "Service Unavailable").await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &server.uri(), "1");

    let result = ratewatch::run_command(
        ratewatch::AppCommand::Convert {
            base: None,
            amount: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let error = result.expect_err("Convert should fail on HTTP 503");
    assert!(format!("{error:#}").contains("Failed to fetch rates for EUR"));
}

#[test_log::test(tokio::test)]
async fn test_watch_command_stops_after_updates() {
    let server = test_utils::create_mock_server().await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &server.uri(), "");

    let result = ratewatch::run_command(
        ratewatch::AppCommand::Watch(ratewatch::cli::watch::WatchOptions {
            base: None,
            amount: Some("2.5".to_string()),
            interval_ms: Some(10),
            updates: Some(2),
            interactive: false,
        }),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    assert!(result.is_ok(), "Watch command failed with: {:?}", result.err());
    let requests = server.received_requests().await.unwrap();
    assert!(requests.len() >= 2);
}

#[test_log::test(tokio::test)]
async fn test_watch_command_survives_failures() {
    let server = wiremock::MockServer::start().await;
    test_utils::mount_rates(&server, "EUR", 500, "Internal Server Error").await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &server.uri(), "1");

    let result = ratewatch::run_command(
        ratewatch::AppCommand::Watch(ratewatch::cli::watch::WatchOptions {
            updates: Some(2),
            ..Default::default()
        }),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    assert!(result.is_ok(), "Watch command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_watch_command_rejects_zero_interval() {
    let server = test_utils::create_mock_server().await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &server.uri(), "1");

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        ratewatch::run_command(
            ratewatch::AppCommand::Watch(ratewatch::cli::watch::WatchOptions {
                interval_ms: Some(0),
                updates: Some(1),
                ..Default::default()
            }),
            Some(config_file.path().to_str().unwrap()),
        ),
    )
    .await
    .expect("Watch with a zero interval should fail fast");

    let error = result.expect_err("Zero interval should be rejected");
    assert!(format!("{error:#}").contains("greater than zero"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_path_fails() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.yaml");

    let result = ratewatch::run_command(
        ratewatch::AppCommand::Convert {
            base: None,
            amount: None,
        },
        Some(missing.to_str().unwrap()),
    )
    .await;

    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_currencies_command() {
    let result = ratewatch::run_command(ratewatch::AppCommand::Currencies, None).await;
    assert!(result.is_ok());
}

#[test_log::test(tokio::test)]
async fn test_setup_writes_loadable_config() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");

    ratewatch::cli::setup::setup_at_path(&path).unwrap();
    let config = ratewatch::core::config::AppConfig::load_from_path(&path).unwrap();

    assert_eq!(config.base.symbol(), "EUR");
    assert!(fs::read_to_string(&path).unwrap().contains("base_url"));
}
