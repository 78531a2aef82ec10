//! Integration tests for `YahooClient` against a local `wiremock` server.

use std::collections::HashMap;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pnp_market::{AliasGenerator, MarketError, PriceLookup, YahooClient};

fn test_client(server: &MockServer) -> YahooClient {
    YahooClient::new(5, "pnp-test/0.1", 0, 0)
        .expect("failed to build test YahooClient")
        .with_base_url(&server.uri())
}

fn test_client_with_retries(server: &MockServer, max_retries: u32) -> YahooClient {
    YahooClient::new(5, "pnp-test/0.1", max_retries, 0)
        .expect("failed to build test YahooClient")
        .with_base_url(&server.uri())
}

fn chart_json(meta: serde_json::Value, closes: &[Option<f64>]) -> serde_json::Value {
    json!({
        "chart": {
            "result": [{
                "meta": meta,
                "timestamp": [1_772_000_000, 1_772_086_400],
                "indicators": { "quote": [{ "close": closes }] }
            }],
            "error": null
        }
    })
}

async fn mount_chart(server: &MockServer, symbol: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v8/finance/chart/{symbol}")))
        .and(query_param("range", "5d"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Price lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn price_reads_regular_market_price() {
    let server = MockServer::start().await;
    mount_chart(
        &server,
        "AAPL",
        chart_json(json!({"symbol": "AAPL", "regularMarketPrice": 227.52}), &[Some(225.0)]),
    )
    .await;

    let price = test_client(&server).current_price("AAPL").await;
    assert_eq!(price, Some(227.52));
}

#[tokio::test]
async fn price_falls_back_to_last_close() {
    let server = MockServer::start().await;
    mount_chart(
        &server,
        "YPF",
        chart_json(json!({"symbol": "YPF"}), &[Some(33.1), Some(34.25), None]),
    )
    .await;

    assert_eq!(test_client(&server).current_price("YPF").await, Some(34.25));
}

#[tokio::test]
async fn unknown_symbol_has_no_price() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/ZZZZ"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "chart": {"result": null, "error": {"code": "Not Found", "description": "No data found"}}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(matches!(
        client.fetch_chart("ZZZZ").await,
        Err(MarketError::NotFound { .. })
    ));
    assert_eq!(client.current_price("ZZZZ").await, None);
}

#[tokio::test]
async fn throttling_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/MSFT"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_chart(
        &server,
        "MSFT",
        chart_json(json!({"regularMarketPrice": 415.0}), &[]),
    )
    .await;

    let price = test_client_with_retries(&server, 2).current_price("MSFT").await;
    assert_eq!(price, Some(415.0));
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/MSFT"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client_with_retries(&server, 3).fetch_chart("MSFT").await;
    assert!(matches!(
        result,
        Err(MarketError::UnexpectedStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>consent</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_chart("AAPL").await;
    assert!(matches!(result, Err(MarketError::Deserialize { .. })));
}

// ---------------------------------------------------------------------------
// Alias generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn aliases_combine_names_ticker_and_extras() {
    let server = MockServer::start().await;
    mount_chart(
        &server,
        "MSFT",
        chart_json(
            json!({"longName": "Microsoft Corporation", "shortName": "Microsoft Corporation"}),
            &[],
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/NOPE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let tickers = vec!["MSFT".to_string(), "NOPE".to_string()];
    let mut extra = HashMap::new();
    extra.insert(
        "MSFT".to_string(),
        vec!["Azure".to_string(), "microsoft".to_string()],
    );

    let aliases = test_client(&server).build(&tickers, &extra).await;

    assert_eq!(
        aliases["MSFT"],
        vec!["Microsoft Corporation", "Microsoft", "MSFT", "Azure"]
    );
    assert_eq!(aliases["NOPE"], vec!["NOPE"]);
}
