use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use stockviz_api::server::{AppState, build_router};
use stockviz_api::types::ApiErrorResponse;
use stockviz_cache::mem::MemCache;
use stockviz_chart::presenter::{ChartPresenter, PRICE_LABEL, SMA_LABEL};
use stockviz_core::testing::{
    MockMarketProvider, StubReply, daily_adjusted_fixture, sample_points, sma_fixture,
};
use stockviz_service::stock_data::{StockDataConfig, StockDataService};
use tokio::net::TcpListener;

struct TestServer {
    base_url: String,
    provider: Arc<MockMarketProvider>,
    cache: Arc<MemCache>,
    state: AppState,
}

// 帮助函数：在随机端口启动测试服务器
async fn spawn_test_server(provider: MockMarketProvider) -> TestServer {
    stockviz_core::common::tls::ensure_crypto_provider();

    let provider = Arc::new(provider);
    let cache = Arc::new(MemCache::new());
    let service = StockDataService::new(provider.clone(), cache.clone(), StockDataConfig::default());
    let state = AppState::new(service, ChartPresenter::new("stock-chart"));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let router = build_router(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        provider,
        cache,
        state,
    }
}

fn ajax_post(client: &reqwest::Client, url: String, ticker: &str) -> reqwest::RequestBuilder {
    client
        .post(url)
        .header("X-Requested-With", "XMLHttpRequest")
        .form(&[("ticker", ticker)])
}

#[tokio::test]
async fn test_home_page_is_served() -> anyhow::Result<()> {
    let server = spawn_test_server(MockMarketProvider::healthy("AAPL")).await;

    let res = reqwest::get(format!("{}/", server.base_url)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await?;
    assert!(body.contains("/render_chart/"));
    assert!(body.contains("X-Requested-With"));
    Ok(())
}

#[tokio::test]
async fn test_get_stock_data_then_cache_hit() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("debug").try_init().ok();
    let server = spawn_test_server(MockMarketProvider::healthy("AAPL")).await;
    let client = reqwest::Client::new();

    let res = ajax_post(&client, format!("{}/get_stock_data/", server.base_url), " aapl ")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let first: Value = res.json().await?;
    assert_eq!(first["prices"]["Meta Data"]["2. Symbol"], "AAPL");
    assert!(first["sma"]["Technical Analysis: SMA"].is_object());
    assert_eq!(server.provider.total_calls(), 2);
    assert_eq!(server.cache.write_count(), 1);

    let res = ajax_post(&client, format!("{}/get_stock_data/", server.base_url), "AAPL")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let second: Value = res.json().await?;
    assert_eq!(first, second);
    assert_eq!(server.provider.total_calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_non_ajax_request_is_rejected() -> anyhow::Result<()> {
    let server = spawn_test_server(MockMarketProvider::healthy("AAPL")).await;
    let client = reqwest::Client::new();

    for path in ["get_stock_data", "render_chart"] {
        let res = client
            .post(format!("{}/{}/", server.base_url, path))
            .form(&[("ticker", "AAPL")])
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: ApiErrorResponse = res.json().await?;
        assert!(!body.success);
        assert_eq!(body.error, "Not Ajax");
    }
    assert_eq!(server.provider.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_empty_ticker_is_bad_request() -> anyhow::Result<()> {
    let server = spawn_test_server(MockMarketProvider::healthy("AAPL")).await;
    let client = reqwest::Client::new();

    let res = ajax_post(&client, format!("{}/get_stock_data/", server.base_url), "   ")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(server.provider.total_calls(), 0);
    assert!(server.cache.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway_and_not_cached() -> anyhow::Result<()> {
    let provider = MockMarketProvider::healthy("IBM");
    provider.set_sma(StubReply::Fail("Thank you for using Alpha Vantage!".into()));
    let server = spawn_test_server(provider).await;
    let client = reqwest::Client::new();

    let res = ajax_post(&client, format!("{}/get_stock_data/", server.base_url), "IBM")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: ApiErrorResponse = res.json().await?;
    assert!(body.error.contains("IBM"));
    assert!(server.cache.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_render_chart_replaces_previous_instance() -> anyhow::Result<()> {
    let points = sample_points(520);
    let provider = MockMarketProvider::new(
        StubReply::Ok(daily_adjusted_fixture("MSFT", &points)),
        StubReply::Ok(sma_fixture("MSFT", &points)),
    );
    let server = spawn_test_server(provider).await;
    let client = reqwest::Client::new();

    let res = ajax_post(&client, format!("{}/render_chart/", server.base_url), "msft")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let first: Value = res.json().await?;

    let labels = first["spec"]["data"]["labels"].as_array().unwrap();
    assert_eq!(labels.len(), 500);
    assert_eq!(labels.last().unwrap(), &Value::String(points[0].0.clone()));
    assert_eq!(first["spec"]["type"], "line");
    assert_eq!(first["spec"]["data"]["datasets"][0]["label"], PRICE_LABEL);
    assert_eq!(first["spec"]["data"]["datasets"][1]["label"], SMA_LABEL);

    let res = ajax_post(&client, format!("{}/render_chart/", server.base_url), "MSFT")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let second: Value = res.json().await?;
    assert_ne!(first["id"], second["id"]);

    let presenter = server.state.presenter.lock().await;
    assert_eq!(presenter.active_instances(), 1);
    assert_eq!(presenter.destroyed_instances(), 1);
    // 第二次渲染命中缓存
    assert_eq!(server.provider.total_calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_failed_render_keeps_previous_chart() -> anyhow::Result<()> {
    let server = spawn_test_server(MockMarketProvider::healthy("AAPL")).await;
    let client = reqwest::Client::new();

    let res = ajax_post(&client, format!("{}/render_chart/", server.base_url), "AAPL")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let rendered: Value = res.json().await?;

    server.provider.set_prices(StubReply::Fail("Invalid API call".into()));
    let res = ajax_post(&client, format!("{}/render_chart/", server.base_url), "TSLA")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    let presenter = server.state.presenter.lock().await;
    let current = presenter.current().unwrap();
    assert_eq!(Value::from(current.id), rendered["id"]);
    assert_eq!(presenter.destroyed_instances(), 0);
    Ok(())
}

#[tokio::test]
async fn test_openapi_document_lists_routes() -> anyhow::Result<()> {
    let server = spawn_test_server(MockMarketProvider::healthy("AAPL")).await;

    let doc: Value = reqwest::get(format!("{}/api-docs/openapi.json", server.base_url))
        .await?
        .json()
        .await?;
    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/"));
    assert!(paths.contains_key("/get_stock_data/"));
    assert!(paths.contains_key("/render_chart/"));
    Ok(())
}

#[tokio::test]
async fn test_non_form_body_gets_json_error() -> anyhow::Result<()> {
    let server = spawn_test_server(MockMarketProvider::healthy("AAPL")).await;
    let client = reqwest::Client::new();

    for (path, content_type, body) in [
        ("get_stock_data", "text/plain", "ticker=AAPL"),
        ("get_stock_data", "application/json", r#"{"ticker":"AAPL"}"#),
        ("render_chart", "application/json", r#"{"ticker":"AAPL"}"#),
    ] {
        let res = client
            .post(format!("{}/{}/", server.base_url, path))
            .header("X-Requested-With", "XMLHttpRequest")
            .header("content-type", content_type)
            .body(body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let header = res
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(header.starts_with("application/json"), "{}", header);
        let body: ApiErrorResponse = res.json().await?;
        assert!(!body.success);
        assert!(!body.error.is_empty());
    }
    assert_eq!(server.provider.total_calls(), 0);
    Ok(())
}
