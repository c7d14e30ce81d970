use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use stockviz_core::common::TickerSymbol;
use stockviz_core::common::tls::ensure_crypto_provider;
use stockviz_core::config::UpstreamConfig;
use stockviz_core::market::entity::{PRICE_SERIES_KEY, SMA_SERIES_KEY};
use stockviz_core::market::error::MarketError;
use stockviz_core::market::port::MarketDataProvider;
use tracing::{debug, warn};

/// SMA 周期固定为 10 个交易日，图表标签依赖这一点
pub const SMA_TIME_PERIOD: &str = "10";

/// # Summary
/// Alpha Vantage 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端，所有请求共享同一个超时预算。
/// - 不做重试与退避，上游限流直接映射为 `MarketError::RateLimited`。
#[derive(Clone)]
pub struct AlphaVantageProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// `{base_url}/query`
    endpoint: String,
    api_key: String,
}

impl AlphaVantageProvider {
    /// # Summary
    /// 根据上游配置创建 provider。
    ///
    /// # Logic
    /// 1. 确保 rustls 加密后端已安装。
    /// 2. 以 `timeout_secs` 构建 reqwest 客户端。
    /// 3. API Key 为空时仅告警，上游会以错误文档响应。
    ///
    /// # Returns
    /// 客户端构建失败时返回 `MarketError::Network`。
    pub fn new(config: &UpstreamConfig) -> Result<Self, MarketError> {
        ensure_crypto_provider();

        if config.api_key.trim().is_empty() {
            warn!("Alpha Vantage API key is empty, upstream calls will be rejected");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("stockviz/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MarketError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/query", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }

    /// # Summary
    /// 发起一次查询并筛查响应。
    ///
    /// # Logic
    /// 1. 附带 `apikey` 发送 GET 请求，超时映射为 `Timeout`。
    /// 2. HTTP 429 视为限流，其它非 2xx 视为 `Status`。
    /// 3. 解析 JSON；Alpha Vantage 会以 200 + `Error Message`/`Note`/`Information` 报错，逐一识别。
    /// 4. 确认 `series_key` 观测块存在，否则视为结构错误。
    async fn query(&self, params: &[(&str, &str)], series_key: &str) -> Result<Value, MarketError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketError::RateLimited(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(MarketError::Status(status.as_u16()));
        }

        let json: Value = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                MarketError::Timeout
            } else {
                MarketError::Parse(e.to_string())
            }
        })?;

        screen_document(json, series_key)
    }
}

fn map_transport_error(e: reqwest::Error) -> MarketError {
    if e.is_timeout() {
        MarketError::Timeout
    } else {
        MarketError::Network(e.to_string())
    }
}

/// 识别接口级错误文档并校验观测块存在。
fn screen_document(json: Value, series_key: &str) -> Result<Value, MarketError> {
    let obj = json
        .as_object()
        .ok_or_else(|| MarketError::Parse("response is not a JSON object".into()))?;

    if let Some(msg) = obj.get("Error Message").and_then(Value::as_str) {
        return Err(MarketError::Api(msg.to_string()));
    }
    for key in ["Note", "Information"] {
        if let Some(msg) = obj.get(key).and_then(Value::as_str) {
            return Err(MarketError::RateLimited(msg.to_string()));
        }
    }
    if !obj.get(series_key).is_some_and(Value::is_object) {
        return Err(MarketError::Parse(format!("missing block {:?}", series_key)));
    }
    Ok(json)
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    async fn fetch_daily_adjusted(&self, symbol: &TickerSymbol) -> Result<Value, MarketError> {
        debug!(%symbol, "requesting TIME_SERIES_DAILY_ADJUSTED");
        self.query(
            &[
                ("function", "TIME_SERIES_DAILY_ADJUSTED"),
                ("symbol", symbol.as_str()),
                ("outputsize", "full"),
            ],
            PRICE_SERIES_KEY,
        )
        .await
    }

    async fn fetch_sma(&self, symbol: &TickerSymbol) -> Result<Value, MarketError> {
        debug!(%symbol, "requesting SMA");
        self.query(
            &[
                ("function", "SMA"),
                ("symbol", symbol.as_str()),
                ("interval", "daily"),
                ("time_period", SMA_TIME_PERIOD),
                ("series_type", "close"),
            ],
            SMA_SERIES_KEY,
        )
        .await
    }
}
