//! 测试辅助：可编排的上游行情桩与 Alpha Vantage 形状的 JSON 夹具。

use crate::common::TickerSymbol;
use crate::market::error::MarketError;
use crate::market::port::MarketDataProvider;
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// 桩的单端点行为
#[derive(Debug, Clone)]
pub enum StubReply {
    Ok(Value),
    Fail(String),
}

/// # Summary
/// 计数型上游桩，按端点记录调用次数与请求过的代码。
pub struct MockMarketProvider {
    prices: Mutex<StubReply>,
    sma: Mutex<StubReply>,
    delay: Option<Duration>,
    price_calls: AtomicUsize,
    sma_calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockMarketProvider {
    pub fn new(prices: StubReply, sma: StubReply) -> Self {
        Self {
            prices: Mutex::new(prices),
            sma: Mutex::new(sma),
            delay: None,
            price_calls: AtomicUsize::new(0),
            sma_calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// 两个端点都返回由 `sample_points` 生成的有效文档。
    pub fn healthy(symbol: &str) -> Self {
        let points = sample_points(3);
        Self::new(
            StubReply::Ok(daily_adjusted_fixture(symbol, &points)),
            StubReply::Ok(sma_fixture(symbol, &points)),
        )
    }

    /// 每次调用在返回前挂起 `delay`，用于构造并发窗口。
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_prices(&self, reply: StubReply) {
        *self.prices.lock().unwrap_or_else(|e| e.into_inner()) = reply;
    }

    pub fn set_sma(&self, reply: StubReply) {
        *self.sma.lock().unwrap_or_else(|e| e.into_inner()) = reply;
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    pub fn sma_calls(&self) -> usize {
        self.sma_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.price_calls() + self.sma_calls()
    }

    pub fn requested_symbols(&self) -> Vec<String> {
        self.requested
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn reply(&self, symbol: &TickerSymbol, slot: &Mutex<StubReply>) -> Result<Value, MarketError> {
        self.requested
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(symbol.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = slot.lock().unwrap_or_else(|e| e.into_inner()).clone();
        match reply {
            StubReply::Ok(v) => Ok(v),
            StubReply::Fail(msg) => Err(MarketError::Api(msg)),
        }
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketProvider {
    async fn fetch_daily_adjusted(&self, symbol: &TickerSymbol) -> Result<Value, MarketError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        self.reply(symbol, &self.prices).await
    }

    async fn fetch_sma(&self, symbol: &TickerSymbol) -> Result<Value, MarketError> {
        self.sma_calls.fetch_add(1, Ordering::SeqCst);
        self.reply(symbol, &self.sma).await
    }
}

/// 生成 `n` 个连续自然日 (从 2019-01-01 起) 的 `(日期, 数值)`，按日期降序排列。
pub fn sample_points(n: usize) -> Vec<(String, f64)> {
    let start = chrono::NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default();
    let mut points: Vec<(String, f64)> = start
        .iter_days()
        .take(n)
        .zip(0u32..)
        .map(|(d, i)| (d.format("%Y-%m-%d").to_string(), 100.0 + f64::from(i)))
        .collect();
    points.reverse();
    points
}

/// 构造 TIME_SERIES_DAILY_ADJUSTED 响应，`points` 的顺序即 JSON 键顺序。
pub fn daily_adjusted_fixture(symbol: &str, points: &[(String, f64)]) -> Value {
    let last = points.first().map(|p| p.0.clone()).unwrap_or_default();
    let mut series = Map::new();
    for (date, adj) in points {
        series.insert(
            date.clone(),
            json!({
                "1. open": format!("{:.4}", adj - 1.0),
                "2. high": format!("{:.4}", adj + 1.0),
                "3. low": format!("{:.4}", adj - 2.0),
                "4. close": format!("{:.4}", adj + 0.5),
                "5. adjusted close": format!("{:.4}", adj),
                "6. volume": "1000000",
                "7. dividend amount": "0.0000",
                "8. split coefficient": "1.0"
            }),
        );
    }
    json!({
        "Meta Data": {
            "1. Information": "Daily Time Series with Splits and Dividend Events",
            "2. Symbol": symbol,
            "3. Last Refreshed": last,
            "4. Output Size": "Full size",
            "5. Time Zone": "US/Eastern"
        },
        "Time Series (Daily)": Value::Object(series)
    })
}

/// 构造 10 周期日线 SMA 响应，`points` 的顺序即 JSON 键顺序。
pub fn sma_fixture(symbol: &str, points: &[(String, f64)]) -> Value {
    let last = points.first().map(|p| p.0.clone()).unwrap_or_default();
    let mut series = Map::new();
    for (date, value) in points {
        series.insert(date.clone(), json!({ "SMA": format!("{:.4}", value) }));
    }
    json!({
        "Meta Data": {
            "1: Symbol": symbol,
            "2: Indicator": "Simple Moving Average (SMA)",
            "3: Last Refreshed": last,
            "4: Interval": "daily",
            "5: Time Period": 10,
            "6: Series Type": "close",
            "7: Time Zone": "US/Eastern"
        },
        "Technical Analysis: SMA": Value::Object(series)
    })
}
