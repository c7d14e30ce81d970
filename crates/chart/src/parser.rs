//! 上游字符串键契约的唯一翻译层。
//!
//! Alpha Vantage 以 `"5. adjusted close"`、`"2. Symbol"` 这类带序号的字符串作为字段名，
//! 这里用显式的 serde 结构把它们映射为具名字段，其余模块不再接触原始键。

use crate::error::ChartError;
use crate::series::{PricePoint, SmaPoint};
use chrono::NaiveDate;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use stockviz_core::market::entity::{PRICE_META_KEY, PRICE_SERIES_KEY, SMA_META_KEY, SMA_SERIES_KEY};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 日线复权响应的元数据块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMeta {
    #[serde(rename = "1. Information", default)]
    pub information: Option<String>,
    #[serde(rename = "2. Symbol")]
    pub symbol: String,
    #[serde(rename = "3. Last Refreshed")]
    pub last_refreshed: String,
    #[serde(rename = "4. Output Size", default)]
    pub output_size: Option<String>,
    #[serde(rename = "5. Time Zone", default)]
    pub time_zone: Option<String>,
}

/// SMA 响应的元数据块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmaMeta {
    #[serde(rename = "1: Symbol")]
    pub symbol: String,
    #[serde(rename = "2: Indicator", default)]
    pub indicator: Option<String>,
    #[serde(rename = "3: Last Refreshed")]
    pub last_refreshed: String,
    #[serde(rename = "4: Interval", default)]
    pub interval: Option<String>,
    #[serde(rename = "5: Time Period", default, deserialize_with = "lenient_opt_u32")]
    pub time_period: Option<u32>,
    #[serde(rename = "6: Series Type", default)]
    pub series_type: Option<String>,
    #[serde(rename = "7: Time Zone", default)]
    pub time_zone: Option<String>,
}

/// 日线观测，只取复权收盘价，不读取未复权的 `"4. close"`。
#[derive(Deserialize)]
struct DailyBar {
    #[serde(rename = "5. adjusted close", deserialize_with = "lenient_f64")]
    adjusted_close: f64,
}

#[derive(Deserialize)]
struct SmaBar {
    #[serde(rename = "SMA", deserialize_with = "lenient_f64")]
    value: f64,
}

/// 上游数值一般是字符串 (`"126.8500"`)，偶尔是数字，两者都接受。
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Text(String),
    Number(f64),
}

impl Numeric {
    fn to_f64(&self) -> Result<f64, String> {
        match self {
            Numeric::Number(n) => Ok(*n),
            Numeric::Text(s) => s.trim().parse::<f64>().map_err(|e| format!("{:?}: {}", s, e)),
        }
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Numeric::deserialize(deserializer)?;
    let n = value.to_f64().map_err(D::Error::custom)?;
    if !n.is_finite() {
        return Err(D::Error::custom("non-finite value"));
    }
    Ok(n)
}

fn lenient_opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Numeric>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(Numeric::Text(s)) => s.trim().parse::<u32>().map(Some).map_err(D::Error::custom),
        Some(Numeric::Number(n)) => format!("{}", n)
            .parse::<u32>()
            .map(Some)
            .map_err(D::Error::custom),
    }
}

/// # Summary
/// 遍历按日期索引的观测块。
///
/// # Logic
/// 1. 定位 `block_key` 对象，缺失即结构错误。
/// 2. 按上游给出的键顺序逐项解析日期与观测体，每个键恰好产出一个元素。
fn parse_block<B, P>(
    doc: &Value,
    block_key: &str,
    build: impl Fn(NaiveDate, B) -> P,
) -> Result<Vec<P>, ChartError>
where
    B: DeserializeOwned,
{
    let block = doc
        .get(block_key)
        .and_then(Value::as_object)
        .ok_or_else(|| ChartError::Parse(format!("missing block {:?}", block_key)))?;

    block
        .iter()
        .map(|(key, bar)| {
            let date = NaiveDate::parse_from_str(key, DATE_FORMAT)
                .map_err(|e| ChartError::Parse(format!("invalid date {:?}: {}", key, e)))?;
            let bar = B::deserialize(bar)
                .map_err(|e| ChartError::Parse(format!("observation {}: {}", key, e)))?;
            Ok(build(date, bar))
        })
        .collect()
}

fn parse_meta<M: DeserializeOwned>(doc: &Value, meta_key: &str) -> Result<M, ChartError> {
    let meta = doc
        .get(meta_key)
        .ok_or_else(|| ChartError::Parse(format!("missing block {:?}", meta_key)))?;
    M::deserialize(meta).map_err(|e| ChartError::Parse(format!("{}: {}", meta_key, e)))
}

/// 解析复权价格序列，保持上游顺序。
pub fn parse_price_series(prices: &Value) -> Result<Vec<PricePoint>, ChartError> {
    parse_block(prices, PRICE_SERIES_KEY, |date, bar: DailyBar| PricePoint {
        date,
        adjusted_close: bar.adjusted_close,
    })
}

/// 解析 SMA 序列，保持上游顺序。
pub fn parse_sma_series(sma: &Value) -> Result<Vec<SmaPoint>, ChartError> {
    parse_block(sma, SMA_SERIES_KEY, |date, bar: SmaBar| SmaPoint {
        date,
        value: bar.value,
    })
}

pub fn parse_price_meta(prices: &Value) -> Result<PriceMeta, ChartError> {
    parse_meta(prices, PRICE_META_KEY)
}

pub fn parse_sma_meta(sma: &Value) -> Result<SmaMeta, ChartError> {
    parse_meta(sma, SMA_META_KEY)
}
