use crate::common::TickerSymbol;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// 日线复权响应中的元数据块
pub const PRICE_META_KEY: &str = "Meta Data";
/// 日线复权响应中按日期索引的观测块
pub const PRICE_SERIES_KEY: &str = "Time Series (Daily)";
/// SMA 响应中的元数据块
pub const SMA_META_KEY: &str = "Meta Data";
/// SMA 响应中按日期索引的观测块
pub const SMA_SERIES_KEY: &str = "Technical Analysis: SMA";

/// # Summary
/// 一次完整抓取的合并结果：日线复权价格序列与 SMA 序列的原始上游响应。
///
/// # Invariants
/// - 构造后不可变，字段只读；每次上游抓取都会产生全新的实例。
/// - 上游 JSON 原样保存 (包括键顺序)，解析工作留给展示边界。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CombinedPayload {
    // TIME_SERIES_DAILY_ADJUSTED 原始响应
    #[schema(value_type = Object)]
    prices: Value,
    // SMA 原始响应
    #[schema(value_type = Object)]
    sma: Value,
}

impl CombinedPayload {
    pub fn new(prices: Value, sma: Value) -> Self {
        Self { prices, sma }
    }

    pub fn prices(&self) -> &Value {
        &self.prices
    }

    pub fn sma(&self) -> &Value {
        &self.sma
    }
}

/// # Summary
/// 缓存中按证券代码保存的条目。
///
/// # Invariants
/// - `stored_at` 为写入时刻，仅在配置了最大有效期时参与新鲜度判断。
/// - 条目从不原地修改，强制重新抓取时整体覆盖。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub symbol: TickerSymbol,
    pub payload: CombinedPayload,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    /// # Summary
    /// 判断条目在 `now` 时刻是否仍然新鲜。
    ///
    /// # Logic
    /// `max_age` 为 `None` 时表示永久有效；否则写入时间距今不超过 `max_age` 即为新鲜。
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Option<Duration>) -> bool {
        match max_age {
            None => true,
            Some(age) => now - self.stored_at <= age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn entry_at(stored_at: DateTime<Utc>) -> CacheEntry {
        CacheEntry {
            symbol: TickerSymbol::parse("ibm").unwrap(),
            payload: CombinedPayload::new(json!({}), json!({})),
            stored_at,
        }
    }

    #[test]
    fn test_entry_without_max_age_never_expires() {
        let stored = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let entry = entry_at(stored);
        assert!(entry.is_fresh(Utc::now(), None));
    }

    #[test]
    fn test_entry_expires_after_max_age() {
        let stored = Utc.with_ymd_and_hms(2021, 5, 10, 0, 0, 0).unwrap();
        let entry = entry_at(stored);
        let max_age = Some(Duration::hours(24));
        assert!(entry.is_fresh(stored + Duration::hours(24), max_age));
        assert!(!entry.is_fresh(stored + Duration::hours(25), max_age));
    }

    #[test]
    fn test_payload_round_trip_keeps_key_order() {
        let raw = r#"{"prices":{"Time Series (Daily)":{"2021-05-10":{},"2021-05-07":{},"2021-05-06":{}}},"sma":{}}"#;
        let payload: CombinedPayload = serde_json::from_str(raw).unwrap();
        let keys: Vec<&String> = payload.prices()["Time Series (Daily)"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys, ["2021-05-10", "2021-05-07", "2021-05-06"]);
        assert_eq!(serde_json::to_string(&payload).unwrap(), raw);
    }
}
