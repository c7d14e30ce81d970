use crate::common::TickerSymbol;
use crate::market::error::MarketError;
use async_trait::async_trait;
use serde_json::Value;

/// # Summary
/// 原始行情数据源接口 (Port)，对应上游的两个查询端点。
///
/// # Invariants
/// - 返回值为上游原始 JSON 对象，不做任何字段解释。
/// - 实现者负责把接口级错误文档 (限流提示、无效代码) 转换为 `MarketError`，
///   保证 `Ok` 中一定是可用的数据文档。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 抓取全量日线复权价格序列。
    ///
    /// # Arguments
    /// * `symbol`: 已归一化的证券代码。
    ///
    /// # Returns
    /// 成功返回原始 JSON，失败返回 `MarketError`。
    async fn fetch_daily_adjusted(&self, symbol: &TickerSymbol) -> Result<Value, MarketError>;

    /// # Summary
    /// 抓取日线收盘价的简单移动平均序列。
    async fn fetch_sma(&self, symbol: &TickerSymbol) -> Result<Value, MarketError>;
}
