use std::sync::Arc;
use stockviz_core::cache::error::CacheError;
use stockviz_core::cache::port::{Cache, CacheExt};
use stockviz_core::common::TickerSymbol;
use stockviz_core::market::entity::CacheEntry;

/// # Summary
/// 以证券代码为键的持久化缓存门面，只由 `StockDataService` 持有。
///
/// # Invariants
/// - 底层键即归一化后的代码本身，与 `stock_data.symbol` 列一一对应。
/// - 值为 `CacheEntry` 的 JSON 序列化结果。
#[derive(Clone)]
pub struct TickerCache {
    backend: Arc<dyn Cache>,
}

impl TickerCache {
    pub fn new(backend: Arc<dyn Cache>) -> Self {
        Self { backend }
    }

    /// 是否已有该代码的条目。
    pub async fn exists(&self, symbol: &TickerSymbol) -> Result<bool, CacheError> {
        self.backend.exists(symbol.as_str()).await
    }

    /// # Summary
    /// 读取条目。
    ///
    /// # Returns
    /// 不存在返回 `None`；存在但无法反序列化返回 `CacheError::Deserialize`。
    pub async fn load(&self, symbol: &TickerSymbol) -> Result<Option<CacheEntry>, CacheError> {
        self.backend.get::<CacheEntry>(symbol.as_str()).await
    }

    /// 写入条目，已有同名条目时整体覆盖。
    pub async fn store(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        self.backend.set(entry.symbol.as_str(), entry).await
    }
}
