use crate::ticker_cache::TickerCache;
use chrono::Duration;
use dashmap::DashMap;
use std::sync::Arc;
use stockviz_core::cache::error::CacheError;
use stockviz_core::cache::port::Cache;
use stockviz_core::common::time::{RealTimeProvider, TimeProvider};
use stockviz_core::common::{InvalidTicker, TickerSymbol};
use stockviz_core::config::AppConfig;
use stockviz_core::market::entity::{CacheEntry, CombinedPayload};
use stockviz_core::market::error::MarketError;
use stockviz_core::market::port::MarketDataProvider;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// # Summary
/// 服务层的统一错误类型。
#[derive(Error, Debug)]
pub enum StockDataError {
    #[error(transparent)]
    InvalidTicker(#[from] InvalidTicker),
    #[error("Upstream error for {symbol}: {source}")]
    Upstream {
        symbol: TickerSymbol,
        #[source]
        source: MarketError,
    },
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// # Summary
/// 服务的显式配置，构造时注入。
#[derive(Debug, Clone)]
pub struct StockDataConfig {
    // 是否优先返回已缓存的数据
    pub use_cache: bool,
    // 条目最大有效期，None 为永久有效
    pub max_age: Option<Duration>,
    // 同一代码的并发未命中是否共享一次上游往返
    pub dedupe_in_flight: bool,
}

impl Default for StockDataConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            max_age: None,
            dedupe_in_flight: false,
        }
    }
}

impl StockDataConfig {
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            use_cache: config.cache.enabled,
            max_age: config
                .cache
                .max_age_secs
                .and_then(|secs| i64::try_from(secs).ok())
                .and_then(Duration::try_seconds),
            dedupe_in_flight: config.service.dedupe_in_flight,
        }
    }
}

/// # Summary
/// 股票数据服务，抓取-缓存-供给管线的门面 (Facade)。
/// 编译期仅依赖 `stockviz-core` 中的 Trait 定义，具体的行情源与存储通过构造函数注入。
///
/// # Invariants
/// - 唯一读写 `TickerCache` 的组件。
/// - 不重试上游或缓存操作，任何失败都原样向上传播，且不会缓存或返回部分结果。
/// - 默认不对同一代码的并发未命中去重；开启 `dedupe_in_flight` 后以每代码一把异步锁串行化。
pub struct StockDataService {
    // 上游行情源
    provider: Arc<dyn MarketDataProvider>,
    // 按代码索引的持久化缓存
    cache: TickerCache,
    // 写入时间与过期判断的时钟
    clock: Arc<dyn TimeProvider>,
    config: StockDataConfig,
    // 正在处理未命中的代码，Value 为该代码的串行化锁
    in_flight: DashMap<TickerSymbol, Arc<Mutex<()>>>,
}

impl StockDataService {
    /// # Summary
    /// 创建服务实例，使用系统时钟。
    ///
    /// # Arguments
    /// * `provider` - 上游行情源的具体实现。
    /// * `cache` - KV 存储的具体实现。
    /// * `config` - 缓存咨询与去重策略。
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        cache: Arc<dyn Cache>,
        config: StockDataConfig,
    ) -> Arc<Self> {
        Self::with_clock(provider, cache, config, Arc::new(RealTimeProvider))
    }

    pub fn with_clock(
        provider: Arc<dyn MarketDataProvider>,
        cache: Arc<dyn Cache>,
        config: StockDataConfig,
        clock: Arc<dyn TimeProvider>,
    ) -> Arc<Self> {
        Arc::new(Self {
            provider,
            cache: TickerCache::new(cache),
            clock,
            config,
            in_flight: DashMap::new(),
        })
    }

    pub fn config(&self) -> &StockDataConfig {
        &self.config
    }

    /// # Summary
    /// 获取某代码的合并数据。
    ///
    /// # Logic
    /// 1. 归一化代码 (去空白、转大写)，为空立即返回 `InvalidTicker`，不触碰缓存与上游。
    /// 2. 若开启缓存咨询：存在新鲜条目则原样返回，不访问上游。
    /// 3. 未命中 (或关闭咨询) 时并发请求价格与 SMA 两个端点，任一失败即整体失败。
    /// 4. 合并为新的 `CombinedPayload`，写透缓存后返回。
    ///
    /// # Arguments
    /// * `raw_ticker` - 用户原始输入。
    ///
    /// # Returns
    /// * `Result<CombinedPayload, StockDataError>`
    pub async fn fetch_stock_data(&self, raw_ticker: &str) -> Result<CombinedPayload, StockDataError> {
        let symbol = TickerSymbol::parse(raw_ticker)?;

        if !self.config.use_cache {
            debug!(%symbol, "cache consultation disabled");
            return self.fetch_and_store(&symbol).await;
        }

        if let Some(payload) = self.lookup(&symbol).await? {
            return Ok(payload);
        }

        if !self.config.dedupe_in_flight {
            return self.fetch_and_store(&symbol).await;
        }

        let gate = self.in_flight.entry(symbol.clone()).or_default().clone();
        let result = {
            let _guard = gate.lock().await;
            // 等锁期间可能已有其它请求写入
            match self.lookup(&symbol).await {
                Ok(Some(payload)) => Ok(payload),
                Ok(None) => self.fetch_and_store(&symbol).await,
                Err(e) => Err(e),
            }
        };
        // 只剩注册表与本请求持有时移除
        self.in_flight
            .remove_if(&symbol, |_, g| Arc::strong_count(g) <= 2);
        result
    }

    /// 先做存在性检查再读取，过期条目视为未命中。
    async fn lookup(&self, symbol: &TickerSymbol) -> Result<Option<CombinedPayload>, StockDataError> {
        if !self.cache.exists(symbol).await? {
            debug!(%symbol, "cache miss");
            return Ok(None);
        }
        match self.cache.load(symbol).await? {
            Some(entry) if entry.is_fresh(self.clock.now(), self.config.max_age) => {
                info!(%symbol, stored_at = %entry.stored_at, "cache hit");
                Ok(Some(entry.payload))
            }
            Some(entry) => {
                info!(%symbol, stored_at = %entry.stored_at, "cache entry expired");
                Ok(None)
            }
            None => {
                debug!(%symbol, "cache miss");
                Ok(None)
            }
        }
    }

    /// # Summary
    /// 访问上游并写透缓存。
    ///
    /// # Logic
    /// 两个请求同时发出且都会跑完，保证每次未命中恰好两次上游调用；
    /// 价格端点的错误优先上报。写缓存失败时不返回载荷。
    async fn fetch_and_store(&self, symbol: &TickerSymbol) -> Result<CombinedPayload, StockDataError> {
        info!(%symbol, "querying upstream");
        let (prices, sma) = tokio::join!(
            self.provider.fetch_daily_adjusted(symbol),
            self.provider.fetch_sma(symbol),
        );

        let upstream = |source: MarketError| {
            warn!(%symbol, error = %source, "upstream request failed");
            StockDataError::Upstream {
                symbol: symbol.clone(),
                source,
            }
        };
        let prices = prices.map_err(upstream)?;
        let sma = sma.map_err(upstream)?;

        let entry = CacheEntry {
            symbol: symbol.clone(),
            payload: CombinedPayload::new(prices, sma),
            stored_at: self.clock.now(),
        };
        self.cache.store(&entry).await?;
        info!(%symbol, "stored fresh payload");

        Ok(entry.payload)
    }
}
