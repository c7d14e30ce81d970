use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
};
use std::path::Path;
use std::time::Duration;
use stockviz_core::cache::error::CacheError;
use stockviz_core::cache::port::Cache;
use tracing::{debug, info};

/// 默认数据库文件名
pub const DEFAULT_TICKER_DB: &str = "stockviz.db";

/// Cache 端口的 SQLite 实现，即持久化的股票数据缓存。
///
/// # Summary
/// 在单张 `stock_data` 表中以证券代码为主键保存一份不透明的序列化载荷。
///
/// # Invariants
/// * 表结构在实例创建时初始化，没有二级索引，也没有过期列。
/// * 所有操作均通过共享的 `SqlitePool` 执行。
/// * 写入为 upsert，同一代码始终只有一行。
pub struct SqliteTickerStore {
    pool: SqlitePool,
}

impl SqliteTickerStore {
    /// 在 `data_dir` 下打开 (必要时创建) 数据库并初始化表结构。
    ///
    /// # Logic
    /// 1. 确保数据目录存在。
    /// 2. 配置 SQLite 连接选项，开启 `create_if_missing` 与 WAL。
    /// 3. 连接并执行 DDL。
    ///
    /// # Arguments
    /// * `data_dir` - 数据根目录，由配置显式传入。
    ///
    /// # Returns
    /// * `Result<Self, CacheError>` - 存储实例或 `Unavailable` 错误。
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let root = data_dir.as_ref();
        std::fs::create_dir_all(root).map_err(|e| CacheError::Unavailable(e.to_string()))?;

        let db_path = root.join(DEFAULT_TICKER_DB);
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stock_data (
                symbol TEXT PRIMARY KEY,
                data TEXT NOT NULL
            );
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        info!("Ticker store opened at {}", db_path.display());
        Ok(Self { pool })
    }

    /// 已保存的代码数量。
    pub async fn count(&self) -> Result<i64, CacheError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stock_data")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CacheError::Storage(e.to_string()))
    }
}

#[async_trait]
impl Cache for SqliteTickerStore {
    /// # Summary
    /// 以 upsert 方式写入载荷。
    ///
    /// # Logic
    /// 载荷必须是 UTF-8 (JSON 文本)，否则视为序列化错误；主键冲突时整体替换 `data` 列。
    async fn set_raw(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let text = String::from_utf8(value).map_err(|e| CacheError::Serialize(e.to_string()))?;
        sqlx::query(
            r#"
            INSERT INTO stock_data (symbol, data) VALUES (?, ?)
            ON CONFLICT(symbol) DO UPDATE SET data = excluded.data
            "#,
        )
        .bind(key)
        .bind(text)
        .execute(&self.pool)
        .await
        .map_err(|e| CacheError::Storage(e.to_string()))?;
        debug!(symbol = key, "ticker store write");
        Ok(())
    }

    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let row = sqlx::query_scalar::<_, String>("SELECT data FROM stock_data WHERE symbol = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        Ok(row.map(String::into_bytes))
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM stock_data WHERE symbol = ?)",
        )
        .bind(key)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CacheError::Storage(e.to_string()))?;
        Ok(found != 0)
    }
}
