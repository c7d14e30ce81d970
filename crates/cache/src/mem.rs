use async_trait::async_trait;
use dashmap::DashMap;
use stockviz_core::cache::error::CacheError;
use stockviz_core::cache::port::Cache;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::trace;

/// # Summary
/// 基于 DashMap 的内存缓存实现。
///
/// # Invariants
/// - 所有操作均通过并发哈希表 `DashMap` 执行，保证多线程安全。
/// - 不提供自动过期或容量限制，数据由业务逻辑管理。
/// - 写入次数被单独计数，便于测试断言"恰好写入一次"。
pub struct MemCache {
    // 线程安全的 KV 存储容器
    storage: DashMap<String, Vec<u8>>,
    // 累计 set_raw 调用次数
    writes: AtomicUsize,
}

impl MemCache {
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
            writes: AtomicUsize::new(0),
        }
    }

    /// 当前保存的键数量。
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// 自创建以来的写入次数 (覆盖写也计数)。
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for MemCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemCache {
    /// # Summary
    /// 设置原始字节数据。
    ///
    /// # Logic
    /// 将 Key 转换为 String 后与 Value 一并插入哈希表。若存在同名 Key 则覆盖。
    async fn set_raw(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        trace!(key, bytes = value.len(), "mem cache write");
        self.storage.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// # Summary
    /// 获取原始字节数据。
    ///
    /// # Logic
    /// 从哈希表中检索 Key 对应的引用，并将其克隆为独立的所有权对象返回。
    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.storage.get(key).map(|v| v.value().clone()))
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.storage.contains_key(key))
    }
}
