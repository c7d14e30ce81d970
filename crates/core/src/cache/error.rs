use thiserror::Error;

/// # Summary
/// 缓存域错误枚举，覆盖序列化失败与底层存储不可用。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum CacheError {
    // 条目序列化失败
    #[error("Serialize error: {0}")]
    Serialize(String),
    // 已存条目无法反序列化 (格式损坏或版本不兼容)
    #[error("Deserialize error: {0}")]
    Deserialize(String),
    // 存储引擎无法连接或初始化
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    // 读写语句执行失败
    #[error("Storage error: {0}")]
    Storage(String),
}
