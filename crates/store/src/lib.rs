//! 持久化适配器：以 SQLite 实现核心的 `Cache` 端口。

pub mod ticker;
