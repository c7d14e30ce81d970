//! # `stockviz-core` - 领域核心
//!
//! 定义股票可视化管线中共享的实体、端口 (Port) 与错误类型。
//! 本 crate 不包含任何具体的 IO 实现，缓存、存储、行情源均由下游 crate 以适配器形式提供。

pub mod cache {
    pub mod error;
    pub mod port;
}

pub mod common;
pub mod config;

pub mod market {
    pub mod entity;
    pub mod error;
    pub mod port;
}

#[cfg(feature = "test-utils")]
pub mod testing;
