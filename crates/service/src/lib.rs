//! # `stockviz-service` - 股票数据服务
//!
//! 抓取-缓存-供给管线的控制中心：校验代码、咨询缓存、未命中时访问上游、合并并持久化。

pub mod stock_data;
pub mod ticker_cache;
