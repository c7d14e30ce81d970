//! # `stockviz-api` - HTTP 接入层
//!
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 提供单页外壳 (`GET /`)
//! - 校验 AJAX 请求头后把表单中的代码交给 `StockDataService`
//! - 把领域错误映射为结构化的 HTTP 错误响应

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod types;
