//! # DTO (Data Transfer Object) 层
//!
//! 面向前端的请求/响应结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 代码查询表单 (`application/x-www-form-urlencoded`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TickerForm {
    /// 用户输入的证券代码，大小写与首尾空白不敏感
    #[schema(example = "aapl")]
    #[serde(default)]
    pub ticker: String,
}

/// 构建失败响应 (不含泛型载荷)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    #[schema(example = "Not Ajax")]
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}
