//! # API 统一错误处理
//!
//! 将下层各 crate 的错误类型统一映射到 HTTP 状态码与 JSON 响应体。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use stockviz_chart::error::ChartError;
use stockviz_service::stock_data::StockDataError;
use thiserror::Error;

use crate::types::ApiErrorResponse;

pub const NOT_AJAX_MESSAGE: &str = "Not Ajax";

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求参数错误 (400)
    #[error("请求参数错误: {0}")]
    BadRequest(String),

    /// 缺少 `X-Requested-With: XMLHttpRequest` (400)
    #[error("{}", NOT_AJAX_MESSAGE)]
    NotAjax,

    /// 上游行情源失败或返回了不可用的数据 (502)
    #[error("上游服务错误: {0}")]
    BadGateway(String),

    /// 下层业务错误 (500)
    #[error("内部服务错误: {0}")]
    Internal(String),
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotAjax => (StatusCode::BAD_REQUEST, NOT_AJAX_MESSAGE.to_string()),
            ApiError::BadGateway(msg) => {
                tracing::warn!("上游服务错误: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            ApiError::Internal(msg) => {
                // 内部错误只记录日志，不向客户端透传细节
                tracing::error!("内部服务错误: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "服务器内部错误".to_string(),
                )
            }
        };

        let body = Json(ApiErrorResponse::from_msg(message));
        (status, body).into_response()
    }
}

/// 从 `StockDataError` 转换
impl From<StockDataError> for ApiError {
    fn from(err: StockDataError) -> Self {
        match &err {
            StockDataError::InvalidTicker(_) => ApiError::BadRequest(err.to_string()),
            StockDataError::Upstream { .. } => ApiError::BadGateway(err.to_string()),
            StockDataError::Cache(_) => ApiError::Internal(err.to_string()),
        }
    }
}

/// 从 `ChartError` 转换：解析失败源自上游文档，未对齐属于内部缺陷。
impl From<ChartError> for ApiError {
    fn from(err: ChartError) -> Self {
        match &err {
            ChartError::Parse(_) => ApiError::BadGateway(err.to_string()),
            ChartError::LengthMismatch { .. } => ApiError::Internal(err.to_string()),
        }
    }
}
