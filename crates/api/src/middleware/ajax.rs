//! # AJAX 请求校验中间件
//!
//! 数据接口只服务于页面脚本发起的异步请求，浏览器直接导航过来的请求一律拒绝。

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;

pub const REQUESTED_WITH_HEADER: &str = "x-requested-with";
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// 要求 `X-Requested-With: XMLHttpRequest`，否则返回 `NotAjax`。
pub async fn require_ajax(req: Request, next: Next) -> Result<Response, ApiError> {
    let is_ajax = req
        .headers()
        .get(REQUESTED_WITH_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case(XML_HTTP_REQUEST));

    if !is_ajax {
        tracing::warn!("Rejected non-AJAX request to {}", req.uri().path());
        return Err(ApiError::NotAjax);
    }

    Ok(next.run(req).await)
}
