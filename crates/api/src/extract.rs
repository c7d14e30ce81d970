//! # 自定义提取器
//!
//! 让表单解析失败同样走 `ApiError`，客户端只会看到结构化的 JSON 错误体。

use axum::Form;
use axum::extract::{FromRequest, Request};

use crate::error::ApiError;
use crate::types::TickerForm;

/// 从 `application/x-www-form-urlencoded` 请求体中提取代码表单
pub struct TickerInput(pub TickerForm);

impl<S> FromRequest<S> for TickerInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(form) = Form::<TickerForm>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::warn!("Rejected ticker form: {}", rejection.body_text());
                ApiError::BadRequest(rejection.body_text())
            })?;
        Ok(TickerInput(form))
    }
}
