//! # 股票数据路由控制器
//!
//! 实现 `/get_stock_data/`：返回某代码的合并原始数据，命中缓存时不访问上游。

use axum::extract::State;
use axum::Json;
use stockviz_core::market::entity::CombinedPayload;

use crate::error::ApiError;
use crate::extract::TickerInput;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, TickerForm};

/// 获取合并后的价格与 SMA 数据
///
/// 代码先归一化 (去空白、转大写)，再查缓存，未命中时请求上游并写透缓存。
#[utoipa::path(
    post,
    path = "/get_stock_data/",
    tag = "股票数据 (Stock Data)",
    params(
        ("X-Requested-With" = String, Header, description = "必须为 XMLHttpRequest")
    ),
    request_body(content = TickerForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "合并数据", body = CombinedPayload),
        (status = 400, description = "代码为空、表单格式错误或非 AJAX 请求", body = ApiErrorResponse),
        (status = 502, description = "上游请求失败", body = ApiErrorResponse),
        (status = 500, description = "缓存不可用", body = ApiErrorResponse)
    )
)]
pub async fn get_stock_data(
    State(state): State<AppState>,
    TickerInput(form): TickerInput,
) -> Result<Json<CombinedPayload>, ApiError> {
    let payload = state.service.fetch_stock_data(&form.ticker).await?;
    Ok(Json(payload))
}
