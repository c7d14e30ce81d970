//! # 图表路由控制器
//!
//! 实现 `/render_chart/`：在服务端完成解析、截窗与对齐，经共享展示器渲染后返回图表规格。

use axum::extract::State;
use axum::Json;
use stockviz_chart::presenter::ChartInstance;
use stockviz_chart::window::{ChartWindow, WINDOW_SIZE};

use crate::error::ApiError;
use crate::extract::TickerInput;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, TickerForm};

/// 渲染某代码最近 500 个交易日的价格与 SMA 折线图
///
/// 每次渲染都会销毁上一张图表；出错时上一张图表保持不变。
#[utoipa::path(
    post,
    path = "/render_chart/",
    tag = "图表 (Chart)",
    params(
        ("X-Requested-With" = String, Header, description = "必须为 XMLHttpRequest")
    ),
    request_body(content = TickerForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "新的图表实例", body = ChartInstance),
        (status = 400, description = "代码为空、表单格式错误或非 AJAX 请求", body = ApiErrorResponse),
        (status = 502, description = "上游请求失败或数据不可解析", body = ApiErrorResponse),
        (status = 500, description = "缓存不可用", body = ApiErrorResponse)
    )
)]
pub async fn render_chart(
    State(state): State<AppState>,
    TickerInput(form): TickerInput,
) -> Result<Json<ChartInstance>, ApiError> {
    let payload = state.service.fetch_stock_data(&form.ticker).await?;
    let window = ChartWindow::from_payload(&payload, WINDOW_SIZE)?;

    let mut presenter = state.presenter.lock().await;
    let chart = presenter.render_window(&window)?;
    Ok(Json(chart))
}
