//! # 单页外壳
//!
//! 页面脚本以 AJAX 调用 `/render_chart/`，用返回的规格重建折线图。

use axum::response::Html;

const HOME_PAGE: &str = include_str!("../../static/home.html");

/// 返回单页外壳
#[utoipa::path(
    get,
    path = "/",
    tag = "页面 (Page)",
    responses(
        (status = 200, description = "HTML 单页", content_type = "text/html", body = String)
    )
)]
pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}
