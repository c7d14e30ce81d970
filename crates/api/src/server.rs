//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::sync::Arc;

use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use stockviz_chart::presenter::ChartPresenter;
use stockviz_service::stock_data::StockDataService;

use crate::routes::{chart, home, stock};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - `service` 与 `presenter` 在服务启动前由 DI 容器注入，生命周期与进程等同。
/// - 展示器被异步锁串行化，最后完成的渲染即当前图表。
#[derive(Clone)]
pub struct AppState {
    /// 抓取-缓存-供给管线 (Facade)
    pub service: Arc<StockDataService>,
    /// 单一渲染面的图表展示器
    pub presenter: Arc<Mutex<ChartPresenter>>,
}

impl AppState {
    pub fn new(service: Arc<StockDataService>, presenter: ChartPresenter) -> Self {
        Self {
            service,
            presenter: Arc::new(Mutex::new(presenter)),
        }
    }
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "StockViz API",
        version = "0.1.0",
        description = "日线复权价格与 10 日 SMA 的抓取、缓存与图表接口。",
        license(name = "MIT")
    ),
    tags(
        (name = "页面 (Page)", description = "单页外壳"),
        (name = "股票数据 (Stock Data)", description = "合并后的原始上游数据"),
        (name = "图表 (Chart)", description = "最近 500 个交易日的折线图规格")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建完整的 axum 应用路由树 (含 Swagger UI 与 CORS)。
pub fn build_router(state: AppState) -> Router {
    // 1. 公开页面
    let page_router = OpenApiRouter::new().routes(routes!(home::home));

    // 2. 只接受 AJAX 请求的数据接口
    let ajax_router = OpenApiRouter::new()
        .routes(routes!(stock::get_stock_data))
        .routes(routes!(chart::render_chart))
        .layer(axum::middleware::from_fn(
            crate::middleware::ajax::require_ajax,
        ));

    // 3. 合并所有路由与自动收集的 OpenAPI Doc
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(page_router)
        .merge(ajax_router)
        .with_state(state)
        .split_for_parts();

    // 4. 配置 CORS (开发阶段允许所有来源)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
}

/// 构建路由并启动 HTTP 监听。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:8080"`
pub async fn start_server(state: AppState, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    tracing::info!("StockViz server listening on {}", bind_addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
