use std::path::Path;
use std::sync::Arc;

use stockviz_api::server::{AppState, start_server};
use stockviz_chart::presenter::ChartPresenter;
use stockviz_feed::alpha_vantage::AlphaVantageProvider;
use stockviz_service::stock_data::{StockDataConfig, StockDataService};
use stockviz_store::ticker::SqliteTickerStore;
use tracing::info;

mod settings;
mod telemetry;

/// 页面上唯一的图表渲染面
const CHART_SURFACE: &str = "stock-chart";

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 StockDataService。
///
/// # Logic
/// 1. 加载 `.env` 与配置。
/// 2. 初始化全局日志。
/// 3. 实例化基础设施层（Store、Feed）。
/// 4. 构造应用服务层（StockDataService、ChartPresenter）。
/// 5. 启动 HTTP 服务，直到收到退出信号。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载配置
    let dotenv = dotenvy::dotenv();
    let config = settings::load_config(
        Path::new(settings::DEFAULT_CONFIG_FILE),
        settings::process_env(),
        std::env::var(settings::API_KEY_ENV).ok(),
    )?;

    // 2. 初始化日志
    let data_dir = Path::new(&config.database.data_dir);
    let _log_guard = telemetry::init_tracing(data_dir)?;
    info!("StockViz starting...");
    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => tracing::debug!("No .env loaded: {}", e),
    }

    // 3. 实例化基础设施层
    let store = Arc::new(SqliteTickerStore::open(data_dir).await?);
    let feed = Arc::new(AlphaVantageProvider::new(&config.upstream)?);

    // 4. 构造应用服务层（注入 Core Trait 抽象）
    let service_config = StockDataConfig::from_app(&config);
    info!(
        use_cache = service_config.use_cache,
        max_age = ?service_config.max_age,
        dedupe_in_flight = service_config.dedupe_in_flight,
        "StockDataService initialized"
    );
    let service = StockDataService::new(feed, store, service_config);
    let state = AppState::new(service, ChartPresenter::new(CHART_SURFACE));

    // 5. 启动服务，阻塞至退出信号
    start_server(state, &config.server.bind_addr()).await?;
    info!("Shutdown complete. Exiting...");

    Ok(())
}
