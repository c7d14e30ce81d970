//! 配置加载：默认值 → 可选的 TOML 文件 → `STOCKVIZ__SECTION__KEY` 环境变量。

use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use stockviz_core::config::AppConfig;

pub const DEFAULT_CONFIG_FILE: &str = "config/stockviz.toml";
pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

/// # Summary
/// 组装 `AppConfig`。
///
/// # Logic
/// 1. 未出现的字段一律取 `Default` 中的值。
/// 2. `file` 不存在时跳过。
/// 3. `env` 中 `STOCKVIZ__` 前缀的变量覆盖文件中的值。
/// 4. 仍未配置 API Key 时回退到 `fallback_api_key` (即 `ALPHAVANTAGE_API_KEY`)。
pub fn load_config(
    file: &Path,
    env: Environment,
    fallback_api_key: Option<String>,
) -> Result<AppConfig, ConfigError> {
    let mut config: AppConfig = Config::builder()
        .add_source(File::from(file).required(false))
        .add_source(env)
        .build()?
        .try_deserialize()?;

    if config.upstream.api_key.is_empty() {
        config.upstream.api_key = fallback_api_key.unwrap_or_default();
    }
    Ok(config)
}

/// 进程环境中的 `STOCKVIZ__*` 变量
pub fn process_env() -> Environment {
    Environment::with_prefix("STOCKVIZ")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
