use tracing::debug;

/// # Summary
/// 为 rustls 安装进程级的 ring 加密后端。
///
/// # Logic
/// reqwest 以 `rustls-no-provider` 方式编译，首次建立 HTTPS 连接前必须存在默认后端。
/// 重复调用是安全的，已安装时仅记录一条调试日志。
pub fn ensure_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}
