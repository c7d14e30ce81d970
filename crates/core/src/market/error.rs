use thiserror::Error;

/// # Summary
/// 上游行情接口错误枚举，处理网络、状态码、接口级错误与解析问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum MarketError {
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 请求超过超时预算
    #[error("Upstream request timed out")]
    Timeout,
    // 上游返回非 2xx 状态码
    #[error("Upstream returned HTTP {0}")]
    Status(u16),
    // 上游限流 (HTTP 429 或 200 + "Note"/"Information")
    #[error("Rate limited by upstream: {0}")]
    RateLimited(String),
    // 上游返回的错误文档，如无效代码
    #[error("Upstream API error: {0}")]
    Api(String),
    // 响应体不是预期的 JSON 结构
    #[error("Parse error: {0}")]
    Parse(String),
}
