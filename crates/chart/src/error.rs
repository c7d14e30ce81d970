use thiserror::Error;

/// # Summary
/// 展示边界错误：原始文档结构不符，或绘图输入未对齐。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Series length mismatch: {dates} dates, {prices} prices, {sma} sma values")]
    LengthMismatch {
        dates: usize,
        prices: usize,
        sma: usize,
    },
}
