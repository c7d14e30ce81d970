use crate::error::ChartError;
use crate::parser::{parse_price_meta, parse_price_series, parse_sma_series};
use crate::series::Dated;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use stockviz_core::market::entity::CombinedPayload;
use utoipa::ToSchema;

/// 图表展示的交易日数量
pub const WINDOW_SIZE: usize = 500;

/// # Summary
/// 截取尾部窗口：最近 `window_size` 个交易日，按日期升序排列。
///
/// # Logic
/// 1. 复制输入并按日期稳定排序为升序 (上游通常是降序，但不作假设)。
/// 2. 保留最后 `window_size` 个元素；不足时原样返回全部，不填充也不报错。
///
/// 纯函数，对同一输入总是产出同一结果。
pub fn select_trailing_window<T: Dated + Clone>(series: &[T], window_size: usize) -> Vec<T> {
    let mut ordered = series.to_vec();
    ordered.sort_by_key(|p| p.date());
    let start = ordered.len().saturating_sub(window_size);
    ordered.split_off(start)
}

/// # Summary
/// 已对齐的绘图输入。
///
/// # Invariants
/// - `dates`、`prices`、`sma` 等长，按下标一一对应。
/// - `dates` 严格升序。
/// - 某日没有 SMA 值时对应位置为 `None` (图上断开)。
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartWindow {
    pub symbol: String,
    // 形如 `AAPL (last refreshed 2021-05-10)`
    pub title: String,
    pub dates: Vec<String>,
    pub prices: Vec<f64>,
    pub sma: Vec<Option<f64>>,
}

impl ChartWindow {
    /// # Summary
    /// 从合并载荷构造窗口。
    ///
    /// # Logic
    /// 1. 解析价格元数据、价格序列与 SMA 序列，元数据只用于标题。
    /// 2. 对价格序列截取尾部窗口。
    /// 3. 以价格日期为轴，按日期查找对应的 SMA 值。
    pub fn from_payload(payload: &CombinedPayload, window_size: usize) -> Result<Self, ChartError> {
        let meta = parse_price_meta(payload.prices())?;
        let prices = select_trailing_window(&parse_price_series(payload.prices())?, window_size);
        let sma_by_date: HashMap<NaiveDate, f64> = parse_sma_series(payload.sma())?
            .into_iter()
            .map(|p| (p.date, p.value))
            .collect();

        Ok(Self {
            title: format!("{} (last refreshed {})", meta.symbol, meta.last_refreshed),
            symbol: meta.symbol,
            dates: prices.iter().map(|p| p.date.format("%Y-%m-%d").to_string()).collect(),
            sma: prices.iter().map(|p| sma_by_date.get(&p.date).copied()).collect(),
            prices: prices.iter().map(|p| p.adjusted_close).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::PricePoint;

    fn descending(n: usize) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let mut series: Vec<PricePoint> = start
            .iter_days()
            .take(n)
            .zip(0u32..)
            .map(|(date, i)| PricePoint {
                date,
                adjusted_close: f64::from(i),
            })
            .collect();
        series.reverse();
        series
    }

    #[test]
    fn test_window_takes_most_recent_ascending() {
        let series = descending(600);
        let window = select_trailing_window(&series, WINDOW_SIZE);

        assert_eq!(window.len(), 500);
        assert!(window.windows(2).all(|w| w[0].date < w[1].date));
        // 最近的 500 天 = 降序输入的前 500 个
        assert_eq!(window.last().unwrap().date, series[0].date);
        assert_eq!(window.first().unwrap().date, series[499].date);
    }

    #[test]
    fn test_short_series_returned_whole_ascending() {
        let series = descending(3);
        let window = select_trailing_window(&series, WINDOW_SIZE);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].date, series[2].date);
        assert_eq!(window[2].date, series[0].date);
    }

    #[test]
    fn test_window_is_idempotent() {
        let once = select_trailing_window(&descending(600), WINDOW_SIZE);
        let twice = select_trailing_window(&once, WINDOW_SIZE);
        assert_eq!(once, twice);

        let short = select_trailing_window(&descending(42), WINDOW_SIZE);
        assert_eq!(select_trailing_window(&short, WINDOW_SIZE), short);
    }

    #[test]
    fn test_empty_series() {
        let empty: Vec<PricePoint> = Vec::new();
        assert!(select_trailing_window(&empty, WINDOW_SIZE).is_empty());
        assert!(select_trailing_window(&descending(5), 0).is_empty());
    }
}
