use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 以交易日为键的观测点。
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// # Summary
/// 单日复权收盘价。
///
/// # Invariants
/// - 同一序列内 `date` 唯一。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PricePoint {
    #[schema(value_type = String, example = "2021-05-10")]
    pub date: NaiveDate,
    pub adjusted_close: f64,
}

/// 单日 SMA 值。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SmaPoint {
    #[schema(value_type = String, example = "2021-05-10")]
    pub date: NaiveDate,
    pub value: f64,
}

impl Dated for PricePoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for SmaPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
