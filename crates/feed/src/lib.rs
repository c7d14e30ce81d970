//! 上游行情源适配器。

pub mod alpha_vantage;
