//! # `stockviz-chart` - 展示边界
//!
//! 把缓存/上游给出的原始 JSON 解析为强类型序列，截取尾部窗口并对齐，
//! 最终生成折线图组件可直接消费的图表规格。

pub mod error;
pub mod parser;
pub mod presenter;
pub mod series;
pub mod window;
