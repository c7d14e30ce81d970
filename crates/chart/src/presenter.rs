use crate::error::ChartError;
use crate::window::ChartWindow;
use serde::Serialize;
use tracing::{debug, info};
use utoipa::ToSchema;

pub const PRICE_LABEL: &str = "Daily Adjusted Close";
pub const SMA_LABEL: &str = "Simple Moving Average (SMA)";

const PRICE_COLOR: &str = "rgba(54, 162, 235, 1)";
const PRICE_FILL: &str = "rgba(54, 162, 235, 0.2)";
const SMA_COLOR: &str = "rgba(255, 99, 132, 1)";
const SMA_FILL: &str = "rgba(255, 99, 132, 0.2)";

/// # Summary
/// 折线图规格，浏览器端图表组件可直接消费。
///
/// # Invariants
/// - `data.labels` 与每个数据集的 `data` 等长。
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartData {
    // 共享的类目轴 (日期)
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    // null 表示该日无值，图上断开
    pub data: Vec<Option<f64>>,
    pub border_color: String,
    pub background_color: String,
    pub fill: bool,
    pub point_radius: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartOptions {
    pub responsive: bool,
    pub title: ChartTitle,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartTitle {
    pub display: bool,
    pub text: String,
}

/// 渲染面上的一个图表实例。
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartInstance {
    // 同一渲染面内单调递增
    pub id: u64,
    pub surface: String,
    pub spec: ChartSpec,
}

/// # Summary
/// 单一渲染面的图表展示器。
///
/// # Invariants
/// - 任意时刻至多一个活动实例。
/// - 从不原地更新：每次渲染先销毁旧实例，再创建新实例。
/// - 输入校验失败时旧实例保持不变。
#[derive(Debug)]
pub struct ChartPresenter {
    surface: String,
    current: Option<ChartInstance>,
    next_id: u64,
    destroyed: u64,
}

impl ChartPresenter {
    pub fn new(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            current: None,
            next_id: 1,
            destroyed: 0,
        }
    }

    /// # Summary
    /// 绘制价格与 SMA 两条折线。
    ///
    /// # Logic
    /// 1. 校验三个序列等长，不等返回 `LengthMismatch`。
    /// 2. 销毁渲染面上的旧实例 (若有)。
    /// 3. 以日期为类目轴构造两个数据集，创建并登记新实例。
    ///
    /// # Arguments
    /// * `dates` - 升序日期标签。
    /// * `prices` - 复权收盘价。
    /// * `sma` - SMA 值，`None` 为缺口。
    /// * `title` - 图表标题。
    ///
    /// # Returns
    /// 新实例的副本。
    pub fn render_chart(
        &mut self,
        dates: &[String],
        prices: &[f64],
        sma: &[Option<f64>],
        title: &str,
    ) -> Result<ChartInstance, ChartError> {
        if dates.len() != prices.len() || dates.len() != sma.len() {
            return Err(ChartError::LengthMismatch {
                dates: dates.len(),
                prices: prices.len(),
                sma: sma.len(),
            });
        }

        if let Some(old) = self.current.take() {
            self.destroyed += 1;
            debug!(surface = %self.surface, id = old.id, "destroyed previous chart");
        }

        let spec = ChartSpec {
            kind: "line".to_string(),
            data: ChartData {
                labels: dates.to_vec(),
                datasets: vec![
                    dataset(PRICE_LABEL, prices.iter().copied().map(Some).collect(), PRICE_COLOR, PRICE_FILL),
                    dataset(SMA_LABEL, sma.to_vec(), SMA_COLOR, SMA_FILL),
                ],
            },
            options: ChartOptions {
                responsive: true,
                title: ChartTitle {
                    display: true,
                    text: title.to_string(),
                },
            },
        };

        let instance = ChartInstance {
            id: self.next_id,
            surface: self.surface.clone(),
            spec,
        };
        self.next_id += 1;
        info!(surface = %self.surface, id = instance.id, points = dates.len(), %title, "rendered chart");

        self.current = Some(instance.clone());
        Ok(instance)
    }

    /// 以已对齐窗口渲染。
    pub fn render_window(&mut self, window: &ChartWindow) -> Result<ChartInstance, ChartError> {
        self.render_chart(&window.dates, &window.prices, &window.sma, &window.title)
    }

    pub fn current(&self) -> Option<&ChartInstance> {
        self.current.as_ref()
    }

    pub fn active_instances(&self) -> usize {
        usize::from(self.current.is_some())
    }

    pub fn destroyed_instances(&self) -> u64 {
        self.destroyed
    }
}

fn dataset(label: &str, data: Vec<Option<f64>>, border: &str, background: &str) -> Dataset {
    Dataset {
        label: label.to_string(),
        data,
        border_color: border.to_string(),
        background_color: background.to_string(),
        fill: false,
        point_radius: 0,
    }
}
