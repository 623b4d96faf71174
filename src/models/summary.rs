//! 电量汇总响应模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// 图表数据点（time 为参考时区下已格式化的标签）
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartPoint {
    pub time: String,
    pub value: f64,
}

/// 设备静态信息（目录元数据）
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub name: String,
    /// 设备标识（dev_eui）
    pub identifier: String,
    /// 位置标签（中心名称派生）
    pub location: String,
}

/// 告警级别
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Error,
}

/// 设备告警（由最新读数推导，不允许伪造数据）
#[derive(Debug, Clone, Serialize)]
pub struct DeviceAlert {
    pub id: i32,
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// 单设备汇总（每次请求即时构建，不做跨请求缓存）
#[derive(Debug, Clone, Serialize)]
pub struct DeviceSummary {
    pub id: Uuid,
    /// 最新测量文档的时间
    pub time: DateTime<Utc>,
    #[serde(rename = "deviceInfo")]
    pub device_info: DeviceInfo,
    /// 最新文档的全部数值字段
    #[serde(rename = "latestFields")]
    pub latest_fields: BTreeMap<String, f64>,
    /// 图表序列：图表名 → 时间有序数据点
    #[serde(rename = "historicalSeries")]
    pub historical_series: BTreeMap<String, Vec<ChartPoint>>,
    /// 窗口内消耗总量（kWh，展示边界四舍五入到 2 位）
    #[serde(rename = "totalConsumption")]
    pub total_consumption: f64,
    /// 分相消耗（kWh）：[A, B, C]
    #[serde(rename = "consumptionByPhase")]
    pub consumption_by_phase: [f64; 3],
    /// 预估成本 = 消耗总量 × 中心电价
    #[serde(rename = "estimatedCost")]
    pub estimated_cost: f64,
    pub alerts: Vec<DeviceAlert>,
}

/// 消耗明细分组粒度
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumptionGrouping {
    Day,
    Month,
}

impl Default for ConsumptionGrouping {
    fn default() -> Self {
        ConsumptionGrouping::Day
    }
}

/// 单个周期的消耗量
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PeriodConsumptionPoint {
    /// 周期键：按日 "YYYY-MM-DD"，按月 "YYYY-MM"（参考时区）
    pub period: String,
    /// 消耗量（kWh）
    pub consumption: f64,
}

/// 消耗明细请求参数
#[derive(Debug, Clone, Deserialize)]
pub struct ConsumptionBreakdown {
    #[serde(default)]
    pub time_range: crate::models::TimeRangeKey,
    #[serde(default)]
    pub grouping: ConsumptionGrouping,
}

/// 设备消耗明细响应
#[derive(Debug, Clone, Serialize)]
pub struct DeviceConsumptionResponse {
    #[serde(rename = "deviceInfo")]
    pub device_info: DeviceInfo,
    /// 各周期消耗量，时间升序
    pub breakdown: Vec<PeriodConsumptionPoint>,
    #[serde(rename = "totalConsumption")]
    pub total_consumption: f64,
    #[serde(rename = "avgPeriodConsumption")]
    pub avg_period_consumption: f64,
    #[serde(rename = "estimatedCost")]
    pub estimated_cost: f64,
}
