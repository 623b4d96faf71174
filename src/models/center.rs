//! 中心数据模型
//!
//! 中心持有电价（每 kWh 单价），消耗成本 = 消耗量 × 电价。
//! 电价生命周期独立于遥测读数，仅通过管理端点更新。

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// 中心实体
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Center {
    pub id: Uuid,
    pub name: String,
    pub company_id: Uuid,
    /// 电价（每 kWh）
    pub price_per_kwh: f64,
}

/// 创建中心请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCenterRequest {
    #[validate(length(min = 1, max = 200, message = "中心名称长度应在 1-200 字符之间"))]
    pub name: String,

    pub company_id: Uuid,

    /// 初始电价，默认 0.15
    #[validate(range(min = 0.000001, message = "电价必须为正数"))]
    pub price_per_kwh: Option<f64>,
}

/// 更新中心请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCenterRequest {
    #[validate(length(min = 1, max = 200, message = "中心名称长度应在 1-200 字符之间"))]
    pub name: Option<String>,
}

/// 电价更新请求（拒绝非正电价，校验发生在任何写入之前）
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTariffRequest {
    #[validate(range(min = 0.000001, message = "电价必须为正数"))]
    pub price_per_kwh: f64,
}

/// 电价响应
#[derive(Debug, Clone, Serialize)]
pub struct TariffResponse {
    pub center_id: Uuid,
    pub price_per_kwh: f64,
}
