//! 设备数据模型

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::EnergyReading;

/// 设备状态
///
/// `DoNotDisplay` 的设备对所有查询端点不可见：
/// 汇总中整体排除，详情端点返回 403（区别于 404，且响应体不含遥测）。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "device_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Active,
    Inactive,
    Maintenance,
    DoNotDisplay,
}

/// 设备类型
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "device_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Energy,
    Fuel,
}

/// 设备实体（设备目录条目）
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Device {
    pub id: Uuid,
    pub name: String,
    /// LoRaWAN 设备标识（遥测存储的关联键）
    pub dev_eui: String,
    pub status: DeviceStatus,
    #[sqlx(rename = "device_type")]
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub center_id: Uuid,
}

/// 创建设备请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDeviceRequest {
    #[validate(length(min = 1, max = 200, message = "设备名称长度应在 1-200 字符之间"))]
    pub name: String,

    #[validate(length(min = 8, max = 32, message = "设备 EUI 长度应在 8-32 字符之间"))]
    pub dev_eui: String,

    pub status: DeviceStatus,

    #[serde(rename = "type")]
    pub device_type: DeviceType,

    pub center_id: Uuid,
}

/// 设备详情：目录条目 + 最新一次解析成功的测量
///
/// 最新遥测文档解析失败时 `latest_measurement` 为 null（记日志），
/// 不影响目录部分的返回。
#[derive(Debug, Clone, Serialize)]
pub struct DeviceWithLatestData {
    #[serde(flatten)]
    pub device: Device,
    pub latest_measurement: Option<EnergyReading>,
}
