//! 燃油汇总响应模型

use serde::Serialize;
use uuid::Uuid;

use crate::models::measurement::TankSlot;

/// 燃油罐传感器数据
#[derive(Debug, Clone, Serialize)]
pub struct FuelSensorData {
    #[serde(rename = "volume_L")]
    pub volume_l: f64,
    pub percentage: f64,
    #[serde(rename = "pressure_Bar")]
    pub pressure_bar: f64,
    pub sensor_ok: bool,
    #[serde(rename = "lastUpdate")]
    pub last_update: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// 燃油罐（一台设备产出 S0/S1/S2 三个罐）
#[derive(Debug, Clone, Serialize)]
pub struct FuelTank {
    /// "devEui-S{n}"
    pub id: String,
    pub name: String,
    pub capacity: i64,
    #[serde(rename = "fuelType")]
    pub fuel_type: String,
    pub sensor: FuelSensorData,
    #[serde(rename = "centerId")]
    pub center_id: Uuid,
}

/// 中心状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum FuelCenterStatus {
    /// 无罐数据
    Neutral,
    /// 所有传感器正常且库存充足
    Secure,
    /// 存在库存低于 20% 的罐
    Warning,
    /// 存在传感器故障
    Danger,
}

/// 燃油中心汇总
#[derive(Debug, Clone, Serialize)]
pub struct FuelCenter {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub status: FuelCenterStatus,
    pub tanks: Vec<FuelTank>,
    #[serde(rename = "totalCapacity")]
    pub total_capacity: i64,
    #[serde(rename = "currentInventory")]
    pub current_inventory: f64,
}

impl FuelCenter {
    /// 推导中心状态：传感器故障 > 低库存 > 正常；无罐为 neutral
    pub fn derive_status(tanks: &[FuelTank]) -> FuelCenterStatus {
        if tanks.is_empty() {
            return FuelCenterStatus::Neutral;
        }
        if tanks.iter().any(|t| !t.sensor.sensor_ok) {
            return FuelCenterStatus::Danger;
        }
        if tanks.iter().any(|t| t.sensor.percentage < 20.0) {
            return FuelCenterStatus::Warning;
        }
        FuelCenterStatus::Secure
    }
}

/// 罐位的展示属性（名称 / 容量 / 油品），按罐位槽号静态约定
pub fn tank_profile(slot: usize) -> (&'static str, i64, &'static str) {
    match slot {
        0 => ("Tanque S0 (Diesel)", 10_000, "Diesel"),
        1 => ("Tanque S1 (Gasolina)", 15_000, "Gasolina"),
        _ => ("Tanque S2 (Biodiesel)", 8_000, "Biodiesel"),
    }
}

/// 由罐位读数构建罐对象
pub fn tank_from_slot(
    dev_eui: &str,
    slot: usize,
    sensor: &TankSlot,
    last_update: String,
    latitude: f64,
    longitude: f64,
    center_id: Uuid,
) -> FuelTank {
    let (name, capacity, fuel_type) = tank_profile(slot);
    FuelTank {
        id: format!("{}-S{}", dev_eui, slot),
        name: name.to_string(),
        capacity,
        fuel_type: fuel_type.to_string(),
        sensor: FuelSensorData {
            volume_l: sensor.volume_l,
            percentage: sensor.percentage,
            pressure_bar: sensor.pressure_bar,
            sensor_ok: sensor.sensor_ok,
            last_update,
            latitude,
            longitude,
        },
        center_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank(sensor_ok: bool, percentage: f64) -> FuelTank {
        tank_from_slot(
            "a84041ffff000002",
            0,
            &TankSlot {
                volume_l: 1000.0,
                percentage,
                pressure_bar: 1.0,
                sensor_ok,
            },
            "2024-06-15T12:00:00Z".to_string(),
            0.0,
            0.0,
            Uuid::new_v4(),
        )
    }

    #[test]
    fn test_status_neutral_without_tanks() {
        assert_eq!(FuelCenter::derive_status(&[]), FuelCenterStatus::Neutral);
    }

    #[test]
    fn test_status_danger_on_sensor_failure() {
        let tanks = vec![tank(true, 80.0), tank(false, 10.0)];
        assert_eq!(
            FuelCenter::derive_status(&tanks),
            FuelCenterStatus::Danger,
            "传感器故障优先于低库存"
        );
    }

    #[test]
    fn test_status_warning_on_low_inventory() {
        let tanks = vec![tank(true, 80.0), tank(true, 15.0)];
        assert_eq!(FuelCenter::derive_status(&tanks), FuelCenterStatus::Warning);
    }

    #[test]
    fn test_status_secure() {
        let tanks = vec![tank(true, 80.0), tank(true, 55.0)];
        assert_eq!(FuelCenter::derive_status(&tanks), FuelCenterStatus::Secure);
    }
}
