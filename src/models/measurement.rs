//! 测量文档模型与显式解析器
//!
//! 遥测存储中的文档是"字段名 → 数值"的扁平映射。这里不做动态的
//! "忽略多余 / 缺失补默认"校验，而是按字段逐一声明策略：
//!
//! - 瞬时量（功率、电压、电流、功率因数、频率、THD 等）：缺失按 0；
//! - 累计计数器（有功电量，聚合与分相）：缺失保持 `None`，
//!   对账引擎必须跳过而不能按 0（按 0 会被误判为计数器复位）;
//! - payload 不是 JSON 对象：结构化校验错误，调用方记日志后跳过。

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use std::collections::BTreeMap;

use crate::errors::AppError;

/// 遥测存储中的一条原始测量文档
#[derive(Debug, Clone, FromRow)]
pub struct MeasurementDoc {
    pub device_eui: String,
    pub time: DateTime<Utc>,
    pub payload: Value,
}

impl MeasurementDoc {
    /// 提取 payload 中所有数值字段（用于响应中的 latestFields）
    pub fn numeric_fields(&self) -> BTreeMap<String, f64> {
        match self.payload.as_object() {
            Some(map) => map
                .iter()
                .filter_map(|(k, v)| v.as_f64().map(|n| (k.clone(), n)))
                .collect(),
            None => BTreeMap::new(),
        }
    }
}

/// 从 JSON 对象取数值字段
fn num(obj: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

/// 从 JSON 对象取数值字段，缺失按 0（仅限瞬时量）
fn num_or_zero(obj: &serde_json::Map<String, Value>, key: &str) -> f64 {
    num(obj, key).unwrap_or(0.0)
}

/// 电量设备的一次类型化读数
#[derive(Debug, Clone, Serialize)]
pub struct EnergyReading {
    pub time: DateTime<Utc>,

    // 瞬时量（缺失按 0）
    pub active_power: f64,
    pub reactive_power: f64,
    pub apparent_power: f64,
    pub voltage: f64,
    pub current: f64,
    pub power_factor: f64,
    pub frequency: f64,
    /// A 相电流谐波畸变率（告警推导使用 A 相）
    pub thd: f64,

    // 累计计数器（缺失保持 None，由对账引擎跳过）
    pub active_energy: Option<f64>,
    pub phase_a_active_energy: Option<f64>,
    pub phase_b_active_energy: Option<f64>,
    pub phase_c_active_energy: Option<f64>,
}

impl EnergyReading {
    /// 解析一条电量测量文档
    pub fn parse(doc: &MeasurementDoc) -> Result<Self, AppError> {
        let obj = doc.payload.as_object().ok_or_else(|| {
            AppError::ValidationError("测量 payload 不是 JSON 对象".to_string())
        })?;

        Ok(Self {
            time: doc.time,
            active_power: num_or_zero(obj, "agg_activePower"),
            reactive_power: num_or_zero(obj, "agg_reactivePower"),
            apparent_power: num_or_zero(obj, "agg_apparentPower"),
            voltage: num_or_zero(obj, "agg_voltage"),
            current: num_or_zero(obj, "agg_current"),
            power_factor: num_or_zero(obj, "agg_powerFactor"),
            frequency: num_or_zero(obj, "agg_frequency"),
            thd: num_or_zero(obj, "phaseA_thdI"),
            active_energy: num(obj, "agg_activeEnergy"),
            phase_a_active_energy: num(obj, "phaseA_activeEnergy"),
            phase_b_active_energy: num(obj, "phaseB_activeEnergy"),
            phase_c_active_energy: num(obj, "phaseC_activeEnergy"),
        })
    }
}

/// 燃油设备单个罐位的传感器读数
#[derive(Debug, Clone, Serialize)]
pub struct TankSlot {
    pub volume_l: f64,
    pub percentage: f64,
    pub pressure_bar: f64,
    pub sensor_ok: bool,
}

/// 燃油设备的一次类型化读数（一台设备带 S0/S1/S2 三个罐位）
#[derive(Debug, Clone, Serialize)]
pub struct FuelReading {
    pub time: DateTime<Utc>,
    pub tanks: [TankSlot; 3],
    pub latitude: f64,
    pub longitude: f64,
}

impl FuelReading {
    /// 解析一条燃油测量文档
    pub fn parse(doc: &MeasurementDoc) -> Result<Self, AppError> {
        let obj = doc.payload.as_object().ok_or_else(|| {
            AppError::ValidationError("测量 payload 不是 JSON 对象".to_string())
        })?;

        let slot = |i: usize| TankSlot {
            volume_l: num_or_zero(obj, &format!("volume_L_S{}", i)),
            percentage: num_or_zero(obj, &format!("percentage_S{}", i)),
            pressure_bar: num_or_zero(obj, &format!("pressure_Bar_S{}", i)),
            sensor_ok: obj
                .get(&format!("sensor_{}_ok", i))
                .and_then(Value::as_bool)
                .unwrap_or(false),
        };

        Ok(Self {
            time: doc.time,
            tanks: [slot(0), slot(1), slot(2)],
            latitude: num_or_zero(obj, "latitude"),
            longitude: num_or_zero(obj, "longitude"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn doc(payload: Value) -> MeasurementDoc {
        MeasurementDoc {
            device_eui: "a84041ffff000001".to_string(),
            time: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
            payload,
        }
    }

    #[test]
    fn test_energy_parse_gauges_default_zero() {
        let reading = EnergyReading::parse(&doc(json!({
            "agg_activePower": 1200.5,
            "agg_voltage": 230.0
        })))
        .unwrap();

        assert_eq!(reading.active_power, 1200.5);
        assert_eq!(reading.voltage, 230.0);
        assert_eq!(reading.frequency, 0.0, "缺失的瞬时量按 0 处理");
    }

    #[test]
    fn test_energy_parse_counters_stay_absent() {
        let reading = EnergyReading::parse(&doc(json!({
            "agg_activePower": 500.0
        })))
        .unwrap();

        assert_eq!(reading.active_energy, None, "缺失的累计计数器必须保持 None");
        assert_eq!(reading.phase_a_active_energy, None);
    }

    #[test]
    fn test_energy_parse_rejects_non_object() {
        assert!(EnergyReading::parse(&doc(json!("oops"))).is_err());
        assert!(EnergyReading::parse(&doc(json!(null))).is_err());
    }

    #[test]
    fn test_fuel_parse_three_slots() {
        let reading = FuelReading::parse(&doc(json!({
            "volume_L_S0": 5000.0, "percentage_S0": 50.0, "pressure_Bar_S0": 1.2, "sensor_0_ok": true,
            "volume_L_S1": 3000.0, "percentage_S1": 20.0, "pressure_Bar_S1": 1.1, "sensor_1_ok": true,
            "latitude": -41.47, "longitude": -72.94
        })))
        .unwrap();

        assert_eq!(reading.tanks[0].volume_l, 5000.0);
        assert!(reading.tanks[0].sensor_ok);
        assert_eq!(reading.tanks[1].percentage, 20.0);
        assert!(!reading.tanks[2].sensor_ok, "缺失的传感器状态按故障处理");
        assert_eq!(reading.tanks[2].volume_l, 0.0);
        assert_eq!(reading.latitude, -41.47);
    }

    #[test]
    fn test_numeric_fields_extraction() {
        let d = doc(json!({
            "agg_voltage": 230.0,
            "model": 3,
            "note": "not-a-number"
        }));
        let fields = d.numeric_fields();
        assert_eq!(fields.len(), 2, "非数值字段应被过滤");
        assert_eq!(fields["agg_voltage"], 230.0);
    }
}
