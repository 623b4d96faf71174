//! 汇总装配纯逻辑集成测试
//!
//! 覆盖不依赖数据库的装配环节：文档解析、图表序列构建、
//! 告警推导、时间标签与燃油罐展开。

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use dalia::models::{
    tank_from_slot, EnergyReading, FuelCenter, FuelCenterStatus, FuelReading, MeasurementDoc,
    TimeRangeKey,
};
use dalia::services::{build_historical_series, derive_alerts};
use dalia::utils::time::chart_label;
use serde_json::json;

fn santiago() -> Tz {
    "America/Santiago".parse().unwrap()
}

fn doc(ts_min: i64, payload: serde_json::Value) -> MeasurementDoc {
    MeasurementDoc {
        device_eui: "a84041ffff000001".to_string(),
        time: Utc.timestamp_opt(1_718_400_000 + ts_min * 60, 0).unwrap(),
        payload,
    }
}

fn energy_doc(ts_min: i64, energy: f64, power: f64) -> MeasurementDoc {
    doc(
        ts_min,
        json!({
            "agg_activeEnergy": energy,
            "agg_activePower": power,
            "agg_voltage": 230.0,
            "agg_current": 12.0,
            "agg_powerFactor": 0.93,
            "agg_frequency": 50.0,
            "phaseA_thdI": 8.0,
        }),
    )
}

mod historical_series {
    use super::*;

    #[test]
    fn test_full_chart_table_is_produced() {
        let readings: Vec<EnergyReading> = (0..24)
            .map(|i| EnergyReading::parse(&energy_doc(i * 60, 1000.0 + i as f64, 400.0)).unwrap())
            .collect();

        let series = build_historical_series(&readings, 1, 1000, santiago());

        for name in [
            "consumption",
            "power",
            "voltage",
            "current",
            "powerFactor",
            "frequency",
            "reactivePower",
            "apparentPower",
            "thd_min",
            "thd_max",
        ] {
            assert!(series.contains_key(name), "缺少图表序列 {}", name);
        }
    }

    #[test]
    fn test_series_respects_target_buckets() {
        let readings: Vec<EnergyReading> = (0..500)
            .map(|i| EnergyReading::parse(&energy_doc(i, 1000.0 + i as f64, 400.0)).unwrap())
            .collect();

        let series = build_historical_series(&readings, 7, 100, santiago());
        for (name, pts) in &series {
            assert!(pts.len() <= 100, "{} 序列超出目标桶数: {}", name, pts.len());
        }
    }

    #[test]
    fn test_labels_follow_window_granularity() {
        // 窗口 1 天：HH:MM；窗口 7 天：DD-MM
        let t = Utc.with_ymd_and_hms(2024, 6, 15, 15, 30, 0).unwrap();
        assert_eq!(chart_label(t, 1, santiago()), "11:30");
        assert_eq!(chart_label(t, 7, santiago()), "15-06");

        let readings =
            vec![EnergyReading::parse(&energy_doc(0, 1000.0, 400.0)).unwrap()];
        let daily = build_historical_series(&readings, 1, 100, santiago());
        assert!(daily["power"][0].time.contains(':'), "短窗口标签应为时间格式");
        let weekly = build_historical_series(&readings, 7, 100, santiago());
        assert!(weekly["power"][0].time.contains('-'), "长窗口标签应为日期格式");
    }

    #[test]
    fn test_missing_counter_does_not_poison_gauges() {
        let readings = vec![
            EnergyReading::parse(&energy_doc(0, 100.0, 400.0)).unwrap(),
            EnergyReading::parse(&doc(1, json!({ "agg_activePower": 410.0 }))).unwrap(),
            EnergyReading::parse(&energy_doc(2, 120.0, 420.0)).unwrap(),
        ];

        let series = build_historical_series(&readings, 1, 100, santiago());
        assert_eq!(series["consumption"].len(), 2, "计数器缺失的读数应从消耗序列中跳过");
        assert_eq!(series["power"].len(), 3);
    }
}

mod alerts {
    use super::*;

    #[test]
    fn test_high_thd_produces_warning() {
        let reading = EnergyReading::parse(&doc(0, json!({ "phaseA_thdI": 65.5 }))).unwrap();
        let alerts = derive_alerts(&reading);
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.contains("65.5"));
    }

    #[test]
    fn test_normal_thd_produces_info() {
        let reading = EnergyReading::parse(&doc(0, json!({ "phaseA_thdI": 10.0 }))).unwrap();
        let alerts = derive_alerts(&reading);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].timestamp, reading.time, "告警时间戳来自读数本身");
    }
}

mod fuel {
    use super::*;

    #[test]
    fn test_device_expands_to_three_tanks() {
        let reading = FuelReading::parse(&doc(
            0,
            json!({
                "volume_L_S0": 5000.0, "percentage_S0": 50.0, "pressure_Bar_S0": 1.2, "sensor_0_ok": true,
                "volume_L_S1": 12000.0, "percentage_S1": 80.0, "pressure_Bar_S1": 1.4, "sensor_1_ok": true,
                "volume_L_S2": 1000.0, "percentage_S2": 12.5, "pressure_Bar_S2": 0.9, "sensor_2_ok": true,
                "latitude": -41.47, "longitude": -72.94
            }),
        ))
        .unwrap();

        let center_id = uuid::Uuid::new_v4();
        let tanks: Vec<_> = reading
            .tanks
            .iter()
            .enumerate()
            .map(|(slot, s)| {
                tank_from_slot(
                    "a84041ffff000001",
                    slot,
                    s,
                    "2024-06-15T00:00:00.000Z".to_string(),
                    reading.latitude,
                    reading.longitude,
                    center_id,
                )
            })
            .collect();

        assert_eq!(tanks.len(), 3);
        assert_eq!(tanks[0].id, "a84041ffff000001-S0");
        assert_eq!(tanks[1].fuel_type, "Gasolina");
        assert_eq!(tanks[2].capacity, 8_000);

        // S2 库存 12.5% < 20% → warning
        assert_eq!(FuelCenter::derive_status(&tanks), FuelCenterStatus::Warning);
    }

    #[test]
    fn test_sensor_failure_dominates_low_inventory() {
        let reading = FuelReading::parse(&doc(
            0,
            json!({
                "volume_L_S0": 100.0, "percentage_S0": 5.0, "pressure_Bar_S0": 1.0, "sensor_0_ok": true,
                "volume_L_S1": 9000.0, "percentage_S1": 60.0, "pressure_Bar_S1": 1.0, "sensor_1_ok": false,
                "volume_L_S2": 4000.0, "percentage_S2": 50.0, "pressure_Bar_S2": 1.0, "sensor_2_ok": true,
            }),
        ))
        .unwrap();

        let center_id = uuid::Uuid::new_v4();
        let tanks: Vec<_> = reading
            .tanks
            .iter()
            .enumerate()
            .map(|(slot, s)| {
                tank_from_slot("eui", slot, s, "t".to_string(), 0.0, 0.0, center_id)
            })
            .collect();

        assert_eq!(
            FuelCenter::derive_status(&tanks),
            FuelCenterStatus::Danger,
            "传感器故障优先于低库存"
        );
    }
}

mod query_params {
    use super::*;

    #[test]
    fn test_time_range_keys_map_to_days() {
        for (key, days) in [("1d", 1), ("7d", 7), ("14d", 14), ("30d", 30)] {
            let parsed: TimeRangeKey =
                serde_json::from_str(&format!("\"{}\"", key)).unwrap();
            assert_eq!(parsed.days(), days);
        }
    }

    #[test]
    fn test_unknown_time_range_is_rejected() {
        let parsed: Result<TimeRangeKey, _> = serde_json::from_str("\"90d\"");
        assert!(parsed.is_err(), "未知窗口键应为校验错误而非静默默认");
    }
}
