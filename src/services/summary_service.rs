//! 电量汇总装配服务
//!
//! 按"用户 → 公司 → 中心 → 设备"解析访问范围，再对每台设备独立
//! 拉取遥测、执行计数器对账与降采样，合并成响应对象。
//!
//! 并发模型：设备目录解析完全落地之后才开始遥测拉取；各设备之间
//! 相互独立，以固定并发上限扇出；单设备内部"最新读数"与"历史
//! 窗口"两次拉取并发执行，各自受单设备超时约束。任何单设备的
//! 超时或文档格式错误只记日志并跳过该设备，绝不中断整批汇总。

use crate::analytics::downsample::{downsample, DownsampledSeries, FieldPolicy, RawPoint};
use crate::analytics::reconcile::{self, CounterSample, Grouping};
use crate::config::Settings;
use crate::errors::AppError;
use crate::models::{
    AlertSeverity, Center, ChartPoint, ConsumptionGrouping, Device, DeviceAlert,
    DeviceConsumptionResponse, DeviceInfo, DeviceStatus, DeviceSummary, DeviceType, EnergyReading,
    PeriodConsumptionPoint, TimeRangeKey,
};
use crate::repositories::{CenterRepository, DeviceRepository, TelemetryRepository, UserRepository};
use crate::utils::time::{chart_label, parse_timezone};
use chrono::{Duration as ChronoDuration, Utc};
use chrono_tz::Tz;
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio::time::timeout;
use uuid::Uuid;

/// 图表字段静态策略表：图表名 → payload 字段 → 聚合策略
///
/// 策略是静态分类：累计计数器取桶末值，瞬时量取均值，
/// THD 毛刺敏感取 min/max（产出 thd_min / thd_max 两条序列）。
const CHART_FIELDS: &[(&str, FieldPolicy)] = &[
    ("agg_activeEnergy", FieldPolicy::Last),
    ("agg_activePower", FieldPolicy::Average),
    ("agg_voltage", FieldPolicy::Average),
    ("agg_current", FieldPolicy::Average),
    ("agg_powerFactor", FieldPolicy::Average),
    ("agg_frequency", FieldPolicy::Average),
    ("phaseA_thdI", FieldPolicy::MinMax),
    ("agg_reactivePower", FieldPolicy::Average),
    ("agg_apparentPower", FieldPolicy::Average),
];

/// payload 字段 → 响应中的图表名
fn chart_name(field: &str) -> &'static str {
    match field {
        "agg_activeEnergy" => "consumption",
        "agg_activePower" => "power",
        "agg_voltage" => "voltage",
        "agg_current" => "current",
        "agg_powerFactor" => "powerFactor",
        "agg_frequency" => "frequency",
        "phaseA_thdI" => "thd",
        "agg_reactivePower" => "reactivePower",
        "agg_apparentPower" => "apparentPower",
        _ => "unknown",
    }
}

/// 历史窗口查询的字段投影（图表字段 + 分相电量计数器）
const HISTORY_PROJECTION: &[&str] = &[
    "agg_activeEnergy",
    "agg_activePower",
    "agg_voltage",
    "agg_current",
    "agg_powerFactor",
    "agg_frequency",
    "phaseA_thdI",
    "agg_reactivePower",
    "agg_apparentPower",
    "phaseA_activeEnergy",
    "phaseB_activeEnergy",
    "phaseC_activeEnergy",
];

/// 消耗明细查询只需要电量计数器
const COUNTER_PROJECTION: &[&str] = &[
    "agg_activeEnergy",
    "phaseA_activeEnergy",
    "phaseB_activeEnergy",
    "phaseC_activeEnergy",
];

/// 电量汇总装配服务
pub struct SummaryService {
    user_repo: UserRepository,
    device_repo: DeviceRepository,
    center_repo: CenterRepository,
    telemetry_repo: TelemetryRepository,
    tz: Tz,
    target_buckets: usize,
    fetch_concurrency: usize,
    fetch_timeout: Duration,
}

impl SummaryService {
    pub fn new(
        user_repo: UserRepository,
        device_repo: DeviceRepository,
        center_repo: CenterRepository,
        telemetry_repo: TelemetryRepository,
        settings: &Settings,
    ) -> Result<Self, AppError> {
        Ok(Self {
            user_repo,
            device_repo,
            center_repo,
            telemetry_repo,
            tz: parse_timezone(&settings.summary.timezone)?,
            target_buckets: settings.summary.target_buckets,
            fetch_concurrency: settings.summary.fetch_concurrency.max(1),
            fetch_timeout: Duration::from_secs(settings.summary.fetch_timeout_seconds),
        })
    }

    /// 用户可见的全部电量设备汇总
    pub async fn energy_summary(
        &self,
        user_id: Uuid,
        range: TimeRangeKey,
    ) -> Result<Vec<DeviceSummary>, AppError> {
        // 目录解析必须完全落地后才开始遥测拉取
        let company_ids = self.user_repo.company_ids(user_id).await?;
        if company_ids.is_empty() {
            return Ok(vec![]);
        }

        let devices = self
            .device_repo
            .list_visible_by_companies(&company_ids, DeviceType::Energy)
            .await?;

        let centers: HashMap<Uuid, Center> = self
            .center_repo
            .list_by_companies(&company_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let end = Utc::now();
        let start = end - ChronoDuration::days(range.days());

        let mut summaries: Vec<DeviceSummary> = stream::iter(devices)
            .map(|device| {
                let center = centers.get(&device.center_id).cloned();
                async move { self.assemble_device(device, center, start, end, range.days()).await }
            })
            .buffer_unordered(self.fetch_concurrency)
            .filter_map(|summary| async move { summary })
            .collect()
            .await;

        // 扇出不保证顺序，输出前恢复稳定排序
        summaries.sort_by(|a, b| a.device_info.name.cmp(&b.device_info.name));

        Ok(summaries)
    }

    /// 装配单台设备的汇总；任何失败都只影响这一台设备
    async fn assemble_device(
        &self,
        device: Device,
        center: Option<Center>,
        start: chrono::DateTime<Utc>,
        end: chrono::DateTime<Utc>,
        window_days: i64,
    ) -> Option<DeviceSummary> {
        let center = match center {
            Some(c) => c,
            None => {
                tracing::warn!(device_id = %device.id, "设备所属中心缺失，跳过");
                return None;
            }
        };

        // 最新读数与历史窗口相互独立，并发拉取，各自受超时约束
        let latest_fut = timeout(
            self.fetch_timeout,
            self.telemetry_repo.find_latest(&device.dev_eui),
        );
        let range_fut = timeout(
            self.fetch_timeout,
            self.telemetry_repo
                .find_range(&device.dev_eui, start, end, Some(HISTORY_PROJECTION)),
        );
        let (latest_res, range_res) = tokio::join!(latest_fut, range_fut);

        let latest_doc = match latest_res {
            Err(_) => {
                tracing::warn!(dev_eui = %device.dev_eui, "最新读数拉取超时，跳过设备");
                return None;
            }
            Ok(Err(e)) => {
                tracing::warn!(dev_eui = %device.dev_eui, error = %e, "最新读数拉取失败，跳过设备");
                return None;
            }
            // 无遥测的设备不出现在汇总中（非错误，非零占位）
            Ok(Ok(None)) => {
                tracing::debug!(dev_eui = %device.dev_eui, "设备无遥测数据，跳过");
                return None;
            }
            Ok(Ok(Some(doc))) => doc,
        };

        let history_docs = match range_res {
            Err(_) => {
                tracing::warn!(dev_eui = %device.dev_eui, "历史窗口拉取超时，跳过设备");
                return None;
            }
            Ok(Err(e)) => {
                tracing::warn!(dev_eui = %device.dev_eui, error = %e, "历史窗口拉取失败，跳过设备");
                return None;
            }
            Ok(Ok(docs)) => docs,
        };

        // 最新文档解析失败视为该设备遥测损坏，跳过（只记日志）
        let latest = match EnergyReading::parse(&latest_doc) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(dev_eui = %device.dev_eui, error = %e, "最新测量文档格式错误，跳过设备");
                return None;
            }
        };

        // 历史文档逐条解析，损坏的单条文档跳过，不影响其余
        let readings: Vec<EnergyReading> = history_docs
            .iter()
            .filter_map(|doc| match EnergyReading::parse(doc) {
                Ok(r) => Some(r),
                Err(_) => {
                    tracing::debug!(dev_eui = %device.dev_eui, time = %doc.time, "历史文档格式错误，跳过该条");
                    None
                }
            })
            .collect();

        let historical_series =
            build_historical_series(&readings, window_days, self.target_buckets, self.tz);

        // 窗口消耗：聚合 + 分相，统一差值累加策略，数据不足按 0
        let total_kwh = counter_total_kwh(&readings, |r| r.active_energy);
        let phase_kwh = [
            counter_total_kwh(&readings, |r| r.phase_a_active_energy),
            counter_total_kwh(&readings, |r| r.phase_b_active_energy),
            counter_total_kwh(&readings, |r| r.phase_c_active_energy),
        ];

        Some(DeviceSummary {
            id: device.id,
            time: latest_doc.time,
            device_info: DeviceInfo {
                name: device.name,
                identifier: device.dev_eui,
                location: center.name.clone(),
            },
            latest_fields: latest_doc.numeric_fields(),
            historical_series,
            total_consumption: total_kwh,
            consumption_by_phase: phase_kwh,
            estimated_cost: reconcile::round2(total_kwh * center.price_per_kwh),
            alerts: derive_alerts(&latest),
        })
    }

    /// 单设备消耗明细（按日/按月分组，真实月度实现，不再伪造数据）
    pub async fn device_consumption(
        &self,
        user_id: Uuid,
        is_admin: bool,
        device_id: Uuid,
        range: TimeRangeKey,
        grouping: ConsumptionGrouping,
    ) -> Result<DeviceConsumptionResponse, AppError> {
        let device = self
            .device_repo
            .find_by_id(device_id)
            .await?
            .ok_or_else(|| AppError::NotFound("设备不存在".to_string()))?;

        // 范围校验：设备存在但不在调用方可访问的公司下 → 403
        if !is_admin {
            let company_ids = self.user_repo.company_ids(user_id).await?;
            if company_ids.is_empty()
                || !self
                    .device_repo
                    .belongs_to_companies(device_id, &company_ids)
                    .await?
            {
                return Err(AppError::Forbidden("无权访问此设备".to_string()));
            }
        }

        // "不予显示"返回 403（区别于 404），且不携带任何遥测字段
        if device.status == DeviceStatus::DoNotDisplay {
            return Err(AppError::Forbidden("设备不可见".to_string()));
        }

        let center = self
            .center_repo
            .find_by_id(device.center_id)
            .await?
            .ok_or_else(|| AppError::NotFound("中心不存在".to_string()))?;

        let end = Utc::now();
        let start = end - ChronoDuration::days(range.days());

        let docs = self
            .telemetry_repo
            .find_range(&device.dev_eui, start, end, Some(COUNTER_PROJECTION))
            .await?;

        let samples: Vec<CounterSample> = docs
            .iter()
            .filter_map(|doc| EnergyReading::parse(doc).ok())
            .map(|r| CounterSample::new(r.time, r.active_energy))
            .collect();

        let grouping = match grouping {
            ConsumptionGrouping::Day => Grouping::Day,
            ConsumptionGrouping::Month => Grouping::Month,
        };

        // 读数不足的周期直接省略；整个窗口数据不足按 0 处理，不报错
        let breakdown: Vec<PeriodConsumptionPoint> =
            reconcile::grouped_totals(&samples, grouping, self.tz)
                .into_iter()
                .map(|(period, wh)| PeriodConsumptionPoint {
                    period,
                    consumption: reconcile::round2(reconcile::wh_to_kwh(wh)),
                })
                .collect();

        let total_kwh = reconcile::window_total(&samples)
            .map(|wh| reconcile::round2(reconcile::wh_to_kwh(wh)))
            .unwrap_or(0.0);

        let avg = if breakdown.is_empty() {
            0.0
        } else {
            reconcile::round2(total_kwh / breakdown.len() as f64)
        };

        Ok(DeviceConsumptionResponse {
            device_info: DeviceInfo {
                name: device.name,
                identifier: device.dev_eui,
                location: center.name,
            },
            breakdown,
            total_consumption: total_kwh,
            avg_period_consumption: avg,
            estimated_cost: reconcile::round2(total_kwh * center.price_per_kwh),
        })
    }
}

/// 窗口消耗（kWh，已四舍五入）：数据不足按 0
fn counter_total_kwh<F>(readings: &[EnergyReading], field: F) -> f64
where
    F: Fn(&EnergyReading) -> Option<f64>,
{
    let samples: Vec<CounterSample> = readings
        .iter()
        .map(|r| CounterSample::new(r.time, field(r)))
        .collect();

    reconcile::window_total(&samples)
        .map(|wh| reconcile::round2(reconcile::wh_to_kwh(wh)))
        .unwrap_or(0.0)
}

/// 由类型化读数构建全部图表序列
///
/// 瞬时量缺失已在解析层按 0 处理；消耗序列来自累计计数器，
/// 缺失读数在此跳过。历史为空时各图表为空序列（不报错）。
pub fn build_historical_series(
    readings: &[EnergyReading],
    window_days: i64,
    target_buckets: usize,
    tz: Tz,
) -> BTreeMap<String, Vec<ChartPoint>> {
    let mut series = BTreeMap::new();

    for (field, policy) in CHART_FIELDS {
        let points: Vec<RawPoint> = readings
            .iter()
            .filter_map(|r| gauge_or_counter(r, field).map(|v| RawPoint::new(r.time, v)))
            .collect();

        match downsample(&points, target_buckets, *policy) {
            DownsampledSeries::Single(buckets) => {
                series.insert(
                    chart_name(field).to_string(),
                    to_chart_points(buckets, window_days, tz),
                );
            }
            DownsampledSeries::MinMax { min, max } => {
                let name = chart_name(field);
                series.insert(
                    format!("{}_min", name),
                    to_chart_points(min, window_days, tz),
                );
                series.insert(
                    format!("{}_max", name),
                    to_chart_points(max, window_days, tz),
                );
            }
        }
    }

    series
}

fn gauge_or_counter(reading: &EnergyReading, field: &str) -> Option<f64> {
    match field {
        "agg_activeEnergy" => reading.active_energy,
        "agg_activePower" => Some(reading.active_power),
        "agg_voltage" => Some(reading.voltage),
        "agg_current" => Some(reading.current),
        "agg_powerFactor" => Some(reading.power_factor),
        "agg_frequency" => Some(reading.frequency),
        "phaseA_thdI" => Some(reading.thd),
        "agg_reactivePower" => Some(reading.reactive_power),
        "agg_apparentPower" => Some(reading.apparent_power),
        _ => None,
    }
}

fn to_chart_points(
    buckets: Vec<crate::analytics::downsample::BucketPoint>,
    window_days: i64,
    tz: Tz,
) -> Vec<ChartPoint> {
    buckets
        .into_iter()
        .map(|b| ChartPoint {
            time: chart_label(b.time, window_days, tz),
            value: b.value,
        })
        .collect()
}

/// 由最新读数推导告警（只来自真实读数，禁止伪造）
pub fn derive_alerts(reading: &EnergyReading) -> Vec<DeviceAlert> {
    if reading.thd > 60.0 {
        vec![DeviceAlert {
            id: 1,
            severity: AlertSeverity::Warning,
            message: format!("A 相电流 THD 偏高: {:.1}%", reading.thd),
            timestamp: reading.time,
        }]
    } else {
        vec![DeviceAlert {
            id: 2,
            severity: AlertSeverity::Info,
            message: "用电平稳".to_string(),
            timestamp: reading.time,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reading(ts_min: i64, energy: Option<f64>, power: f64, thd: f64) -> EnergyReading {
        EnergyReading {
            time: Utc.timestamp_opt(1_700_000_000 + ts_min * 60, 0).unwrap(),
            active_power: power,
            reactive_power: 0.0,
            apparent_power: 0.0,
            voltage: 230.0,
            current: 10.0,
            power_factor: 0.95,
            frequency: 50.0,
            thd,
            active_energy: energy,
            phase_a_active_energy: None,
            phase_b_active_energy: None,
            phase_c_active_energy: None,
        }
    }

    #[test]
    fn test_series_contains_all_charts() {
        let tz: Tz = "America/Santiago".parse().unwrap();
        let readings: Vec<EnergyReading> = (0..10)
            .map(|i| reading(i, Some(100.0 + i as f64), 500.0, 5.0))
            .collect();

        let series = build_historical_series(&readings, 1, 100, tz);

        // 8 个单序列 + thd_min/thd_max
        assert_eq!(series.len(), 10);
        assert!(series.contains_key("consumption"));
        assert!(series.contains_key("power"));
        assert!(series.contains_key("thd_min"));
        assert!(series.contains_key("thd_max"));
        assert_eq!(series["power"].len(), 10, "低于目标桶数应直通");
    }

    #[test]
    fn test_empty_history_gives_empty_series() {
        let tz: Tz = "America/Santiago".parse().unwrap();
        let series = build_historical_series(&[], 7, 100, tz);

        assert!(!series.is_empty(), "图表键应齐全");
        for (name, points) in &series {
            assert!(points.is_empty(), "{} 应为空序列而非错误", name);
        }
    }

    #[test]
    fn test_consumption_series_skips_absent_counters() {
        let tz: Tz = "America/Santiago".parse().unwrap();
        let readings = vec![
            reading(0, Some(100.0), 500.0, 5.0),
            reading(1, None, 510.0, 5.0), // 计数器缺失：消耗序列跳过
            reading(2, Some(120.0), 520.0, 5.0),
        ];

        let series = build_historical_series(&readings, 1, 100, tz);
        assert_eq!(series["consumption"].len(), 2);
        assert_eq!(series["power"].len(), 3, "瞬时量不受计数器缺失影响");
    }

    #[test]
    fn test_derive_alerts_thresholds() {
        let high = derive_alerts(&reading(0, None, 0.0, 72.3));
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].severity, AlertSeverity::Warning);
        assert!(high[0].message.contains("72.3"));

        let ok = derive_alerts(&reading(0, None, 0.0, 12.0));
        assert_eq!(ok[0].severity, AlertSeverity::Info);
    }
}
