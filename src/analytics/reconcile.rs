//! 累计计数器对账引擎
//!
//! 电表的累计电量计数器在正常运行时单调递增，但设备重启或计数器
//! 溢出会使读数跌回接近零。本模块把"单调但偶有复位"的计数器序列
//! 换算成窗口内的真实非负消耗量，并支持按日/按月分组。
//!
//! 统一采用 **差值累加 + 复位点计入** 策略：逐对相邻读数求差，
//! 差值为负视为复位，以复位后的读数本身作为该段贡献（假设计数器
//! 从接近零重新起算）。`endpoint_difference` 作为被否决的备选策略
//! 保留实现与测试，禁止在业务路径中使用。

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use std::collections::BTreeMap;

/// 一次计数器采样
///
/// `value` 为 `None` 表示该时刻无读数，必须跳过，不能按 0 处理。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterSample {
    pub time: DateTime<Utc>,
    pub value: Option<f64>,
}

impl CounterSample {
    pub fn new(time: DateTime<Utc>, value: Option<f64>) -> Self {
        Self { time, value }
    }
}

/// 分组粒度（固定参考时区下的日历日/日历月）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Grouping {
    Day,
    Month,
}

/// 计算整个窗口的消耗总量（差值累加策略）
///
/// 有效读数不足 2 个时返回 `None`（数据不足），调用方按 0 或省略
/// 处理，不作为错误。结果恒 ≥ 0。
pub fn window_total(samples: &[CounterSample]) -> Option<f64> {
    let values: Vec<f64> = samples.iter().filter_map(|s| s.value).collect();
    if values.len() < 2 {
        return None;
    }
    Some(delta_sum(&values))
}

/// 端点差值策略：`max(last - first, 0)`
///
/// O(1) 但无法感知窗口中间的复位：复位后又超过起点会少报，
/// 复位后未恢复会整体报 0。仅作为文档化的备选保留，供测试对照。
pub fn endpoint_difference(samples: &[CounterSample]) -> Option<f64> {
    let values: Vec<f64> = samples.iter().filter_map(|s| s.value).collect();
    if values.len() < 2 {
        return None;
    }
    let first = values[0];
    let last = values[values.len() - 1];
    Some((last - first).max(0.0))
}

/// 按日/按月分组计算消耗量
///
/// 分组键使用固定参考时区下的日历日（`YYYY-MM-DD`）或日历月
/// （`YYYY-MM`）。每个周期需要至少 2 个有效读数才会产出结果，
/// 读数不足的周期直接省略，不补零。各周期只使用本周期内的读数
/// 独立执行差值累加。
pub fn grouped_totals(
    samples: &[CounterSample],
    grouping: Grouping,
    tz: Tz,
) -> BTreeMap<String, f64> {
    let mut periods: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for sample in samples {
        let value = match sample.value {
            Some(v) => v,
            None => continue,
        };
        let local = sample.time.with_timezone(&tz);
        let key = match grouping {
            Grouping::Day => format!("{:04}-{:02}-{:02}", local.year(), local.month(), local.day()),
            Grouping::Month => format!("{:04}-{:02}", local.year(), local.month()),
        };
        periods.entry(key).or_default().push(value);
    }

    periods
        .into_iter()
        .filter(|(_, values)| values.len() >= 2)
        .map(|(key, values)| (key, delta_sum(&values)))
        .collect()
}

/// 差值累加：逐对相邻读数求差，负差视为复位，计入复位后读数本身
fn delta_sum(values: &[f64]) -> f64 {
    let mut total = 0.0;
    for pair in values.windows(2) {
        let delta = pair[1] - pair[0];
        if delta < 0.0 {
            // 复位：以复位后的累计值作为该段贡献
            total += pair[1];
        } else {
            total += delta;
        }
    }
    total.max(0.0)
}

/// 瓦时 → 千瓦时（纯换算，必须在求和之后、展示之前调用）
pub fn wh_to_kwh(wh: f64) -> f64 {
    wh / 1000.0
}

/// 展示边界的四舍五入（2 位小数）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
