//! 时间处理工具
//!
//! 按日/按月分组与图表标签统一使用固定参考时区，
//! 与调用方所在时区无关。

use crate::errors::AppError;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// 解析参考时区名称
pub fn parse_timezone(name: &str) -> Result<Tz, AppError> {
    name.parse::<Tz>()
        .map_err(|_| AppError::ConfigError(format!("无效的时区名称: {}", name)))
}

/// 图表时间标签（集中决策，一处格式化）
///
/// 窗口大于 1 天时只保留日期（粗粒度），否则只保留时间（细粒度）。
pub fn chart_label(time: DateTime<Utc>, window_days: i64, tz: Tz) -> String {
    let local = time.with_timezone(&tz);
    if window_days > 1 {
        local.format("%d-%m").to_string()
    } else {
        local.format("%H:%M").to_string()
    }
}

/// 格式化为 ISO 8601
pub fn format_iso8601(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timezone() {
        assert!(parse_timezone("America/Santiago").is_ok());
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_chart_label_granularity() {
        let tz = parse_timezone("America/Santiago").unwrap();
        // 2024-06-15 15:30 UTC = 11:30 在圣地亚哥（UTC-4，冬令时）
        let t = Utc.with_ymd_and_hms(2024, 6, 15, 15, 30, 0).unwrap();

        assert_eq!(chart_label(t, 1, tz), "11:30", "窗口 ≤ 1 天应为时间标签");
        assert_eq!(chart_label(t, 7, tz), "15-06", "窗口 > 1 天应为日期标签");
    }
}
