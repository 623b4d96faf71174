//! 通用数据结构

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 统一 API 响应结构
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
            timestamp: Utc::now(),
        }
    }

    /// 创建成功响应（无数据）
    pub fn success_message(message: &str) -> ApiResponse<()> {
        ApiResponse {
            code: 200,
            message: message.to_string(),
            data: None,
            timestamp: Utc::now(),
        }
    }

    /// 创建创建成功响应 (201)
    pub fn created(data: T) -> Self {
        Self {
            code: 201,
            message: "created".to_string(),
            data: Some(data),
            timestamp: Utc::now(),
        }
    }
}

/// 查询时间窗口（与前端选择器一一对应）
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub enum TimeRangeKey {
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "14d")]
    TwoWeeks,
    #[serde(rename = "30d")]
    Month,
}

impl Default for TimeRangeKey {
    fn default() -> Self {
        TimeRangeKey::Day
    }
}

impl TimeRangeKey {
    /// 窗口天数
    pub fn days(&self) -> i64 {
        match self {
            TimeRangeKey::Day => 1,
            TimeRangeKey::Week => 7,
            TimeRangeKey::TwoWeeks => 14,
            TimeRangeKey::Month => 30,
        }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub database: ServiceStatus,
}

/// 服务状态
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub status: String,
    pub latency_ms: Option<u64>,
}

impl ServiceStatus {
    pub fn healthy(latency_ms: u64) -> Self {
        Self {
            status: "healthy".to_string(),
            latency_ms: Some(latency_ms),
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            status: "unhealthy".to_string(),
            latency_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_days() {
        assert_eq!(TimeRangeKey::Day.days(), 1);
        assert_eq!(TimeRangeKey::Week.days(), 7);
        assert_eq!(TimeRangeKey::TwoWeeks.days(), 14);
        assert_eq!(TimeRangeKey::Month.days(), 30);
    }

    #[test]
    fn test_time_range_deserialize() {
        let key: TimeRangeKey = serde_json::from_str("\"7d\"").unwrap();
        assert_eq!(key, TimeRangeKey::Week);
    }
}
