//! 应用配置加载和管理

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// 应用配置结构
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    #[serde(default)]
    pub summary: SummarySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub require_ssl: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub expiry_seconds: u64,
    pub refresh_expiry_days: u64,
    pub issuer: String,
    pub audience: String,
}

/// 汇总装配配置
#[derive(Debug, Clone, Deserialize)]
pub struct SummarySettings {
    /// 固定参考时区（按日/按月分组与图表标签均以此为准，与调用方时区无关）
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// 降采样目标桶数
    #[serde(default = "default_target_buckets")]
    pub target_buckets: usize,
    /// 单设备遥测拉取并发上限
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
    /// 单设备遥测拉取超时（秒），超时跳过该设备
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            target_buckets: default_target_buckets(),
            fetch_concurrency: default_fetch_concurrency(),
            fetch_timeout_seconds: default_fetch_timeout(),
        }
    }
}

fn default_timezone() -> String {
    "America/Santiago".to_string()
}

fn default_target_buckets() -> usize {
    1000
}

fn default_fetch_concurrency() -> usize {
    8
}

fn default_fetch_timeout() -> u64 {
    10
}

impl Settings {
    /// 从配置文件和环境变量加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let settings = Config::builder()
            // 加载默认配置
            .add_source(File::with_name("config/development"))
            // 根据环境加载对应配置
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // 环境变量覆盖，前缀 DALIA，分隔符 __
            .add_source(
                Environment::with_prefix("DALIA")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// 获取服务器地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
