//! Dalia - 多租户物联网遥测报表后端
//!
//! 面向能源与燃油监控设备的报表服务，支持：
//! - 累计计数器对账（复位感知的消耗量计算）
//! - 时间分桶降采样（图表序列压缩）
//! - 多设备并发汇总装配
//! - 公司 / 中心 / 设备三级目录与访问范围控制

pub mod analytics;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod security;
pub mod services;
pub mod utils;

pub use errors::AppError;
