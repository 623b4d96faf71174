//! PostgreSQL/TimescaleDB 连接池管理
//!
//! 同一实例承载两类查询面：
//! - 设备目录（关系表：users/companies/centers/devices）
//! - 遥测存储（measurements 超表，按设备与时间范围查询）

use crate::config::Settings;
use crate::errors::AppError;
use crate::security::Secrets;
use secrecy::ExposeSecret;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;

/// PostgreSQL 连接池包装
#[derive(Clone)]
pub struct PostgresPool {
    pool: PgPool,
}

impl PostgresPool {
    /// 创建新的数据库连接池（连接 URL 来自密钥存储）
    pub async fn new(settings: &Settings) -> Result<Self, AppError> {
        let database_url = Secrets::get()?.database_url();

        let mut options = PgConnectOptions::from_str(database_url.expose_secret())
            .map_err(|e| AppError::ConfigError(format!("数据库 URL 无效: {}", e)))?;

        if settings.database.require_ssl {
            options = options.ssl_mode(PgSslMode::Require);
        }

        let pool = PgPoolOptions::new()
            .max_connections(settings.database.max_connections)
            .min_connections(settings.database.min_connections)
            .acquire_timeout(Duration::from_secs(
                settings.database.connect_timeout_seconds,
            ))
            .idle_timeout(Duration::from_secs(settings.database.idle_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!("数据库连接失败: {}", e);
                AppError::DatabaseError(e)
            })?;

        tracing::info!("数据库连接池已创建");

        Ok(Self { pool })
    }

    /// 获取内部连接池引用
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 健康检查
    ///
    /// 除连接可用外还要求 timescaledb 扩展就绪：
    /// 扩展缺失时遥测查询面（measurements 超表）不可用。
    pub async fn health_check(&self) -> Result<(), AppError> {
        let (timescale_ready,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM pg_extension WHERE extname = 'timescaledb')",
        )
        .fetch_one(&self.pool)
        .await?;

        if !timescale_ready {
            return Err(AppError::InternalError(
                "timescaledb 扩展未安装，遥测存储不可用".to_string(),
            ));
        }

        Ok(())
    }

    /// 运行数据库迁移
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::InternalError(format!("迁移失败: {}", e)))
    }
}
