//! 遥测存储数据仓库
//!
//! measurements 超表被视为只追加的时间有序日志，按设备标识与时间
//! 范围查询。payload 不是 JSON 对象的文档（空载荷、格式损坏）
//! 在查询层直接排除，不进入上层处理。

use crate::db::PostgresPool;
use crate::errors::AppError;
use crate::models::MeasurementDoc;
use chrono::{DateTime, Utc};

/// 遥测存储数据仓库
#[derive(Clone)]
pub struct TelemetryRepository {
    pool: PostgresPool,
}

impl TelemetryRepository {
    pub fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }

    /// 某设备的最新一条测量文档
    pub async fn find_latest(&self, dev_eui: &str) -> Result<Option<MeasurementDoc>, AppError> {
        let doc = sqlx::query_as::<_, MeasurementDoc>(
            r#"
            SELECT device_eui, time, payload FROM measurements
            WHERE device_eui = $1 AND jsonb_typeof(payload) = 'object'
            ORDER BY time DESC
            LIMIT 1
            "#,
        )
        .bind(dev_eui)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(doc)
    }

    /// 某设备时间范围内的测量文档（时间升序）
    ///
    /// `projection` 给定时只保留列出的 payload 字段，
    /// 减少长窗口查询的传输量。
    pub async fn find_range(
        &self,
        dev_eui: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        projection: Option<&[&str]>,
    ) -> Result<Vec<MeasurementDoc>, AppError> {
        let docs = match projection {
            Some(fields) => {
                let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
                sqlx::query_as::<_, MeasurementDoc>(
                    r#"
                    SELECT device_eui, time,
                           (SELECT COALESCE(jsonb_object_agg(key, value), '{}'::jsonb)
                            FROM jsonb_each(payload)
                            WHERE key = ANY($4)) AS payload
                    FROM measurements
                    WHERE device_eui = $1
                      AND time >= $2 AND time <= $3
                      AND jsonb_typeof(payload) = 'object'
                    ORDER BY time ASC
                    "#,
                )
                .bind(dev_eui)
                .bind(start)
                .bind(end)
                .bind(&fields)
                .fetch_all(self.pool.pool())
                .await?
            }
            None => {
                sqlx::query_as::<_, MeasurementDoc>(
                    r#"
                    SELECT device_eui, time, payload FROM measurements
                    WHERE device_eui = $1
                      AND time >= $2 AND time <= $3
                      AND jsonb_typeof(payload) = 'object'
                    ORDER BY time ASC
                    "#,
                )
                .bind(dev_eui)
                .bind(start)
                .bind(end)
                .fetch_all(self.pool.pool())
                .await?
            }
        };

        Ok(docs)
    }
}
