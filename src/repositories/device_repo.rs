//! 设备目录数据仓库

use crate::db::PostgresPool;
use crate::errors::AppError;
use crate::models::{CreateDeviceRequest, Device, DeviceType};
use uuid::Uuid;

/// 设备目录数据仓库
#[derive(Clone)]
pub struct DeviceRepository {
    pool: PostgresPool,
}

impl DeviceRepository {
    pub fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }

    /// 创建设备
    pub async fn insert(&self, request: &CreateDeviceRequest) -> Result<Device, AppError> {
        let device = sqlx::query_as::<_, Device>(
            r#"
            INSERT INTO devices (id, name, dev_eui, status, device_type, center_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.dev_eui)
        .bind(&request.status)
        .bind(&request.device_type)
        .bind(request.center_id)
        .fetch_one(self.pool.pool())
        .await?;

        Ok(device)
    }

    /// 按 ID 查找
    pub async fn find_by_id(&self, device_id: Uuid) -> Result<Option<Device>, AppError> {
        let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE id = $1")
            .bind(device_id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(device)
    }

    /// 按设备 EUI 查找
    pub async fn find_by_eui(&self, dev_eui: &str) -> Result<Option<Device>, AppError> {
        let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE dev_eui = $1")
            .bind(dev_eui)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(device)
    }

    /// 一批公司下属、指定类型、可显示的设备
    ///
    /// "不予显示"状态的设备在查询层直接排除，汇总中永远不会出现。
    pub async fn list_visible_by_companies(
        &self,
        company_ids: &[Uuid],
        device_type: DeviceType,
    ) -> Result<Vec<Device>, AppError> {
        let devices = sqlx::query_as::<_, Device>(
            r#"
            SELECT d.* FROM devices d
            JOIN centers c ON c.id = d.center_id
            WHERE c.company_id = ANY($1)
              AND d.device_type = $2
              AND d.status <> 'do_not_display'
            ORDER BY d.name
            "#,
        )
        .bind(company_ids)
        .bind(device_type)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(devices)
    }

    /// 某中心下属、指定类型、可显示的设备
    pub async fn list_visible_by_center(
        &self,
        center_id: Uuid,
        device_type: DeviceType,
    ) -> Result<Vec<Device>, AppError> {
        let devices = sqlx::query_as::<_, Device>(
            r#"
            SELECT * FROM devices
            WHERE center_id = $1
              AND device_type = $2
              AND status <> 'do_not_display'
            ORDER BY name
            "#,
        )
        .bind(center_id)
        .bind(device_type)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(devices)
    }

    /// 判断设备是否归属于给定公司集合
    pub async fn belongs_to_companies(
        &self,
        device_id: Uuid,
        company_ids: &[Uuid],
    ) -> Result<bool, AppError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT d.id FROM devices d
            JOIN centers c ON c.id = d.center_id
            WHERE d.id = $1 AND c.company_id = ANY($2)
            "#,
        )
        .bind(device_id)
        .bind(company_ids)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(row.is_some())
    }
}
