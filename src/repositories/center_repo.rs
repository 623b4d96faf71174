//! 中心数据仓库

use crate::db::PostgresPool;
use crate::errors::AppError;
use crate::models::Center;
use uuid::Uuid;

/// 中心数据仓库
#[derive(Clone)]
pub struct CenterRepository {
    pool: PostgresPool,
}

impl CenterRepository {
    pub fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }

    /// 创建中心
    pub async fn insert(
        &self,
        name: &str,
        company_id: Uuid,
        price_per_kwh: f64,
    ) -> Result<Center, AppError> {
        let center = sqlx::query_as::<_, Center>(
            r#"
            INSERT INTO centers (id, name, company_id, price_per_kwh)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(company_id)
        .bind(price_per_kwh)
        .fetch_one(self.pool.pool())
        .await?;

        Ok(center)
    }

    /// 按 ID 查找
    pub async fn find_by_id(&self, center_id: Uuid) -> Result<Option<Center>, AppError> {
        let center = sqlx::query_as::<_, Center>("SELECT * FROM centers WHERE id = $1")
            .bind(center_id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(center)
    }

    /// 某公司下属中心列表
    pub async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Center>, AppError> {
        let centers = sqlx::query_as::<_, Center>(
            "SELECT * FROM centers WHERE company_id = $1 ORDER BY name",
        )
        .bind(company_id)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(centers)
    }

    /// 一批公司下属的全部中心
    pub async fn list_by_companies(&self, company_ids: &[Uuid]) -> Result<Vec<Center>, AppError> {
        let centers = sqlx::query_as::<_, Center>(
            "SELECT * FROM centers WHERE company_id = ANY($1) ORDER BY name",
        )
        .bind(company_ids)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(centers)
    }

    /// 更新中心名称
    pub async fn update_name(
        &self,
        center_id: Uuid,
        name: &str,
    ) -> Result<Option<Center>, AppError> {
        let center = sqlx::query_as::<_, Center>(
            "UPDATE centers SET name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(center_id)
        .bind(name)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(center)
    }

    /// 更新电价（单行写入，后写者胜；电价变更是低频管理操作）
    pub async fn set_tariff(
        &self,
        center_id: Uuid,
        price_per_kwh: f64,
    ) -> Result<Option<Center>, AppError> {
        let center = sqlx::query_as::<_, Center>(
            "UPDATE centers SET price_per_kwh = $2 WHERE id = $1 RETURNING *",
        )
        .bind(center_id)
        .bind(price_per_kwh)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(center)
    }

    /// 删除中心
    pub async fn delete(&self, center_id: Uuid) -> Result<Option<Center>, AppError> {
        let center = sqlx::query_as::<_, Center>("DELETE FROM centers WHERE id = $1 RETURNING *")
            .bind(center_id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(center)
    }
}
