//! 公司数据仓库

use crate::db::PostgresPool;
use crate::errors::AppError;
use crate::models::{Center, Company, CompanyWithCenters};
use uuid::Uuid;

/// 公司数据仓库
#[derive(Clone)]
pub struct CompanyRepository {
    pool: PostgresPool,
}

impl CompanyRepository {
    pub fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }

    /// 创建公司
    pub async fn insert(&self, name: &str) -> Result<Company, AppError> {
        let company = sqlx::query_as::<_, Company>(
            "INSERT INTO companies (id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(self.pool.pool())
        .await?;

        Ok(company)
    }

    /// 按 ID 查找
    pub async fn find_by_id(&self, company_id: Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(company_id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(company)
    }

    /// 公司列表（含下属中心）
    pub async fn list_with_centers(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CompanyWithCenters>, AppError> {
        let companies = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.pool())
        .await?;

        let mut result = Vec::with_capacity(companies.len());
        for company in companies {
            let centers = sqlx::query_as::<_, Center>(
                "SELECT * FROM centers WHERE company_id = $1 ORDER BY name",
            )
            .bind(company.id)
            .fetch_all(self.pool.pool())
            .await?;

            result.push(CompanyWithCenters { company, centers });
        }

        Ok(result)
    }

    /// 更新公司名称
    pub async fn update_name(
        &self,
        company_id: Uuid,
        name: &str,
    ) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(
            "UPDATE companies SET name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(company_id)
        .bind(name)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(company)
    }

    /// 删除公司
    pub async fn delete(&self, company_id: Uuid) -> Result<Option<Company>, AppError> {
        let company =
            sqlx::query_as::<_, Company>("DELETE FROM companies WHERE id = $1 RETURNING *")
                .bind(company_id)
                .fetch_optional(self.pool.pool())
                .await?;

        Ok(company)
    }
}
