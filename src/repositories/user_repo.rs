//! 用户数据仓库

use crate::db::PostgresPool;
use crate::errors::AppError;
use crate::models::{User, UserCompanyRole, UserRole, UserRoleInCompany};
use uuid::Uuid;

/// 用户数据仓库
#[derive(Clone)]
pub struct UserRepository {
    pool: PostgresPool,
}

impl UserRepository {
    pub fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }

    /// 创建用户
    pub async fn insert(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, username, password_hash, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .fetch_one(self.pool.pool())
        .await?;

        Ok(user)
    }

    /// 按邮箱查找
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(user)
    }

    /// 按 ID 查找
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(user)
    }

    /// 用户列表（管理端）
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(users)
    }

    /// 停用用户（软删除）
    pub async fn deactivate(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(user)
    }

    /// 用户可访问的公司 ID 集合
    pub async fn company_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids: Vec<(Uuid,)> =
            sqlx::query_as("SELECT company_id FROM user_company WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(self.pool.pool())
                .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// 用户在各公司的角色（含公司名称）
    pub async fn roles_in_companies(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserRoleInCompany>, AppError> {
        let roles = sqlx::query_as::<_, UserRoleInCompany>(
            r#"
            SELECT uc.company_id, c.name AS company_name, uc.role
            FROM user_company uc
            JOIN companies c ON c.id = uc.company_id
            WHERE uc.user_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(roles)
    }

    /// 把用户加入公司（重复加入时更新角色）
    pub async fn assign_company(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        role: UserCompanyRole,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO user_company (user_id, company_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, company_id) DO UPDATE SET role = EXCLUDED.role
            "#,
        )
        .bind(user_id)
        .bind(company_id)
        .bind(role)
        .execute(self.pool.pool())
        .await?;

        Ok(())
    }
}
