//! 用户数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// 全局用户角色
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::User => write!(f, "user"),
        }
    }
}

/// 用户在某公司中的角色
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "company_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserCompanyRole {
    Admin,
    Editor,
    Viewer,
}

/// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    /// 密码哈希（不序列化）
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 用户注册请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "邮箱格式无效"))]
    pub email: String,

    #[validate(length(min = 3, max = 50, message = "用户名长度应在 3-50 字符之间"))]
    pub username: String,

    #[validate(length(min = 8, max = 128, message = "密码长度应在 8-128 字符之间"))]
    pub password: String,
}

/// 用户更新请求（管理员或本人）
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "邮箱格式无效"))]
    pub email: Option<String>,

    #[validate(length(min = 3, max = 50, message = "用户名长度应在 3-50 字符之间"))]
    pub username: Option<String>,

    pub is_active: Option<bool>,
}

/// 登录请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "邮箱格式无效"))]
    pub email: String,

    #[validate(length(min = 1, message = "密码不能为空"))]
    pub password: String,
}

/// 令牌响应
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// 用户在各公司的角色列表项
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRoleInCompany {
    pub company_id: Uuid,
    pub company_name: String,
    pub role: UserCompanyRole,
}
