//! 用户服务：注册、登录、角色查询与管理端操作

use crate::errors::AppError;
use crate::models::{
    CreateUserRequest, LoginRequest, TokenResponse, User, UserCompanyRole, UserRole,
    UserRoleInCompany,
};
use crate::repositories::UserRepository;
use crate::security::{check_password_strength, hash_password, verify_password, JwtManager};
use std::sync::Arc;
use uuid::Uuid;

/// 用户服务
pub struct UserService {
    user_repo: UserRepository,
    jwt_manager: Arc<JwtManager>,
    access_expiry_seconds: u64,
}

impl UserService {
    pub fn new(
        user_repo: UserRepository,
        jwt_manager: Arc<JwtManager>,
        access_expiry_seconds: u64,
    ) -> Self {
        Self {
            user_repo,
            jwt_manager,
            access_expiry_seconds,
        }
    }

    /// 注册新用户
    pub async fn register(&self, request: &CreateUserRequest) -> Result<User, AppError> {
        check_password_strength(&request.password)?;

        if self.user_repo.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("邮箱已被注册".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .user_repo
            .insert(&request.email, &request.username, &password_hash, UserRole::User)
            .await?;

        tracing::info!(user_id = %user.id, "新用户注册");
        Ok(user)
    }

    /// 登录：验证凭据并签发令牌
    ///
    /// 邮箱不存在与密码错误返回同一错误文案，避免枚举已注册邮箱。
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("邮箱或密码错误".to_string()))?;

        if !user.is_active {
            return Err(AppError::Unauthorized("账号已停用".to_string()));
        }

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthorized("邮箱或密码错误".to_string()));
        }

        let subject = user.id.to_string();
        let access_token = self
            .jwt_manager
            .generate_access_token(&subject, Some(user.role.to_string()))?;
        let refresh_token = self.jwt_manager.generate_refresh_token(&subject)?;

        tracing::info!(user_id = %user.id, "用户登录成功");

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_expiry_seconds,
        })
    }

    /// 刷新访问令牌
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        let claims = self.jwt_manager.validate_refresh_token(refresh_token)?;
        let user_id = claims.user_id()?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("用户不存在".to_string()))?;

        if !user.is_active {
            return Err(AppError::Unauthorized("账号已停用".to_string()));
        }

        let subject = user.id.to_string();
        let access_token = self
            .jwt_manager
            .generate_access_token(&subject, Some(user.role.to_string()))?;
        let refresh_token = self.jwt_manager.generate_refresh_token(&subject)?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_expiry_seconds,
        })
    }

    /// 当前用户信息
    pub async fn me(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))
    }

    /// 当前用户在各公司的角色
    pub async fn my_roles(&self, user_id: Uuid) -> Result<Vec<UserRoleInCompany>, AppError> {
        self.user_repo.roles_in_companies(user_id).await
    }

    /// 用户列表（仅管理员）
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        self.user_repo.list(limit, offset).await
    }

    /// 停用用户（仅管理员，软删除）
    pub async fn deactivate(&self, user_id: Uuid) -> Result<User, AppError> {
        let user = self
            .user_repo
            .deactivate(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;

        tracing::info!(user_id = %user.id, "用户已停用");
        Ok(user)
    }

    /// 把用户加入公司（仅管理员）
    pub async fn assign_company(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        role: UserCompanyRole,
    ) -> Result<(), AppError> {
        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("用户不存在".to_string()));
        }

        self.user_repo.assign_company(user_id, company_id, role).await
    }
}
