//! 用户 API 处理器

use crate::errors::AppError;
use crate::models::{ApiResponse, CreateUserRequest, LoginRequest, UserCompanyRole};
use crate::services::UserService;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{current_auth, require_admin};

/// 刷新令牌请求
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// 用户列表查询参数
#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// 加入公司请求
#[derive(Debug, Deserialize)]
pub struct AssignCompanyRequest {
    pub user_id: Uuid,
    pub role: UserCompanyRole,
}

// ========== 公开接口 ==========

/// 用户注册
pub async fn register(
    user_service: web::Data<Arc<UserService>>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user = user_service.register(&body).await?;

    Ok(HttpResponse::Created().json(ApiResponse::created(user)))
}

/// 用户登录
pub async fn login(
    user_service: web::Data<Arc<UserService>>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let tokens = user_service.login(&body).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(tokens)))
}

/// 刷新访问令牌
pub async fn refresh_token(
    user_service: web::Data<Arc<UserService>>,
    body: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let tokens = user_service.refresh(&body.refresh_token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(tokens)))
}

// ========== 需要认证 ==========

/// 当前用户信息
pub async fn get_me(
    req: HttpRequest,
    user_service: web::Data<Arc<UserService>>,
) -> Result<HttpResponse, AppError> {
    let auth = current_auth(&req)?;
    let user = user_service.me(auth.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

/// 当前用户在各公司的角色
pub async fn get_my_roles(
    req: HttpRequest,
    user_service: web::Data<Arc<UserService>>,
) -> Result<HttpResponse, AppError> {
    let auth = current_auth(&req)?;
    let roles = user_service.my_roles(auth.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(roles)))
}

// ========== 管理员接口 ==========

/// 用户列表
pub async fn list_users(
    req: HttpRequest,
    user_service: web::Data<Arc<UserService>>,
    query: web::Query<UserListQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let users = user_service.list(query.limit, query.offset).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(users)))
}

/// 停用用户（软删除）
pub async fn deactivate_user(
    req: HttpRequest,
    user_service: web::Data<Arc<UserService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    user_service.deactivate(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("用户已停用")))
}

/// 把用户加入公司
pub async fn assign_user_to_company(
    req: HttpRequest,
    user_service: web::Data<Arc<UserService>>,
    path: web::Path<Uuid>,
    body: web::Json<AssignCompanyRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let company_id = path.into_inner();

    user_service
        .assign_company(body.user_id, company_id, body.role.clone())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("用户已加入公司")))
}
