//! 公司 API 处理器

use crate::errors::AppError;
use crate::models::{ApiResponse, CompanyWithCenters, CreateCompanyRequest, UpdateCompanyRequest};
use crate::repositories::{CenterRepository, CompanyRepository};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::require_admin;

/// 分页查询参数
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// 创建公司
pub async fn create_company(
    req: HttpRequest,
    company_repo: web::Data<Arc<CompanyRepository>>,
    body: web::Json<CreateCompanyRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let company = company_repo.insert(&body.name).await?;

    Ok(HttpResponse::Created().json(ApiResponse::created(company)))
}

/// 公司列表（含下属中心）
pub async fn list_companies(
    req: HttpRequest,
    company_repo: web::Data<Arc<CompanyRepository>>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    let companies = company_repo
        .list_with_centers(query.limit, query.offset)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(companies)))
}

/// 单个公司详情（含下属中心）
pub async fn get_company(
    company_repo: web::Data<Arc<CompanyRepository>>,
    center_repo: web::Data<Arc<CenterRepository>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();

    let company = company_repo
        .find_by_id(company_id)
        .await?
        .ok_or_else(|| AppError::NotFound("公司不存在".to_string()))?;

    let centers = center_repo.list_by_company(company_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(CompanyWithCenters { company, centers })))
}

/// 公司下属中心列表
pub async fn list_company_centers(
    company_repo: web::Data<Arc<CompanyRepository>>,
    center_repo: web::Data<Arc<CenterRepository>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let company_id = path.into_inner();

    if company_repo.find_by_id(company_id).await?.is_none() {
        return Err(AppError::NotFound("公司不存在".to_string()));
    }

    let centers = center_repo.list_by_company(company_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(centers)))
}

/// 更新公司
pub async fn update_company(
    req: HttpRequest,
    company_repo: web::Data<Arc<CompanyRepository>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCompanyRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let name = body
        .name
        .as_deref()
        .ok_or_else(|| AppError::ValidationError("缺少公司名称".to_string()))?;

    let company = company_repo
        .update_name(path.into_inner(), name)
        .await?
        .ok_or_else(|| AppError::NotFound("公司不存在".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(company)))
}

/// 删除公司
pub async fn delete_company(
    req: HttpRequest,
    company_repo: web::Data<Arc<CompanyRepository>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;

    company_repo
        .delete(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("公司不存在".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("公司已删除")))
}
