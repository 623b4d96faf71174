//! 中心 API 处理器

use crate::errors::AppError;
use crate::models::{ApiResponse, CreateCenterRequest, UpdateCenterRequest, UpdateTariffRequest};
use crate::services::CenterService;
use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::require_admin;

/// 创建中心
pub async fn create_center(
    req: HttpRequest,
    center_service: web::Data<Arc<CenterService>>,
    body: web::Json<CreateCenterRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let center = center_service.create(&body).await?;

    Ok(HttpResponse::Created().json(ApiResponse::created(center)))
}

/// 更新中心
pub async fn update_center(
    req: HttpRequest,
    center_service: web::Data<Arc<CenterService>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCenterRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let name = body
        .name
        .as_deref()
        .ok_or_else(|| AppError::ValidationError("缺少中心名称".to_string()))?;

    let center = center_service.rename(path.into_inner(), name).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(center)))
}

/// 删除中心
pub async fn delete_center(
    req: HttpRequest,
    center_service: web::Data<Arc<CenterService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    center_service.delete(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("中心已删除")))
}

/// 查询电价
pub async fn get_tariff(
    center_service: web::Data<Arc<CenterService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let tariff = center_service.tariff(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(tariff)))
}

/// 更新电价（校验发生在任何写入之前）
pub async fn update_tariff(
    req: HttpRequest,
    center_service: web::Data<Arc<CenterService>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTariffRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let tariff = center_service.set_tariff(path.into_inner(), &body).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(tariff)))
}
