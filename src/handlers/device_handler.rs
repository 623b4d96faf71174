//! 设备 API 处理器

use crate::errors::AppError;
use crate::models::{ApiResponse, CreateDeviceRequest};
use crate::services::DeviceService;
use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{current_auth, require_admin};

/// 注册设备
pub async fn create_device(
    req: HttpRequest,
    device_service: web::Data<Arc<DeviceService>>,
    body: web::Json<CreateDeviceRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req)?;
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let device = device_service.create(&body).await?;

    Ok(HttpResponse::Created().json(ApiResponse::created(device)))
}

/// 设备详情（目录条目 + 最新测量）
pub async fn get_device(
    req: HttpRequest,
    device_service: web::Data<Arc<DeviceService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let auth = current_auth(&req)?;
    let detail = device_service
        .detail(auth.user_id, auth.is_admin(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(detail)))
}
