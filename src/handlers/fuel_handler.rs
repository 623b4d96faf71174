//! 燃油汇总 API 处理器

use crate::errors::AppError;
use crate::models::ApiResponse;
use crate::services::FuelService;
use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;

use super::current_auth;

/// 用户可见的全部燃油中心汇总
pub async fn fuel_summary(
    req: HttpRequest,
    fuel_service: web::Data<Arc<FuelService>>,
) -> Result<HttpResponse, AppError> {
    let auth = current_auth(&req)?;
    let centers = fuel_service.fuel_summary(auth.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(centers)))
}
