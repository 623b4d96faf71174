//! 电量汇总 API 处理器

use crate::errors::AppError;
use crate::models::{ApiResponse, ConsumptionBreakdown, TimeRangeKey};
use crate::services::SummaryService;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::current_auth;

/// 汇总查询参数
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub time_range: TimeRangeKey,
}

/// 用户可见的全部电量设备汇总
pub async fn energy_summary(
    req: HttpRequest,
    summary_service: web::Data<Arc<SummaryService>>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let auth = current_auth(&req)?;
    let summaries = summary_service
        .energy_summary(auth.user_id, query.time_range)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(summaries)))
}

/// 单设备消耗明细（按日/按月分组）
pub async fn device_consumption(
    req: HttpRequest,
    summary_service: web::Data<Arc<SummaryService>>,
    path: web::Path<Uuid>,
    query: web::Query<ConsumptionBreakdown>,
) -> Result<HttpResponse, AppError> {
    let auth = current_auth(&req)?;
    let response = summary_service
        .device_consumption(
            auth.user_id,
            auth.is_admin(),
            path.into_inner(),
            query.time_range,
            query.grouping,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}
