//! 健康检查 API 处理器

use crate::db::PostgresPool;
use crate::models::{HealthCheckResponse, ServiceStatus};
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use std::time::Instant;

/// 简单健康检查（用于负载均衡器）
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok"
    }))
}

/// 详细健康检查
pub async fn health_detailed(pg_pool: web::Data<Arc<PostgresPool>>) -> HttpResponse {
    let db_start = Instant::now();
    let db_status = match pg_pool.health_check().await {
        Ok(_) => ServiceStatus::healthy(db_start.elapsed().as_millis() as u64),
        Err(_) => ServiceStatus::unhealthy(),
    };

    let response = HealthCheckResponse {
        status: if db_status.status == "healthy" {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    };

    HttpResponse::Ok().json(response)
}

/// 就绪检查（用于 Kubernetes）
pub async fn ready(pg_pool: web::Data<Arc<PostgresPool>>) -> HttpResponse {
    if pg_pool.health_check().await.is_ok() {
        HttpResponse::Ok().json(serde_json::json!({
            "ready": true
        }))
    } else {
        HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "ready": false
        }))
    }
}

/// 存活检查（用于 Kubernetes）
pub async fn live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "alive": true
    }))
}
