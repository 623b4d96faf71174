//! API 处理器模块

mod center_handler;
mod company_handler;
mod device_handler;
mod energy_handler;
mod fuel_handler;
mod health_handler;
mod user_handler;

pub use center_handler::*;
pub use company_handler::*;
pub use device_handler::*;
pub use energy_handler::*;
pub use fuel_handler::*;
pub use health_handler::*;
pub use user_handler::*;

use crate::errors::AppError;
use crate::middleware::AuthInfo;
use actix_web::{HttpMessage, HttpRequest};

/// 从请求扩展中取出认证信息（认证中间件写入）
pub(crate) fn current_auth(req: &HttpRequest) -> Result<AuthInfo, AppError> {
    req.extensions()
        .get::<AuthInfo>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("缺少认证信息".to_string()))
}

/// 要求管理员角色
pub(crate) fn require_admin(req: &HttpRequest) -> Result<AuthInfo, AppError> {
    let auth = current_auth(req)?;
    if !auth.is_admin() {
        return Err(AppError::Forbidden("需要管理员权限".to_string()));
    }
    Ok(auth)
}
