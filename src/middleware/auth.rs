//! 认证中间件

use crate::errors::AppError;
use crate::security::JwtManager;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

/// 认证信息（存储在请求扩展中）
#[derive(Debug, Clone)]
pub struct AuthInfo {
    /// 用户 ID
    pub user_id: Uuid,
    /// 全局角色：admin, user
    pub role: Option<String>,
}

impl AuthInfo {
    /// 检查是否是管理员
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}

/// JWT 认证中间件
#[derive(Clone)]
pub struct JwtAuth {
    jwt_manager: Arc<JwtManager>,
}

impl JwtAuth {
    pub fn new(jwt_manager: Arc<JwtManager>) -> Self {
        Self { jwt_manager }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(JwtAuthMiddleware {
            service: Rc::new(service),
            jwt_manager: self.jwt_manager.clone(),
        })
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    jwt_manager: Arc<JwtManager>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let jwt_manager = self.jwt_manager.clone();

        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok());

            let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
                Some(t) => t,
                None => {
                    return Err(AppError::Unauthorized("缺少认证令牌".to_string()).into());
                }
            };

            let claims = jwt_manager.validate_access_token(token)?;
            let user_id = claims.user_id()?;

            req.extensions_mut().insert(AuthInfo {
                user_id,
                role: claims.role.clone(),
            });

            service.call(req).await
        })
    }
}
