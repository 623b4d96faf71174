//! HTTP 中间件

mod auth;
mod logging;

pub use auth::{AuthInfo, JwtAuth};
pub use logging::{get_request_id, RequestId, RequestLogger};
