//! 公司数据模型

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::Center;

/// 公司实体
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
}

/// 公司及其下属中心
#[derive(Debug, Clone, Serialize)]
pub struct CompanyWithCenters {
    #[serde(flatten)]
    pub company: Company,
    pub centers: Vec<Center>,
}

/// 创建公司请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 200, message = "公司名称长度应在 1-200 字符之间"))]
    pub name: String,
}

/// 更新公司请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 200, message = "公司名称长度应在 1-200 字符之间"))]
    pub name: Option<String>,
}
