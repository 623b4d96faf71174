//! 中心服务：中心维护与电价管理

use crate::errors::AppError;
use crate::models::{Center, CreateCenterRequest, TariffResponse, UpdateTariffRequest};
use crate::repositories::{CenterRepository, CompanyRepository};
use uuid::Uuid;

/// 未显式给定时的初始电价
const DEFAULT_PRICE_PER_KWH: f64 = 0.15;

/// 中心服务
pub struct CenterService {
    center_repo: CenterRepository,
    company_repo: CompanyRepository,
}

impl CenterService {
    pub fn new(center_repo: CenterRepository, company_repo: CompanyRepository) -> Self {
        Self {
            center_repo,
            company_repo,
        }
    }

    /// 创建中心：所属公司不存在 → 404
    pub async fn create(&self, request: &CreateCenterRequest) -> Result<Center, AppError> {
        if self
            .company_repo
            .find_by_id(request.company_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("公司不存在".to_string()));
        }

        let price = request.price_per_kwh.unwrap_or(DEFAULT_PRICE_PER_KWH);
        let center = self
            .center_repo
            .insert(&request.name, request.company_id, price)
            .await?;

        tracing::info!(center_id = %center.id, "中心已创建");
        Ok(center)
    }

    /// 更新中心名称
    pub async fn rename(&self, center_id: Uuid, name: &str) -> Result<Center, AppError> {
        self.center_repo
            .update_name(center_id, name)
            .await?
            .ok_or_else(|| AppError::NotFound("中心不存在".to_string()))
    }

    /// 删除中心
    pub async fn delete(&self, center_id: Uuid) -> Result<Center, AppError> {
        self.center_repo
            .delete(center_id)
            .await?
            .ok_or_else(|| AppError::NotFound("中心不存在".to_string()))
    }

    /// 查询电价
    pub async fn tariff(&self, center_id: Uuid) -> Result<TariffResponse, AppError> {
        let center = self
            .center_repo
            .find_by_id(center_id)
            .await?
            .ok_or_else(|| AppError::NotFound("中心不存在".to_string()))?;

        Ok(TariffResponse {
            center_id: center.id,
            price_per_kwh: center.price_per_kwh,
        })
    }

    /// 更新电价：非正电价在任何写入之前拒绝，未知中心 → 404
    pub async fn set_tariff(
        &self,
        center_id: Uuid,
        request: &UpdateTariffRequest,
    ) -> Result<TariffResponse, AppError> {
        if request.price_per_kwh <= 0.0 {
            return Err(AppError::ValidationError("电价必须为正数".to_string()));
        }

        let center = self
            .center_repo
            .set_tariff(center_id, request.price_per_kwh)
            .await?
            .ok_or_else(|| AppError::NotFound("中心不存在".to_string()))?;

        tracing::info!(center_id = %center.id, price = center.price_per_kwh, "电价已更新");

        Ok(TariffResponse {
            center_id: center.id,
            price_per_kwh: center.price_per_kwh,
        })
    }
}
