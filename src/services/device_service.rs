//! 设备服务：目录维护与"目录 + 最新遥测"合并详情

use crate::errors::AppError;
use crate::models::{
    CreateDeviceRequest, Device, DeviceStatus, DeviceWithLatestData, EnergyReading,
};
use crate::repositories::{CenterRepository, DeviceRepository, TelemetryRepository, UserRepository};
use uuid::Uuid;

/// 设备服务
pub struct DeviceService {
    device_repo: DeviceRepository,
    center_repo: CenterRepository,
    user_repo: UserRepository,
    telemetry_repo: TelemetryRepository,
}

impl DeviceService {
    pub fn new(
        device_repo: DeviceRepository,
        center_repo: CenterRepository,
        user_repo: UserRepository,
        telemetry_repo: TelemetryRepository,
    ) -> Self {
        Self {
            device_repo,
            center_repo,
            user_repo,
            telemetry_repo,
        }
    }

    /// 注册设备：EUI 重复 → 409，目标中心不存在 → 404
    pub async fn create(&self, request: &CreateDeviceRequest) -> Result<Device, AppError> {
        if self.center_repo.find_by_id(request.center_id).await?.is_none() {
            return Err(AppError::NotFound("中心不存在".to_string()));
        }

        if self.device_repo.find_by_eui(&request.dev_eui).await?.is_some() {
            return Err(AppError::Conflict("设备 EUI 已存在".to_string()));
        }

        let device = self.device_repo.insert(request).await?;
        tracing::info!(device_id = %device.id, dev_eui = %device.dev_eui, "设备已注册");
        Ok(device)
    }

    /// 设备详情：目录条目 + 最新一次测量
    ///
    /// - 设备不存在 → 404
    /// - 设备存在但不在调用方可访问的公司下 → 403
    /// - "不予显示"状态 → 403，不携带任何遥测字段
    /// - 最新遥测解析失败 → `latest_measurement` 为 null，记日志
    pub async fn detail(
        &self,
        user_id: Uuid,
        is_admin: bool,
        device_id: Uuid,
    ) -> Result<DeviceWithLatestData, AppError> {
        let device = self
            .device_repo
            .find_by_id(device_id)
            .await?
            .ok_or_else(|| AppError::NotFound("设备不存在".to_string()))?;

        if !is_admin {
            let company_ids = self.user_repo.company_ids(user_id).await?;
            if company_ids.is_empty()
                || !self
                    .device_repo
                    .belongs_to_companies(device_id, &company_ids)
                    .await?
            {
                return Err(AppError::Forbidden("无权访问此设备".to_string()));
            }
        }

        if device.status == DeviceStatus::DoNotDisplay {
            return Err(AppError::Forbidden("设备不可见".to_string()));
        }

        let latest_measurement = match self.telemetry_repo.find_latest(&device.dev_eui).await? {
            Some(doc) => match EnergyReading::parse(&doc) {
                Ok(reading) => Some(reading),
                Err(e) => {
                    tracing::warn!(dev_eui = %device.dev_eui, error = %e, "最新测量文档格式错误");
                    None
                }
            },
            None => None,
        };

        Ok(DeviceWithLatestData {
            device,
            latest_measurement,
        })
    }
}
