//! 燃油汇总服务
//!
//! 按中心聚合燃油设备的最新读数：每台设备产出 S0/S1/S2 三个罐，
//! 中心状态按"传感器故障 > 低库存 > 正常"推导，无罐数据为 neutral。

use crate::config::Settings;
use crate::errors::AppError;
use crate::models::{
    tank_from_slot, Center, Device, DeviceType, FuelCenter, FuelReading, FuelTank,
};
use crate::repositories::{CenterRepository, DeviceRepository, TelemetryRepository, UserRepository};
use crate::utils::time::format_iso8601;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tokio::time::timeout;
use uuid::Uuid;

/// 燃油汇总服务
pub struct FuelService {
    user_repo: UserRepository,
    center_repo: CenterRepository,
    device_repo: DeviceRepository,
    telemetry_repo: TelemetryRepository,
    fetch_concurrency: usize,
    fetch_timeout: Duration,
}

impl FuelService {
    pub fn new(
        user_repo: UserRepository,
        center_repo: CenterRepository,
        device_repo: DeviceRepository,
        telemetry_repo: TelemetryRepository,
        settings: &Settings,
    ) -> Self {
        Self {
            user_repo,
            center_repo,
            device_repo,
            telemetry_repo,
            fetch_concurrency: settings.summary.fetch_concurrency.max(1),
            fetch_timeout: Duration::from_secs(settings.summary.fetch_timeout_seconds),
        }
    }

    /// 用户可见的全部燃油中心汇总
    pub async fn fuel_summary(&self, user_id: Uuid) -> Result<Vec<FuelCenter>, AppError> {
        let company_ids = self.user_repo.company_ids(user_id).await?;
        if company_ids.is_empty() {
            return Ok(vec![]);
        }

        let centers = self.center_repo.list_by_companies(&company_ids).await?;

        let mut result = Vec::with_capacity(centers.len());
        for center in centers {
            result.push(self.assemble_center(center).await?);
        }

        Ok(result)
    }

    /// 装配单个中心：设备并发拉取最新读数，失败的设备跳过
    async fn assemble_center(&self, center: Center) -> Result<FuelCenter, AppError> {
        let devices = self
            .device_repo
            .list_visible_by_center(center.id, DeviceType::Fuel)
            .await?;

        let center_id = center.id;
        let tanks: Vec<FuelTank> = stream::iter(devices)
            .map(|device| async move { self.device_tanks(device, center_id).await })
            .buffer_unordered(self.fetch_concurrency)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .flatten()
            .collect();

        let mut tanks = tanks;
        // 扇出不保证顺序，按罐 ID 恢复稳定排序
        tanks.sort_by(|a, b| a.id.cmp(&b.id));

        let status = FuelCenter::derive_status(&tanks);
        let total_capacity = tanks.iter().map(|t| t.capacity).sum();
        let current_inventory = tanks.iter().map(|t| t.sensor.volume_l).sum();

        Ok(FuelCenter {
            id: center.id,
            location: center.name.clone(),
            name: center.name,
            status,
            tanks,
            total_capacity,
            current_inventory,
        })
    }

    /// 一台燃油设备的三个罐；超时或文档损坏只跳过这台设备
    async fn device_tanks(&self, device: Device, center_id: Uuid) -> Vec<FuelTank> {
        let doc = match timeout(
            self.fetch_timeout,
            self.telemetry_repo.find_latest(&device.dev_eui),
        )
        .await
        {
            Err(_) => {
                tracing::warn!(dev_eui = %device.dev_eui, "燃油读数拉取超时，跳过设备");
                return vec![];
            }
            Ok(Err(e)) => {
                tracing::warn!(dev_eui = %device.dev_eui, error = %e, "燃油读数拉取失败，跳过设备");
                return vec![];
            }
            Ok(Ok(None)) => {
                tracing::debug!(dev_eui = %device.dev_eui, "燃油设备无遥测数据，跳过");
                return vec![];
            }
            Ok(Ok(Some(doc))) => doc,
        };

        let reading = match FuelReading::parse(&doc) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(dev_eui = %device.dev_eui, error = %e, "燃油测量文档格式错误，跳过设备");
                return vec![];
            }
        };

        let last_update = format_iso8601(&reading.time);
        reading
            .tanks
            .iter()
            .enumerate()
            .map(|(slot, sensor)| {
                tank_from_slot(
                    &device.dev_eui,
                    slot,
                    sensor,
                    last_update.clone(),
                    reading.latitude,
                    reading.longitude,
                    center_id,
                )
            })
            .collect()
    }
}
