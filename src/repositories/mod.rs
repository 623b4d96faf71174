//! 数据访问层（Repository）
//!
//! 设备目录（关系表）与遥测存储（measurements 超表）是两个独立的
//! 查询面，分别由各自的仓库封装；两者之间不做跨存储事务。

mod center_repo;
mod company_repo;
mod device_repo;
mod telemetry_repo;
mod user_repo;

pub use center_repo::CenterRepository;
pub use company_repo::CompanyRepository;
pub use device_repo::DeviceRepository;
pub use telemetry_repo::TelemetryRepository;
pub use user_repo::UserRepository;
