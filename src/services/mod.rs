//! 业务逻辑层（Service）

mod center_service;
mod device_service;
mod fuel_service;
mod summary_service;
mod user_service;

pub use center_service::CenterService;
pub use device_service::DeviceService;
pub use fuel_service::FuelService;
pub use summary_service::{build_historical_series, derive_alerts, SummaryService};
pub use user_service::UserService;
