//! 配置模块

mod settings;

pub use settings::{
    DatabaseSettings, JwtSettings, ServerSettings, Settings, SummarySettings,
};
