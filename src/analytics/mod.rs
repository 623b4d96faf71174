//! 遥测分析核心
//!
//! - `reconcile`：累计计数器对账引擎（处理计数器复位/溢出）
//! - `downsample`：时间分桶与降采样引擎（图表数据）
//!
//! 两个引擎均为纯函数，不依赖任何存储。

pub mod downsample;
pub mod reconcile;
