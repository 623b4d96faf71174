//! 数据模型模块

mod center;
mod common;
mod company;
mod device;
mod fuel;
mod measurement;
mod summary;
mod user;

pub use center::*;
pub use common::*;
pub use company::*;
pub use device::*;
pub use fuel::*;
pub use measurement::*;
pub use summary::*;
pub use user::*;
