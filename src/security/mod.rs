//! 安全模块：密钥、JWT、密码哈希

mod jwt;
mod password;
mod secrets;

pub use jwt::{Claims, JwtManager, JwtTokenType};
pub use password::{check_password_strength, hash_password, verify_password};
pub use secrets::Secrets;
