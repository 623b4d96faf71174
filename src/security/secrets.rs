//! 密钥管理
//!
//! 密钥一律来自环境变量，进程启动时一次性加载到全局只读存储，
//! 不落配置文件。

use crate::errors::AppError;
use once_cell::sync::OnceCell;
use secrecy::SecretString;
use std::env;

/// 全局密钥存储
static SECRETS: OnceCell<Secrets> = OnceCell::new();

/// 应用密钥集合
pub struct Secrets {
    jwt_secret: SecretString,
    database_url: SecretString,
}

impl Secrets {
    /// 从环境变量加载密钥
    pub fn load_from_env() -> Result<Self, AppError> {
        Ok(Self {
            jwt_secret: SecretString::new(
                env::var("JWT_SECRET")
                    .map_err(|_| AppError::ConfigError("JWT_SECRET 未设置".to_string()))?,
            ),
            database_url: SecretString::new(
                env::var("DATABASE_URL")
                    .map_err(|_| AppError::ConfigError("DATABASE_URL 未设置".to_string()))?,
            ),
        })
    }

    /// 初始化全局密钥
    pub fn init() -> Result<(), AppError> {
        let secrets = Self::load_from_env()?;
        SECRETS
            .set(secrets)
            .map_err(|_| AppError::ConfigError("密钥已初始化".to_string()))?;
        Ok(())
    }

    /// 获取全局密钥实例
    pub fn get() -> Result<&'static Secrets, AppError> {
        SECRETS
            .get()
            .ok_or_else(|| AppError::ConfigError("密钥未初始化".to_string()))
    }

    /// 获取 JWT 密钥
    pub fn jwt_secret(&self) -> &SecretString {
        &self.jwt_secret
    }

    /// 获取数据库 URL
    pub fn database_url(&self) -> &SecretString {
        &self.database_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_load_from_env_exposes_both_secrets() {
        env::set_var("JWT_SECRET", "test-jwt-secret-0123456789");
        env::set_var("DATABASE_URL", "postgres://localhost/dalia_test");

        let secrets = Secrets::load_from_env().unwrap();
        assert_eq!(
            secrets.jwt_secret().expose_secret(),
            "test-jwt-secret-0123456789"
        );
        assert_eq!(
            secrets.database_url().expose_secret(),
            "postgres://localhost/dalia_test",
            "数据库 URL 必须经由密钥存储读取"
        );
    }
}
