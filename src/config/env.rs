use crate::error::{BiChatError, Result};
use anyhow::anyhow;
use std::env;

pub const DEBUG_ENV: &str = "BICHAT_DEBUG";

/// 环境变量配置管理
pub struct EnvConfig;

impl EnvConfig {
    /// 从环境变量获取值
    pub fn get_env(key: &str) -> Result<String> {
        env::var(key).map_err(|_| {
            BiChatError::Other(anyhow!(
                "环境变量 '{}' 未设置。请在 .env 文件中设置或通过环境变量传递。",
                key
            ))
        })
    }

    /// 获取可选的环境变量
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok()
    }

    /// 获取环境变量，未设置时使用默认值
    pub fn get_env_or(key: &str, default: &str) -> String {
        Self::get_env_optional(key).unwrap_or_else(|| default.to_string())
    }

    /// 检查是否启用调试模式
    pub fn is_debug_mode() -> bool {
        env::var(DEBUG_ENV).is_ok()
    }
}
