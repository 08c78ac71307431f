// 配置模块

mod env;
mod server;

pub use env::{EnvConfig, DEBUG_ENV};
pub use server::{ServerConfig, DEFAULT_MAX_STEPS};
