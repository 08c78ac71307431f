use std::time::Duration;

use clap::Args;

use crate::flow::RoutingPolicy;

pub const DEFAULT_MAX_STEPS: u32 = 50;

/// HTTP 服务配置，命令行参数与 `BICHAT_*` 环境变量均可设置
#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    #[arg(long, env = "BICHAT_HOST", default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, env = "BICHAT_PORT", default_value_t = 8000)]
    pub port: u16,
    /// 单次调用最多执行的节点数
    #[arg(long, env = "BICHAT_MAX_STEPS", default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: u32,
    /// model（每步由模型决定）或 guided（按预设顺序自动衔接）
    #[arg(long, env = "BICHAT_ROUTING", default_value_t = RoutingPolicy::ModelDriven)]
    pub routing: RoutingPolicy,
    #[arg(long, env = "BICHAT_SYSTEM_PROMPT")]
    pub system_prompt: Option<String>,
    /// 会话空闲多少秒后被淘汰
    #[arg(long, env = "BICHAT_SESSION_IDLE_SECS", default_value_t = 1800)]
    pub session_idle_secs: u64,
    #[arg(long, env = "BICHAT_SESSION_SWEEP_SECS", default_value_t = 60)]
    pub session_sweep_secs: u64,
}

impl ServerConfig {
    /// 监听地址，主机名在绑定时解析
    pub fn bind_address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    pub fn session_sweep(&self) -> Duration {
        Duration::from_secs(self.session_sweep_secs.max(1))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            max_steps: DEFAULT_MAX_STEPS,
            routing: RoutingPolicy::ModelDriven,
            system_prompt: None,
            session_idle_secs: 1800,
            session_sweep_secs: 60,
        }
    }
}
