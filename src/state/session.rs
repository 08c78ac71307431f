use std::time::{Duration, Instant};

use serde::Serialize;

use super::context::FlowContext;
use super::session_state::SessionState;
use crate::agent::AgentMessage;

/// 会话：一段独立对话及其状态
pub struct Session {
    id: String,
    ctx: FlowContext,
    last_active: Instant,
    turns: u64,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Instant::now();
        Self {
            id: id.into(),
            ctx: FlowContext::new(),
            last_active: now,
            turns: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn context(&self) -> &FlowContext {
        &self.ctx
    }

    pub fn turns(&self) -> u64 {
        self.turns
    }

    /// 记录一次用户交互
    pub fn touch(&mut self) {
        self.mark_active();
        self.turns += 1;
    }

    /// 只刷新活跃时间，不计入轮次
    pub fn mark_active(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_active)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            turns: self.turns,
            transcript: self.ctx.history(),
            state: self.ctx.state(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub turns: u64,
    pub transcript: Vec<AgentMessage>,
    pub state: SessionState,
}
