use std::sync::Arc;

use parking_lot::RwLock;

use super::session_state::SessionState;
use super::transcript::Transcript;
use crate::agent::AgentMessage;

/// Flow 上下文：一个会话的 transcript 与状态字段
#[derive(Clone, Default)]
pub struct FlowContext {
    transcript: Arc<RwLock<Transcript>>,
    state: Arc<RwLock<SessionState>>,
}

impl FlowContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_message(&self, message: AgentMessage) {
        self.transcript.write().push(message);
    }

    pub fn history(&self) -> Vec<AgentMessage> {
        self.transcript.read().entries().to_vec()
    }

    pub fn last_message(&self) -> Option<AgentMessage> {
        self.transcript.read().last().cloned()
    }

    pub fn last_user_text(&self) -> Option<String> {
        self.transcript.read().last_user_text().map(str::to_string)
    }

    pub fn message_count(&self) -> usize {
        self.transcript.read().len()
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn update_state<F>(&self, update: F)
    where
        F: FnOnce(&mut SessionState),
    {
        let mut guard = self.state.write();
        update(&mut *guard);
    }
}
