use serde::Serialize;

use crate::agent::{AgentMessage, MessageRole};

/// 只追加的对话记录
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<AgentMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: AgentMessage) {
        self.entries.push(message);
    }

    pub fn entries(&self) -> &[AgentMessage] {
        &self.entries
    }

    pub fn last(&self) -> Option<&AgentMessage> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 最近一条用户输入
    pub fn last_user_text(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|message| message.role == MessageRole::User)
            .map(|message| message.content.as_str())
    }
}
