use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 模型发起的一次能力调用请求
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CapabilityCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl CapabilityCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: format!("call-{}", uuid()),
            name: name.into(),
            arguments,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Transcript 中的一条消息
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgentMessage {
    pub id: String,
    pub role: MessageRole,
    pub from: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<CapabilityCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl AgentMessage {
    fn with_role(role: MessageRole, from: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: uuid(),
            role,
            from: from.into(),
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            metadata: None,
        }
    }

    pub fn user<T: Into<String>>(content: T) -> Self {
        Self::with_role(MessageRole::User, "user", content)
    }

    pub fn system<T: Into<String>>(content: T) -> Self {
        Self::with_role(MessageRole::System, "system", content)
    }

    pub fn assistant<T: Into<String>>(content: T) -> Self {
        Self::with_role(MessageRole::Assistant, "assistant", content)
    }

    pub fn assistant_with_calls<T: Into<String>>(content: T, calls: Vec<CapabilityCall>) -> Self {
        let mut message = Self::assistant(content);
        message.tool_calls = calls;
        message
    }

    /// 能力执行结果，`call_id` 对应触发它的请求
    pub fn tool(
        name: impl Into<String>,
        call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let mut message = Self::with_role(MessageRole::Tool, name, content);
        message.tool_call_id = Some(call_id.into());
        message
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// 该消息请求的第一个能力调用（每个推理步骤只执行一个）
    pub fn requested_call(&self) -> Option<&CapabilityCall> {
        if self.role != MessageRole::Assistant {
            return None;
        }
        self.tool_calls.first()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    System,
    Assistant,
    Tool,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::System => "system",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        }
    }
}

pub fn uuid() -> String {
    format!("msg-{}", uuid::Uuid::new_v4().simple())
}
