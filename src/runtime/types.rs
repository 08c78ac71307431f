use serde::Serialize;

use crate::agent::AgentMessage;

// 运行时类型定义

/// Flow 执行结果
#[derive(Clone, Debug, Serialize)]
pub struct FlowExecution {
    pub flow_name: String,
    pub last_node: String,
    pub last_message: Option<AgentMessage>,
    /// 执行过的节点数（不含终止节点）
    pub steps: u32,
    /// 依次访问的节点
    pub trace: Vec<String>,
}

impl FlowExecution {
    /// 本次调用最后产出的文本
    pub fn response_text(&self) -> Option<&str> {
        self.last_message
            .as_ref()
            .map(|message| message.content.as_str())
    }
}
