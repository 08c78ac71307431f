use tracing::{debug, warn};

use super::message::AgentMessage;
use crate::error::Result;
use crate::llm::{DynLlmClient, LlmRequest};
use crate::state::FlowContext;
use crate::tools::ToolManifest;

/// 推理节点背后的 agent：带着完整 transcript 和能力声明调用模型
pub struct ReasoningAgent {
    client: DynLlmClient,
    tools: Vec<ToolManifest>,
    system_prompt: Option<String>,
    temperature: f32,
}

impl ReasoningAgent {
    pub fn new(client: DynLlmClient, tools: Vec<ToolManifest>) -> Self {
        Self {
            client,
            tools,
            system_prompt: None,
            temperature: 0.0,
        }
    }

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    /// 执行一次推理并把 assistant 消息追加到 transcript
    ///
    /// 模型一次请求多个能力时只保留第一个。
    pub async fn step(&self, ctx: &FlowContext) -> Result<AgentMessage> {
        let request = LlmRequest::new(ctx.history())
            .with_system(self.system_prompt.clone())
            .with_tools(self.tools.clone())
            .with_temperature(self.temperature);

        let mut response = self.client.complete(request).await?;
        if response.tool_calls.len() > 1 {
            let dropped: Vec<_> = response.tool_calls[1..]
                .iter()
                .map(|call| call.name.clone())
                .collect();
            warn!(?dropped, "model requested several capabilities, keeping the first");
            response.tool_calls.truncate(1);
        }

        let mut message = AgentMessage::assistant_with_calls(response.content, response.tool_calls);
        if let Some(metadata) = response.metadata {
            message = message.with_metadata(metadata);
        }
        debug!(
            requested = ?message.requested_call().map(|call| call.name.as_str()),
            "reasoning step finished"
        );
        ctx.push_message(message.clone());
        Ok(message)
    }
}
