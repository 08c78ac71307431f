pub mod builtin;
pub mod capability;
pub mod manifest;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use builtin::{DataAnalyzerTool, GenerateSqlTool, RecognizeIntentTool, SqlCheckerTool};
pub use capability::{
    analyze_data, check_sql, generate_sql, recognize_intent, Capability, Intent, SqlIssue,
    SqlVerdict,
};
pub use manifest::{ToolManifest, ToolManifestBuilder, ToolPort};

use crate::agent::{AgentMessage, CapabilityCall};
use crate::error::{BiChatError, Result};
use crate::state::FlowContext;

/// 一次能力执行的输入
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub call_id: String,
    pub capability: Capability,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolInvocation {
    pub fn new(call_id: impl Into<String>, capability: Capability, arguments: Value) -> Self {
        Self {
            call_id: call_id.into(),
            capability,
            arguments,
        }
    }

    /// 从模型的调用请求构造；名称不是已知能力时返回 `None`
    pub fn from_call(call: &CapabilityCall) -> Option<Self> {
        Capability::from_name(&call.name)
            .map(|capability| Self::new(call.id.clone(), capability, call.arguments.clone()))
    }

    /// 读取字符串参数
    pub fn arg_str(&self, key: &str) -> Result<&str> {
        match self.arguments.get(key) {
            Some(Value::String(value)) => Ok(value),
            Some(other) => Err(BiChatError::invalid_arguments(
                self.capability.name(),
                format!("`{key}` must be a string, got {other}"),
            )),
            None => Err(BiChatError::invalid_arguments(
                self.capability.name(),
                format!("missing `{key}`"),
            )),
        }
    }

    pub fn result(&self, content: impl Into<String>) -> AgentMessage {
        AgentMessage::tool(self.capability.name(), self.call_id.clone(), content)
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn capability(&self) -> Capability;
    fn manifest(&self) -> ToolManifest;
    /// 执行能力，并把结果写入会话状态
    async fn call(&self, invocation: ToolInvocation, ctx: &FlowContext) -> Result<AgentMessage>;
}

/// 能力标签到处理器的映射表
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<Capability, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// 注册四个内置能力
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RecognizeIntentTool));
        registry.register(Arc::new(GenerateSqlTool));
        registry.register(Arc::new(SqlCheckerTool));
        registry.register(Arc::new(DataAnalyzerTool));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.capability(), tool);
    }

    pub fn get(&self, capability: Capability) -> Option<Arc<dyn Tool>> {
        self.tools.get(&capability).map(Arc::clone)
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.tools.contains_key(&capability)
    }

    /// 按固定顺序列出已注册能力的描述
    pub fn manifests(&self) -> Vec<ToolManifest> {
        Capability::ALL
            .iter()
            .filter_map(|capability| self.tools.get(capability))
            .map(|tool| tool.manifest())
            .collect()
    }

    pub async fn call(&self, invocation: ToolInvocation, ctx: &FlowContext) -> Result<AgentMessage> {
        let tool = self
            .get(invocation.capability)
            .ok_or_else(|| BiChatError::CapabilityNotRegistered(invocation.capability.to_string()))?;
        tool.call(invocation, ctx).await
    }
}
