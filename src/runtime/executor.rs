use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::handlers;
use super::types::FlowExecution;
use crate::agent::{AgentMessage, ReasoningAgent};
use crate::config::DEFAULT_MAX_STEPS;
use crate::error::{BiChatError, Result};
use crate::flow::{bi_chat_flow, Flow, FlowNodeKind, RoutingPolicy};
use crate::llm::DynLlmClient;
use crate::state::FlowContext;
use crate::tools::ToolRegistry;

/// Flow 执行器：在一个会话上下文中顺序执行节点，直到终止或步数耗尽
#[derive(Clone)]
pub struct FlowExecutor {
    flow: Arc<Flow>,
    agent: Arc<ReasoningAgent>,
    tools: Arc<ToolRegistry>,
    max_iterations: u32,
}

impl FlowExecutor {
    pub fn new(flow: Flow, agent: ReasoningAgent, tools: ToolRegistry) -> Self {
        Self {
            flow: Arc::new(flow),
            agent: Arc::new(agent),
            tools: Arc::new(tools),
            max_iterations: DEFAULT_MAX_STEPS,
        }
    }

    /// 内置能力 + BI 对话流程
    pub fn bi_chat(
        client: DynLlmClient,
        policy: RoutingPolicy,
        system_prompt: Option<String>,
    ) -> Result<Self> {
        let tools = ToolRegistry::builtin();
        let agent = ReasoningAgent::new(client, tools.manifests()).with_system_prompt(system_prompt);
        Ok(Self::new(bi_chat_flow(policy)?, agent, tools))
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// 追加用户消息后执行
    pub async fn start(&self, ctx: &FlowContext, initial: AgentMessage) -> Result<FlowExecution> {
        ctx.push_message(initial);
        self.run(ctx).await
    }

    #[instrument(skip_all, fields(flow = %self.flow.name))]
    pub async fn run(&self, ctx: &FlowContext) -> Result<FlowExecution> {
        let mut current = self.flow.start.clone();
        let mut steps = 0u32;
        let mut trace = Vec::new();

        loop {
            let node = self
                .flow
                .node(&current)
                .ok_or_else(|| BiChatError::UnknownNode(current.clone()))?;

            if node.kind == FlowNodeKind::Terminal {
                debug!(steps, "reached terminal node `{}`", node.name);
                return Ok(FlowExecution {
                    flow_name: self.flow.name.clone(),
                    last_node: node.name.clone(),
                    last_message: ctx.last_message(),
                    steps,
                    trace,
                });
            }

            if steps >= self.max_iterations {
                warn!(
                    steps,
                    node = %node.name,
                    "step budget exhausted before reaching a terminal node"
                );
                return Err(BiChatError::MaxIterationsExceeded(self.max_iterations));
            }
            steps += 1;
            trace.push(node.name.clone());
            debug!(step = steps, node = %node.name, "executing node");

            match node.kind {
                FlowNodeKind::Reasoning => {
                    handlers::handle_reasoning(&self.agent, ctx).await?;
                }
                FlowNodeKind::Capability(capability) => {
                    handlers::handle_capability(capability, &self.tools, ctx).await?;
                }
                FlowNodeKind::Terminal => {}
            }

            let state = ctx.state();
            let last = ctx.last_message();
            current = self.flow.next(&node.name, &state, last.as_ref())?;
        }
    }
}
