use serde_json::json;
use tracing::debug;

use crate::agent::{AgentMessage, CapabilityCall, ReasoningAgent};
use crate::error::{BiChatError, Result};
use crate::flow::constants::{fields, sources};
use crate::state::FlowContext;
use crate::tools::{Capability, ToolInvocation, ToolRegistry};

/// 推理节点
pub async fn handle_reasoning(agent: &ReasoningAgent, ctx: &FlowContext) -> Result<AgentMessage> {
    agent.step(ctx).await
}

/// 能力节点：执行、追加结果（状态字段由能力自己写入）
///
/// 参数错误不会中断流程，而是作为带 `error` 标记的结果交还给模型。
pub async fn handle_capability(
    capability: Capability,
    tools: &ToolRegistry,
    ctx: &FlowContext,
) -> Result<AgentMessage> {
    let invocation = match pending_invocation(capability, ctx) {
        Some(invocation) => invocation,
        None => synthesize_invocation(capability, ctx),
    };

    let result = match tools.call(invocation.clone(), ctx).await {
        Ok(message) => message,
        Err(err @ BiChatError::InvalidArguments { .. }) => {
            debug!(%err, "capability rejected its arguments");
            invocation
                .result(format!("Error: {err}"))
                .with_metadata(json!({ fields::ERROR: true }))
        }
        Err(err) => return Err(err),
    };
    ctx.push_message(result.clone());
    Ok(result)
}

/// 最后一条消息中模型请求的、与本节点匹配的调用
fn pending_invocation(capability: Capability, ctx: &FlowContext) -> Option<ToolInvocation> {
    let last = ctx.last_message()?;
    let call = last.requested_call()?;
    if Capability::from_name(&call.name) != Some(capability) {
        return None;
    }
    ToolInvocation::from_call(call)
}

/// 自动衔接时没有模型请求，参数取自会话状态和最近的用户输入
///
/// 同时追加一条 assistant 调用消息，使 transcript 中每个结果都有对应请求。
fn synthesize_invocation(capability: Capability, ctx: &FlowContext) -> ToolInvocation {
    let state = ctx.state();
    let user_query = ctx.last_user_text().unwrap_or_default();
    let arguments = match capability {
        Capability::RecognizeIntent => json!({ "user_query": user_query }),
        Capability::GenerateSql => json!({
            "intent": state.current_intent.map(|intent| intent.as_str()).unwrap_or("unknown_intent"),
            "user_query": user_query,
        }),
        Capability::SqlChecker | Capability::DataAnalyzer => match state.generated_sql {
            Some(sql) => json!({ "sql_query": sql }),
            None => json!({}),
        },
    };

    let call = CapabilityCall::new(capability.name(), arguments);
    ctx.push_message(
        AgentMessage::assistant_with_calls("", vec![call.clone()]).with_from(sources::WORKFLOW),
    );
    ToolInvocation::new(call.id, capability, call.arguments)
}
