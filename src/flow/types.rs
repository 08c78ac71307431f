use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::agent::AgentMessage;
use crate::error::{BiChatError, Result};
use crate::flow::nodes::FlowNode;
use crate::flow::routing::RouteFn;
use crate::state::SessionState;

/// Flow 工作流
#[derive(Clone)]
pub struct Flow {
    pub name: String,
    pub start: String,
    pub nodes: HashMap<String, FlowNode>,
    pub transitions: HashMap<String, FlowTransition>,
}

impl Flow {
    pub fn node(&self, name: &str) -> Option<&FlowNode> {
        self.nodes.get(name)
    }

    /// 计算 `from` 之后的节点
    pub fn next(
        &self,
        from: &str,
        state: &SessionState,
        last: Option<&AgentMessage>,
    ) -> Result<String> {
        let transition = self
            .transitions
            .get(from)
            .ok_or_else(|| BiChatError::InvalidTransition {
                from: from.to_string(),
                reason: "no outgoing transition".into(),
            })?;
        let target = match transition {
            FlowTransition::Always(to) => to.clone(),
            FlowTransition::Routed(route) => route(state, last).node_name().to_string(),
        };
        if !self.nodes.contains_key(&target) {
            return Err(BiChatError::UnknownNode(target));
        }
        Ok(target)
    }
}

/// Flow 转换
#[derive(Clone)]
pub enum FlowTransition {
    Always(String),
    Routed(RouteFn),
}

impl fmt::Debug for FlowTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowTransition::Always(to) => f.debug_tuple("Always").field(to).finish(),
            FlowTransition::Routed(_) => f.write_str("Routed(..)"),
        }
    }
}

/// 能力执行后的路由策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoutingPolicy {
    /// 每个能力执行后都回到推理节点，由模型决定下一步
    #[default]
    ModelDriven,
    /// 意图识别 → SQL 生成 → SQL 检查 → 数据分析 自动衔接，SQL 有误时重新生成
    Guided,
}

impl fmt::Display for RoutingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingPolicy::ModelDriven => f.write_str("model"),
            RoutingPolicy::Guided => f.write_str("guided"),
        }
    }
}

impl FromStr for RoutingPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "model" | "model-driven" | "model_driven" => Ok(RoutingPolicy::ModelDriven),
            "guided" => Ok(RoutingPolicy::Guided),
            other => Err(format!("unknown routing policy `{other}` (expected model or guided)")),
        }
    }
}
