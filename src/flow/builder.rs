use std::collections::HashMap;

use crate::error::{BiChatError, Result};
use crate::flow::constants::{nodes, BI_CHAT_FLOW};
use crate::flow::nodes::{capability_node, FlowNode, FlowNodeKind};
use crate::flow::routing::{self, RouteFn};
use crate::flow::types::{Flow, FlowTransition, RoutingPolicy};
use crate::tools::Capability;

/// Flow 构建器
pub struct FlowBuilder {
    name: String,
    start: Option<String>,
    nodes: HashMap<String, FlowNode>,
    transitions: HashMap<String, FlowTransition>,
}

impl FlowBuilder {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            start: None,
            nodes: HashMap::new(),
            transitions: HashMap::new(),
        }
    }

    fn add_node(&mut self, name: &str, kind: FlowNodeKind) -> &mut Self {
        self.nodes.insert(
            name.to_string(),
            FlowNode {
                name: name.to_string(),
                kind,
            },
        );
        self
    }

    pub fn add_reasoning_node(&mut self, name: &str) -> &mut Self {
        self.add_node(name, FlowNodeKind::Reasoning)
    }

    pub fn add_capability_node(&mut self, name: &str, capability: Capability) -> &mut Self {
        self.add_node(name, FlowNodeKind::Capability(capability))
    }

    pub fn add_terminal_node(&mut self, name: &str) -> &mut Self {
        self.add_node(name, FlowNodeKind::Terminal)
    }

    pub fn set_start(&mut self, name: &str) -> &mut Self {
        self.start = Some(name.to_string());
        self
    }

    pub fn connect(&mut self, from: &str, to: &str) -> &mut Self {
        self.transitions
            .insert(from.to_string(), FlowTransition::Always(to.to_string()));
        self
    }

    pub fn connect_routed(&mut self, from: &str, route: RouteFn) -> &mut Self {
        self.transitions
            .insert(from.to_string(), FlowTransition::Routed(route));
        self
    }

    pub fn build(self) -> Result<Flow> {
        let start = self.start.ok_or_else(|| BiChatError::InvalidTransition {
            from: "__start__".into(),
            reason: format!("flow `{}` has no start node", self.name),
        })?;
        if !self.nodes.contains_key(&start) {
            return Err(BiChatError::UnknownNode(start));
        }

        for (name, node) in &self.nodes {
            match self.transitions.get(name) {
                None if node.kind != FlowNodeKind::Terminal => {
                    return Err(BiChatError::InvalidTransition {
                        from: name.clone(),
                        reason: "no outgoing transition".into(),
                    });
                }
                Some(FlowTransition::Always(to)) if !self.nodes.contains_key(to) => {
                    return Err(BiChatError::UnknownNode(to.clone()));
                }
                _ => {}
            }
        }

        Ok(Flow {
            name: self.name,
            start,
            nodes: self.nodes,
            transitions: self.transitions,
        })
    }
}

/// 构建 BI 对话流程：一个推理节点、四个能力节点和终止节点
pub fn bi_chat_flow(policy: RoutingPolicy) -> Result<Flow> {
    let mut builder = FlowBuilder::new(BI_CHAT_FLOW);
    builder
        .add_reasoning_node(nodes::REASONING)
        .add_terminal_node(nodes::END)
        .set_start(nodes::REASONING)
        .connect_routed(nodes::REASONING, routing::route_after_reasoning);
    for capability in Capability::ALL {
        builder.add_capability_node(capability_node(capability), capability);
    }

    match policy {
        RoutingPolicy::ModelDriven => {
            for capability in Capability::ALL {
                builder.connect_routed(capability_node(capability), routing::route_after_capability);
            }
        }
        RoutingPolicy::Guided => {
            builder
                .connect_routed(nodes::RUN_RECOGNIZE_INTENT, routing::should_continue_after_intent)
                .connect_routed(nodes::RUN_GENERATE_SQL, routing::route_after_sql_generation)
                .connect_routed(nodes::RUN_CHECK_SQL, routing::should_continue_after_sql_check)
                .connect_routed(nodes::RUN_ANALYZE_DATA, routing::route_after_analysis);
        }
    }

    builder.build()
}
