// Flow 模块 - 工作流定义和路由

pub mod builder;
pub mod constants;
pub mod nodes;
pub mod routing;
pub mod types;

pub use builder::{bi_chat_flow, FlowBuilder};
pub use nodes::{capability_node, FlowNode, FlowNodeKind};
pub use routing::{Route, RouteFn};
pub use types::{Flow, FlowTransition, RoutingPolicy};
