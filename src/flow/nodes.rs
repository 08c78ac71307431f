use crate::flow::constants::nodes;
use crate::tools::Capability;

/// Flow 节点
#[derive(Clone, Debug)]
pub struct FlowNode {
    pub name: String,
    pub kind: FlowNodeKind,
}

/// Flow 节点类型
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowNodeKind {
    /// 调用模型，决定下一步
    Reasoning,
    /// 执行一个能力
    Capability(Capability),
    Terminal,
}

/// 能力对应的执行节点名
pub fn capability_node(capability: Capability) -> &'static str {
    match capability {
        Capability::RecognizeIntent => nodes::RUN_RECOGNIZE_INTENT,
        Capability::GenerateSql => nodes::RUN_GENERATE_SQL,
        Capability::SqlChecker => nodes::RUN_CHECK_SQL,
        Capability::DataAnalyzer => nodes::RUN_ANALYZE_DATA,
    }
}
