/// 流程相关的常量定义

/// BI 对话流程名
pub const BI_CHAT_FLOW: &str = "bi_chat";

/// 节点名
pub mod nodes {
    pub const REASONING: &str = "reasoning";
    pub const RUN_RECOGNIZE_INTENT: &str = "run_recognize_intent";
    pub const RUN_GENERATE_SQL: &str = "run_generate_sql";
    pub const RUN_CHECK_SQL: &str = "run_check_sql";
    pub const RUN_ANALYZE_DATA: &str = "run_analyze_data";
    pub const END: &str = "__end__";
}

/// 消息来源
pub mod sources {
    /// 由流程自动衔接（而非模型请求）产生的调用
    pub const WORKFLOW: &str = "workflow";
}

/// 消息 metadata 字段
pub mod fields {
    /// 能力执行失败时置为 true
    pub const ERROR: &str = "error";
}
