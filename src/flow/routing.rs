//! 路由函数：只读取会话状态和最后一条消息，返回下一站。

use crate::agent::AgentMessage;
use crate::flow::constants::{fields, nodes};
use crate::flow::nodes::capability_node;
use crate::state::SessionState;
use crate::tools::{generate_sql, Capability, Intent, SqlVerdict};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Reasoning,
    Capability(Capability),
    End,
}

impl Route {
    pub fn node_name(&self) -> &'static str {
        match self {
            Route::Reasoning => nodes::REASONING,
            Route::Capability(capability) => capability_node(*capability),
            Route::End => nodes::END,
        }
    }
}

pub type RouteFn = fn(&SessionState, Option<&AgentMessage>) -> Route;

/// 推理步骤之后：执行模型请求的第一个能力，没有请求或名称未知时结束
pub fn route_after_reasoning(_state: &SessionState, last: Option<&AgentMessage>) -> Route {
    match last.and_then(AgentMessage::requested_call) {
        Some(call) => Capability::from_name(&call.name)
            .map(Route::Capability)
            .unwrap_or(Route::End),
        None => Route::End,
    }
}

pub fn route_after_capability(_state: &SessionState, _last: Option<&AgentMessage>) -> Route {
    Route::Reasoning
}

/// 能力因参数错误没有产出结果
fn last_result_failed(last: Option<&AgentMessage>) -> bool {
    last.and_then(|message| message.metadata.as_ref())
        .and_then(|metadata| metadata.get(fields::ERROR))
        .and_then(|flag| flag.as_bool())
        .unwrap_or(false)
}

/// 意图已知时继续生成 SQL，否则结束
pub fn should_continue_after_intent(state: &SessionState, last: Option<&AgentMessage>) -> Route {
    if last_result_failed(last) {
        return Route::Reasoning;
    }
    match state.current_intent {
        Some(intent) if intent.is_known() => Route::Capability(Capability::GenerateSql),
        _ => Route::End,
    }
}

pub fn route_after_sql_generation(_state: &SessionState, last: Option<&AgentMessage>) -> Route {
    if last_result_failed(last) {
        return Route::Reasoning;
    }
    Route::Capability(Capability::SqlChecker)
}

/// SQL 有效时分析数据，有错误时重新生成，未检查时结束
///
/// 重新生成只由意图决定；当前 SQL 已是重新生成的结果时不再重试，检查结论即为本轮结果。
pub fn should_continue_after_sql_check(
    state: &SessionState,
    last: Option<&AgentMessage>,
) -> Route {
    if last_result_failed(last) {
        return Route::Reasoning;
    }
    match state.sql_check_result {
        Some(SqlVerdict::Valid) => Route::Capability(Capability::DataAnalyzer),
        Some(SqlVerdict::Error(_)) if regeneration_is_pointless(state) => Route::End,
        Some(SqlVerdict::Error(_)) => Route::Capability(Capability::GenerateSql),
        None => Route::End,
    }
}

fn regeneration_is_pointless(state: &SessionState) -> bool {
    let intent = state.current_intent.unwrap_or(Intent::Unknown);
    state.generated_sql.as_deref() == Some(generate_sql(intent, ""))
}

pub fn route_after_analysis(_state: &SessionState, last: Option<&AgentMessage>) -> Route {
    if last_result_failed(last) {
        return Route::Reasoning;
    }
    Route::End
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::CapabilityCall;
    use crate::tools::{Intent, SqlIssue};
    use serde_json::json;

    fn requesting(name: &str) -> AgentMessage {
        AgentMessage::assistant_with_calls("", vec![CapabilityCall::new(name, json!({}))])
    }

    #[test]
    fn reasoning_routes_to_first_requested_capability() {
        let state = SessionState::default();
        let mut message = requesting("sql_checker");
        message
            .tool_calls
            .push(CapabilityCall::new("data_analyzer", json!({})));
        assert_eq!(
            route_after_reasoning(&state, Some(&message)),
            Route::Capability(Capability::SqlChecker)
        );
        assert_eq!(route_after_reasoning(&state, Some(&requesting("weather"))), Route::End);
        assert_eq!(
            route_after_reasoning(&state, Some(&AgentMessage::assistant("你好"))),
            Route::End
        );
        assert_eq!(route_after_reasoning(&state, None), Route::End);
    }

    #[test]
    fn intent_routing() {
        let mut state = SessionState::default();
        assert_eq!(should_continue_after_intent(&state, None), Route::End);
        state.current_intent = Some(Intent::Unknown);
        assert_eq!(should_continue_after_intent(&state, None), Route::End);
        state.current_intent = Some(Intent::UserGrowthAnalysis);
        assert_eq!(
            should_continue_after_intent(&state, None),
            Route::Capability(Capability::GenerateSql)
        );
    }

    #[test]
    fn sql_check_routing() {
        let mut state = SessionState::default();
        assert_eq!(should_continue_after_sql_check(&state, None), Route::End);
        state.sql_check_result = Some(SqlVerdict::Valid);
        assert_eq!(
            should_continue_after_sql_check(&state, None),
            Route::Capability(Capability::DataAnalyzer)
        );
        state.sql_check_result = Some(SqlVerdict::Error(SqlIssue::Dangerous));
        assert_eq!(
            should_continue_after_sql_check(&state, None),
            Route::Capability(Capability::GenerateSql)
        );
    }

    #[test]
    fn sql_error_retries_at_most_once() {
        let mut state = SessionState::default();
        state.sql_check_result = Some(SqlVerdict::Error(SqlIssue::ContainsErrors));
        state.generated_sql = Some("SELECT * FROM sales; DROP TABLE sales;".into());
        assert_eq!(
            should_continue_after_sql_check(&state, None),
            Route::Capability(Capability::GenerateSql)
        );

        // 已经是按当前意图重新生成的 SQL
        state.generated_sql = Some(generate_sql(Intent::Unknown, "").to_string());
        assert_eq!(should_continue_after_sql_check(&state, None), Route::End);

        state.current_intent = Some(Intent::SalesQuery);
        state.generated_sql = Some(generate_sql(Intent::SalesQuery, "").to_string());
        state.sql_check_result = Some(SqlVerdict::Error(SqlIssue::Dangerous));
        assert_eq!(should_continue_after_sql_check(&state, None), Route::End);
    }

    #[test]
    fn failed_result_hands_back_to_reasoning() {
        let mut state = SessionState::default();
        state.sql_check_result = Some(SqlVerdict::Valid);
        let failed = AgentMessage::tool("sql_checker", "c1", "Error: missing `sql_query`")
            .with_metadata(json!({ "error": true }));
        assert_eq!(should_continue_after_sql_check(&state, Some(&failed)), Route::Reasoning);
        assert_eq!(route_after_analysis(&state, Some(&failed)), Route::Reasoning);
    }

    #[test]
    fn route_names_match_nodes() {
        assert_eq!(Route::End.node_name(), "__end__");
        assert_eq!(
            Route::Capability(Capability::SqlChecker).node_name(),
            "run_check_sql"
        );
    }
}
