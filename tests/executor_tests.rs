use std::sync::Arc;

use serde_json::json;

use bichat::flow::constants::{nodes, sources};
use bichat::tools::capability::{
    SALES_SQL, SALES_SUMMARY, UNKNOWN_INTENT_SQL, USER_GROWTH_SUMMARY,
};
use bichat::{
    AgentMessage, BiChatError, FlowContext, FlowExecutor, Intent, LlmResponse, MessageRole,
    RoutingPolicy, ScriptedClient, SqlVerdict,
};

fn executor(client: &ScriptedClient, policy: RoutingPolicy) -> FlowExecutor {
    FlowExecutor::bi_chat(Arc::new(client.clone()), policy, None).expect("flow builds")
}

#[tokio::test]
async fn weather_question_ends_without_analysis() {
    let client = ScriptedClient::new([
        LlmResponse::tool_call("recognize_intent", json!({"user_query": "北京天气怎么样？"})),
        LlmResponse::text("抱歉，我只能回答销售额和用户增长相关的问题。"),
    ]);
    let ctx = FlowContext::new();

    let execution = executor(&client, RoutingPolicy::ModelDriven)
        .start(&ctx, AgentMessage::user("北京天气怎么样？"))
        .await
        .unwrap();

    assert_eq!(execution.last_node, nodes::END);
    assert_eq!(
        execution.trace,
        vec![nodes::REASONING, nodes::RUN_RECOGNIZE_INTENT, nodes::REASONING]
    );
    let state = ctx.state();
    assert_eq!(state.current_intent, Some(Intent::Unknown));
    assert!(state.analysis_result.is_none());

    let history = ctx.history();
    assert_eq!(history[2].role, MessageRole::Tool);
    assert_eq!(history[2].content, "unknown_intent");
    assert_eq!(
        execution.response_text(),
        Some("抱歉，我只能回答销售额和用户增长相关的问题。")
    );
}

#[tokio::test]
async fn guided_sales_question_runs_the_whole_chain() {
    let client = ScriptedClient::new([LlmResponse::tool_call(
        "recognize_intent",
        json!({"user_query": "上周销售额是多少"}),
    )]);
    let ctx = FlowContext::new();

    let execution = executor(&client, RoutingPolicy::Guided)
        .start(&ctx, AgentMessage::user("上周销售额是多少"))
        .await
        .unwrap();

    assert_eq!(
        execution.trace,
        vec![
            nodes::REASONING,
            nodes::RUN_RECOGNIZE_INTENT,
            nodes::RUN_GENERATE_SQL,
            nodes::RUN_CHECK_SQL,
            nodes::RUN_ANALYZE_DATA,
        ]
    );
    assert_eq!(execution.response_text(), Some(SALES_SUMMARY));
    assert_eq!(client.calls(), 1);

    let state = ctx.state();
    assert_eq!(state.current_intent, Some(Intent::SalesQuery));
    assert_eq!(state.generated_sql.as_deref(), Some(SALES_SQL));
    assert_eq!(state.sql_check_result, Some(SqlVerdict::Valid));
    assert_eq!(state.analysis_result.as_deref(), Some(SALES_SUMMARY));

    // 自动衔接的每个结果前都有一条 workflow 发起的调用
    let history = ctx.history();
    for pair in history.windows(2) {
        if pair[1].role == MessageRole::Tool {
            let call = pair[0].requested_call().expect("result follows its request");
            assert_eq!(Some(&call.id), pair[1].tool_call_id.as_ref());
        }
    }
    let synthesized = history
        .iter()
        .filter(|message| message.from == sources::WORKFLOW)
        .count();
    assert_eq!(synthesized, 3);
}

#[tokio::test]
async fn guided_sql_error_regenerates_once_then_stops() {
    let client = ScriptedClient::new([LlmResponse::tool_call(
        "sql_checker",
        json!({"sql_query": "DROP TABLE sales"}),
    )]);
    let ctx = FlowContext::new();

    let execution = executor(&client, RoutingPolicy::Guided)
        .start(&ctx, AgentMessage::user("帮我删掉销售表"))
        .await
        .unwrap();

    assert_eq!(
        execution.trace,
        vec![
            nodes::REASONING,
            nodes::RUN_CHECK_SQL,
            nodes::RUN_GENERATE_SQL,
            nodes::RUN_CHECK_SQL,
        ]
    );
    assert_eq!(execution.last_node, nodes::END);
    assert_eq!(
        execution.response_text(),
        Some("SQL_ERROR: Generated SQL contains errors.")
    );
    assert_eq!(client.calls(), 1);

    let state = ctx.state();
    assert_eq!(state.generated_sql.as_deref(), Some(UNKNOWN_INTENT_SQL));
    assert!(state.sql_check_result.is_some_and(|verdict| !verdict.is_valid()));
    assert!(state.analysis_result.is_none());
}

#[tokio::test]
async fn guided_sql_error_for_known_intent_does_not_loop() {
    let client = ScriptedClient::new([
        LlmResponse::tool_call("recognize_intent", json!({"user_query": "上周销售额"})),
    ]);
    let ctx = FlowContext::new();
    let executor = executor(&client, RoutingPolicy::Guided);
    executor
        .start(&ctx, AgentMessage::user("上周销售额"))
        .await
        .unwrap();

    // 第二轮模型检查一条危险 SQL，而会话里已有按意图生成的 SQL
    let client_turn = ScriptedClient::new([LlmResponse::tool_call(
        "sql_checker",
        json!({"sql_query": "drop table sales"}),
    )]);
    let execution = FlowExecutor::bi_chat(Arc::new(client_turn), RoutingPolicy::Guided, None)
        .unwrap()
        .start(&ctx, AgentMessage::user("执行 drop table sales"))
        .await
        .unwrap();

    assert_eq!(execution.trace, vec![nodes::REASONING, nodes::RUN_CHECK_SQL]);
    assert_eq!(
        execution.response_text(),
        Some("SQL_ERROR: Potentially dangerous SQL command.")
    );
}

#[tokio::test]
async fn guided_unknown_intent_stops_after_recognition() {
    let client = ScriptedClient::new([LlmResponse::tool_call(
        "recognize_intent",
        json!({"user_query": "北京天气怎么样？"}),
    )]);
    let ctx = FlowContext::new();

    let execution = executor(&client, RoutingPolicy::Guided)
        .start(&ctx, AgentMessage::user("北京天气怎么样？"))
        .await
        .unwrap();

    assert_eq!(execution.trace, vec![nodes::REASONING, nodes::RUN_RECOGNIZE_INTENT]);
    assert_eq!(execution.response_text(), Some("unknown_intent"));
    assert_eq!(client.calls(), 1);
    let state = ctx.state();
    assert_eq!(state.current_intent, Some(Intent::Unknown));
    assert!(state.generated_sql.is_none());
    assert!(state.analysis_result.is_none());
}

#[tokio::test]
async fn guided_argument_error_hands_back_to_the_model() {
    let client = ScriptedClient::new([
        LlmResponse::tool_call("generate_sql", json!({"intent": "sales_query"})),
        LlmResponse::text("请告诉我具体想查询什么。"),
    ]);
    let ctx = FlowContext::new();

    let execution = executor(&client, RoutingPolicy::Guided)
        .start(&ctx, AgentMessage::user("生成 SQL"))
        .await
        .unwrap();

    assert_eq!(
        execution.trace,
        vec![nodes::REASONING, nodes::RUN_GENERATE_SQL, nodes::REASONING]
    );
    assert_eq!(client.calls(), 2);
    let history = ctx.history();
    assert!(history[2].content.starts_with("Error:"));
    assert_eq!(history[2].metadata, Some(json!({"error": true})));
    assert!(ctx.state().generated_sql.is_none());
    assert_eq!(execution.response_text(), Some("请告诉我具体想查询什么。"));
}

#[tokio::test]
async fn model_driven_chain_follows_model_requests() {
    let client = ScriptedClient::new([
        LlmResponse::tool_call("recognize_intent", json!({"user_query": "分析用户增长"})),
        LlmResponse::tool_call(
            "generate_sql",
            json!({"intent": "user_growth_analysis", "user_query": "分析用户增长"}),
        ),
        LlmResponse::tool_call(
            "sql_checker",
            json!({"sql_query": "SELECT region, COUNT(user_id) FROM users GROUP BY region;"}),
        ),
        LlmResponse::tool_call(
            "data_analyzer",
            json!({"sql_query": "SELECT region, COUNT(user_id) FROM users GROUP BY region;"}),
        ),
        LlmResponse::text("用户增长稳定，亚太地区增长显著。"),
    ]);
    let ctx = FlowContext::new();

    let execution = executor(&client, RoutingPolicy::ModelDriven)
        .start(&ctx, AgentMessage::user("分析用户增长"))
        .await
        .unwrap();

    assert_eq!(execution.steps, 9);
    assert_eq!(client.calls(), 5);
    assert_eq!(ctx.state().analysis_result.as_deref(), Some(USER_GROWTH_SUMMARY));
    assert_eq!(execution.response_text(), Some("用户增长稳定，亚太地区增长显著。"));

    // 每次模型调用都带着完整 transcript 和四个能力声明
    let requests = client.requests();
    assert_eq!(requests[0].messages.len(), 1);
    assert_eq!(requests[4].messages.len(), 9);
    assert!(requests.iter().all(|request| request.tools.len() == 4));
}

#[tokio::test]
async fn step_budget_aborts_a_looping_model() {
    let client = ScriptedClient::repeating(LlmResponse::tool_call(
        "recognize_intent",
        json!({"user_query": "销售额"}),
    ));
    let ctx = FlowContext::new();

    let err = executor(&client, RoutingPolicy::ModelDriven)
        .start(&ctx, AgentMessage::user("销售额"))
        .await
        .unwrap_err();

    assert!(matches!(err, BiChatError::MaxIterationsExceeded(50)));
    assert_eq!(client.calls(), 25);
    assert_eq!(ctx.message_count(), 51);
}

#[tokio::test]
async fn custom_step_budget_is_respected() {
    let client = ScriptedClient::repeating(LlmResponse::tool_call(
        "recognize_intent",
        json!({"user_query": "销售额"}),
    ));
    let ctx = FlowContext::new();

    let err = executor(&client, RoutingPolicy::ModelDriven)
        .with_max_iterations(3)
        .start(&ctx, AgentMessage::user("销售额"))
        .await
        .unwrap_err();

    assert!(matches!(err, BiChatError::MaxIterationsExceeded(3)));
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn unknown_capability_request_ends_the_run() {
    let client = ScriptedClient::new([LlmResponse::tool_call(
        "get_weather",
        json!({"city": "北京"}),
    )]);
    let ctx = FlowContext::new();

    let execution = executor(&client, RoutingPolicy::ModelDriven)
        .start(&ctx, AgentMessage::user("北京天气怎么样？"))
        .await
        .unwrap();

    assert_eq!(execution.trace, vec![nodes::REASONING]);
    assert_eq!(execution.last_node, nodes::END);
    assert_eq!(ctx.message_count(), 2);
}

#[tokio::test]
async fn bad_arguments_are_reported_back_to_the_model() {
    let client = ScriptedClient::new([
        LlmResponse::tool_call("sql_checker", json!({"sql": "SELECT 1"})),
        LlmResponse::text("参数有误，请重新描述你的问题。"),
    ]);
    let ctx = FlowContext::new();

    let execution = executor(&client, RoutingPolicy::ModelDriven)
        .start(&ctx, AgentMessage::user("检查一下 SQL"))
        .await
        .unwrap();

    let history = ctx.history();
    assert!(history[2].content.starts_with("Error:"));
    assert_eq!(history[2].metadata, Some(json!({"error": true})));
    assert!(ctx.state().sql_check_result.is_none());
    assert_eq!(execution.steps, 3);
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn only_the_first_requested_call_is_kept() {
    let mut reply = LlmResponse::tool_call("recognize_intent", json!({"user_query": "销售额"}));
    reply.tool_calls.push(
        LlmResponse::tool_call("data_analyzer", json!({"sql_query": SALES_SQL})).tool_calls[0]
            .clone(),
    );
    let client = ScriptedClient::new([reply, LlmResponse::text("好的")]);
    let ctx = FlowContext::new();

    executor(&client, RoutingPolicy::ModelDriven)
        .start(&ctx, AgentMessage::user("销售额"))
        .await
        .unwrap();

    let history = ctx.history();
    assert_eq!(history[1].tool_calls.len(), 1);
    assert!(ctx.state().analysis_result.is_none());
}

#[tokio::test]
async fn model_failure_propagates() {
    let client = ScriptedClient::default();
    let ctx = FlowContext::new();

    let err = executor(&client, RoutingPolicy::ModelDriven)
        .start(&ctx, AgentMessage::user("销售额"))
        .await
        .unwrap_err();
    assert!(matches!(err, BiChatError::Llm(_)));
}

#[tokio::test]
async fn second_turn_sees_first_turn_history() {
    let client = ScriptedClient::new([LlmResponse::text("你好"), LlmResponse::text("再见")]);
    let executor = executor(&client, RoutingPolicy::ModelDriven);
    let ctx = FlowContext::new();

    executor.start(&ctx, AgentMessage::user("你好")).await.unwrap();
    let execution = executor.start(&ctx, AgentMessage::user("再见")).await.unwrap();

    assert_eq!(execution.response_text(), Some("再见"));
    assert_eq!(client.requests()[1].messages.len(), 3);
}
