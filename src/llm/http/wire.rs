use std::collections::HashSet;

use serde_json::{json, Value};

use crate::agent::{AgentMessage, CapabilityCall, MessageRole};
use crate::error::{BiChatError, Result};
use crate::llm::types::{LlmRequest, LlmResponse};

/// 构建 chat/completions 请求体
///
/// 没有对应结果的能力调用（调用被中断时）不会发给模型，否则接口会拒绝请求。
pub fn build_request_body(model: &str, request: &LlmRequest) -> Value {
    let answered: HashSet<&str> = request
        .messages
        .iter()
        .filter(|message| message.role == MessageRole::Tool)
        .filter_map(|message| message.tool_call_id.as_deref())
        .collect();

    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system) = &request.system {
        messages.push(json!({ "role": "system", "content": system }));
    }
    for message in &request.messages {
        if let Some(encoded) = encode_message(message, &answered) {
            messages.push(encoded);
        }
    }

    let mut body = json!({
        "model": model,
        "messages": messages,
        "temperature": request.temperature,
    });
    if !request.tools.is_empty() {
        body["tools"] = Value::Array(
            request
                .tools
                .iter()
                .map(|manifest| manifest.to_function_schema())
                .collect(),
        );
    }
    body
}

fn encode_message(message: &AgentMessage, answered: &HashSet<&str>) -> Option<Value> {
    match message.role {
        MessageRole::Assistant => {
            let calls: Vec<Value> = message
                .tool_calls
                .iter()
                .filter(|call| answered.contains(call.id.as_str()))
                .map(encode_call)
                .collect();
            if calls.is_empty() && message.content.is_empty() {
                return None;
            }
            let mut encoded = json!({ "role": "assistant", "content": message.content });
            if !calls.is_empty() {
                encoded["tool_calls"] = Value::Array(calls);
            }
            Some(encoded)
        }
        MessageRole::Tool => Some(json!({
            "role": "tool",
            "tool_call_id": message.tool_call_id.clone().unwrap_or_default(),
            "content": message.content,
        })),
        role => Some(json!({ "role": role.as_str(), "content": message.content })),
    }
}

fn encode_call(call: &CapabilityCall) -> Value {
    let arguments = match &call.arguments {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    };
    json!({
        "id": call.id,
        "type": "function",
        "function": { "name": call.name, "arguments": arguments },
    })
}

/// 解析 chat/completions 响应
pub fn parse_completion(payload: &Value) -> Result<LlmResponse> {
    let message = payload["choices"]
        .get(0)
        .map(|choice| &choice["message"])
        .filter(|message| message.is_object())
        .ok_or_else(|| BiChatError::Llm(format!("missing message in response: {payload}")))?;

    let content = message["content"].as_str().unwrap_or_default().to_string();
    let tool_calls = message["tool_calls"]
        .as_array()
        .map(|calls| calls.iter().filter_map(decode_call).collect())
        .unwrap_or_default();

    Ok(LlmResponse {
        content,
        tool_calls,
        metadata: payload.get("usage").cloned(),
    })
}

fn decode_call(value: &Value) -> Option<CapabilityCall> {
    let function = value.get("function")?;
    let name = function["name"].as_str()?;
    let arguments = match &function["arguments"] {
        // 非法 JSON 原样保留，由能力执行时报告参数错误
        Value::String(raw) => serde_json::from_str(raw).unwrap_or_else(|_| json!(raw)),
        Value::Null => json!({}),
        other => other.clone(),
    };
    let call = CapabilityCall::new(name, arguments);
    Some(match value["id"].as_str() {
        Some(id) => call.with_id(id),
        None => call,
    })
}
