use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use super::wire::{build_request_body, parse_completion};
use crate::error::{BiChatError, Result};
use crate::llm::client::LlmClient;
use crate::llm::config::LlmSettings;
use crate::llm::types::{LlmRequest, LlmResponse};

const MAX_ERROR_BODY: usize = 500;

/// OpenAI 兼容接口客户端（DashScope compatible-mode 等）
///
/// 连接参数在每次请求时从环境变量读取。
#[derive(Clone)]
pub struct GenericHttpClient {
    client: reqwest::Client,
}

impl GenericHttpClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| BiChatError::Other(anyhow!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LlmClient for GenericHttpClient {
    #[instrument(skip_all, fields(messages = request.messages.len()))]
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let settings = LlmSettings::from_env();
        let endpoint = settings.chat_completions_url();
        let body = build_request_body(&settings.model, &request);
        debug!(%endpoint, model = %settings.model, "calling chat completions");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BiChatError::Llm(format!("HTTP request error: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BiChatError::Llm(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(BiChatError::Llm(format!(
                "request failed with status {status}: {}\nEndpoint: {endpoint}",
                truncate(&text)
            )));
        }

        let payload: Value = serde_json::from_str(&text).map_err(|e| {
            BiChatError::Llm(format!("response parse error: {e}\nResponse body: {}", truncate(&text)))
        })?;
        parse_completion(&payload)
    }
}

fn truncate(text: &str) -> String {
    if text.len() <= MAX_ERROR_BODY {
        return text.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(已截断，总长度: {} 字节)", &text[..end], text.len())
}
