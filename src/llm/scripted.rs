use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::client::LlmClient;
use super::types::{LlmRequest, LlmResponse};
use crate::error::{BiChatError, Result};

/// 按预设脚本回复的模型，用于测试和离线演示
#[derive(Clone, Default)]
pub struct ScriptedClient {
    replies: Arc<Mutex<VecDeque<LlmResponse>>>,
    fallback: Option<LlmResponse>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<LlmRequest>>>,
}

impl ScriptedClient {
    pub fn new<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = LlmResponse>,
    {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            ..Self::default()
        }
    }

    /// 脚本用完后一直返回 `reply`
    pub fn repeating(reply: LlmResponse) -> Self {
        Self::default().with_fallback(reply)
    }

    pub fn with_fallback(mut self, reply: LlmResponse) -> Self {
        self.fallback = Some(reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request);
        let next = self.replies.lock().pop_front();
        match next.or_else(|| self.fallback.clone()) {
            Some(reply) => Ok(reply),
            None => Err(BiChatError::Llm("scripted client has no replies left".into())),
        }
    }
}
