use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// `/chat` 的响应体，成功与失败都以 200 返回
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ChatResponse {
    Reply {
        response: String,
        session_id: String,
    },
    /// 会话已建立后的失败会带上 `session_id`，客户端可继续使用该会话
    Failure {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },
}

impl ChatResponse {
    pub fn failure(error: impl ToString, session_id: Option<String>) -> Self {
        ChatResponse::Failure {
            error: error.to_string(),
            session_id,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

impl Default for RootResponse {
    fn default() -> Self {
        Self {
            message: "FastAPI is running!",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
