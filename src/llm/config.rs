use crate::config::EnvConfig;

pub const MODEL_ENV: &str = "DASHSCOPE_MODEL";
pub const API_KEY_ENV: &str = "DASHSCOPE_API_KEY";
pub const BASE_URL_ENV: &str = "DASHSCOPE_BASE_URL";

pub const DEFAULT_MODEL: &str = "qwen-plus";
/// `DASHSCOPE_BASE_URL` 为空时使用的端点
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// 模型连接参数，每次调用模型时重新读取环境变量
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LlmSettings {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
}

impl LlmSettings {
    pub fn from_env() -> Self {
        Self {
            model: EnvConfig::get_env_or(MODEL_ENV, DEFAULT_MODEL),
            api_key: EnvConfig::get_env_or(API_KEY_ENV, ""),
            base_url: EnvConfig::get_env_or(BASE_URL_ENV, ""),
        }
    }

    /// chat/completions 的完整地址
    pub fn chat_completions_url(&self) -> String {
        let base = match self.base_url.trim() {
            "" => DEFAULT_BASE_URL,
            base => base,
        };
        if base.contains("/chat/completions") {
            base.to_string()
        } else {
            format!("{}/chat/completions", base.trim_end_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str) -> LlmSettings {
        LlmSettings {
            model: DEFAULT_MODEL.into(),
            api_key: String::new(),
            base_url: base_url.into(),
        }
    }

    #[test]
    fn completions_url_is_normalized() {
        assert_eq!(
            settings("https://dashscope.aliyuncs.com/compatible-mode/v1/").chat_completions_url(),
            "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions"
        );
        assert_eq!(
            settings("http://localhost:9000/v1/chat/completions").chat_completions_url(),
            "http://localhost:9000/v1/chat/completions"
        );
        assert_eq!(
            settings("").chat_completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
