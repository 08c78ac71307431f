//! OpenAI 兼容的 HTTP 客户端
//!
//! 请求体构建和响应解析是纯函数，便于脱离网络测试。

#[cfg(feature = "openai-client")]
pub mod generic;
pub mod wire;

#[cfg(feature = "openai-client")]
pub use generic::GenericHttpClient;
pub use wire::{build_request_body, parse_completion};
