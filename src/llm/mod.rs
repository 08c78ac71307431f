pub mod client;
pub mod config;
pub mod http;
pub mod scripted;
pub mod types;

pub use client::{DynLlmClient, LlmClient};
pub use config::LlmSettings;
#[cfg(feature = "openai-client")]
pub use http::GenericHttpClient;
pub use scripted::ScriptedClient;
pub use types::{LlmRequest, LlmResponse};
