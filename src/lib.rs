pub mod agent;
pub mod config;
pub mod error;
pub mod flow;
pub mod llm;
pub mod runtime;
pub mod server;
pub mod state;
pub mod tools;
pub mod utils;

pub use agent::{AgentMessage, CapabilityCall, MessageRole, ReasoningAgent};
pub use config::{EnvConfig, ServerConfig, DEFAULT_MAX_STEPS};
pub use error::{BiChatError, Result};
pub use flow::{bi_chat_flow, Flow, FlowBuilder, FlowNode, FlowNodeKind, Route, RoutingPolicy};
#[cfg(feature = "openai-client")]
pub use llm::GenericHttpClient;
pub use llm::{DynLlmClient, LlmClient, LlmRequest, LlmResponse, LlmSettings, ScriptedClient};
pub use runtime::{FlowExecution, FlowExecutor};
pub use server::{create_router, serve, AppState, ChatRequest, ChatResponse};
pub use state::{
    spawn_session_sweeper, FlowContext, MemorySessionStore, Session, SessionHandle,
    SessionSnapshot, SessionState, SessionStore, Transcript,
};
pub use tools::{
    Capability, Intent, SqlIssue, SqlVerdict, Tool, ToolInvocation, ToolManifest, ToolRegistry,
};
pub use utils::logging::{self, LoggingConfig};
