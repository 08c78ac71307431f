pub mod message;
pub mod reasoning;

pub use message::{uuid, AgentMessage, CapabilityCall, MessageRole};
pub use reasoning::ReasoningAgent;
