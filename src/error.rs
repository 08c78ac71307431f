use thiserror::Error;

pub type Result<T> = std::result::Result<T, BiChatError>;

#[derive(Debug, Error)]
pub enum BiChatError {
    #[error("unknown node `{0}` in flow")]
    UnknownNode(String),
    #[error("capability `{0}` not registered")]
    CapabilityNotRegistered(String),
    #[error("invalid arguments for `{capability}`: {reason}")]
    InvalidArguments { capability: String, reason: String },
    #[error("invalid transition from `{from}`: {reason}")]
    InvalidTransition { from: String, reason: String },
    #[error("maximum iterations {0} exceeded")]
    MaxIterationsExceeded(u32),
    #[error("llm error: {0}")]
    Llm(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BiChatError {
    pub fn invalid_arguments(capability: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            capability: capability.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BiChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
