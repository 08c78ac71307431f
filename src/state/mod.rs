// 状态管理模块

mod context;
mod session;
mod session_state;
mod store;
mod transcript;

pub use context::FlowContext;
pub use session::{Session, SessionSnapshot};
pub use session_state::SessionState;
pub use store::{
    new_session_id, spawn_session_sweeper, MemorySessionStore, SessionHandle, SessionStore,
};
pub use transcript::Transcript;
