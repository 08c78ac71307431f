// HTTP 服务：路由、共享状态与启动

pub mod handlers;
pub mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use types::{ChatRequest, ChatResponse, RootResponse};

use crate::config::ServerConfig;
use crate::runtime::FlowExecutor;
use crate::state::SessionStore;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub executor: Arc<FlowExecutor>,
}

impl AppState {
    pub fn new(sessions: Arc<dyn SessionStore>, executor: FlowExecutor) -> Self {
        Self {
            sessions,
            executor: Arc::new(executor),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/chat", post(handlers::chat))
        .route("/sessions/:id", get(handlers::session_snapshot))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn bind(config: &ServerConfig) -> std::io::Result<TcpListener> {
    TcpListener::bind(config.bind_address()).await
}

pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let listener = bind(config).await?;
    let addr = listener.local_addr()?;
    let app = create_router(state);

    info!(
        %addr,
        routing = %config.routing,
        max_steps = config.max_steps,
        "starting bichat server"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
