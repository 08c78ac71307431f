use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use super::types::{ChatRequest, ChatResponse, ErrorBody, RootResponse};
use super::AppState;
use crate::agent::AgentMessage;
use crate::error::Result;
use crate::log_error;
use crate::state::Session;

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse::default())
}

/// POST /chat
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<ChatResponse> {
    info!(
        session = request.session_id.as_deref().unwrap_or("<new>"),
        message = %request.message,
        "chat request"
    );
    let handle = match state
        .sessions
        .get_or_create(request.session_id.as_deref())
        .await
    {
        Ok(handle) => handle,
        Err(err) => {
            log_error!(err);
            return Json(ChatResponse::failure(err, None));
        }
    };

    let mut session = handle.lock().await;
    session.touch();
    let session_id = session.id().to_string();
    let result = run_turn(&state, &session, request.message).await;
    session.mark_active();

    match result {
        Ok(response) => Json(ChatResponse::Reply {
            response,
            session_id,
        }),
        Err(err) => {
            log_error!(err, session = session_id.as_str());
            Json(ChatResponse::failure(err, Some(session_id)))
        }
    }
}

async fn run_turn(state: &AppState, session: &Session, message: String) -> Result<String> {
    let execution = state
        .executor
        .start(session.context(), AgentMessage::user(message))
        .await?;
    let response = execution.response_text().unwrap_or_default().to_string();
    info!(
        session = session.id(),
        steps = execution.steps,
        trace = ?execution.trace,
        %response,
        "chat response"
    );
    Ok(response)
}

/// GET /sessions/:id
pub async fn session_snapshot(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let handle = match state.sessions.get(&id).await {
        Ok(Some(handle)) => handle,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: format!("session `{id}` not found"),
                }),
            )
                .into_response()
        }
        Err(err) => {
            log_error!(err, session = id.as_str());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: err.to_string(),
                }),
            )
                .into_response();
        }
    };
    let snapshot = handle.lock().await.snapshot();
    Json(snapshot).into_response()
}
