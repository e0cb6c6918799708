use crate::memory::DEFAULT_USER_ID;
use crate::relay::ChatRelay;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

pub const SERVICE_NAME: &str = "AI coach relay";

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ChatRelay>,
    pub deployed_on: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
}

/// Build the public router. `embedded` only changes what `GET /` reports.
pub fn router(relay: Arc<ChatRelay>, embedded: bool) -> Router {
    let state = AppState {
        relay,
        deployed_on: if embedded { "embedded" } else { "managed" },
    };

    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/chat", post(chat))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "AI coach relay is online.",
        "endpoints": {
            "chat": "POST /api/chat",
            "health": "GET /api/health",
            "status": "GET /",
        },
        "timestamp": Utc::now().to_rfc3339(),
        "deployed_on": state.deployed_on,
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "online",
        "service": SERVICE_NAME,
        "model": state.relay.model(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "rejected chat request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Request body must be a JSON object with a message field." })),
            )
                .into_response();
        }
    };

    let user_id = payload
        .user_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string());
    let message = payload.message.unwrap_or_default();

    let span = info_span!("chat", request_id = %Uuid::new_v4(), user = %user_id);
    match state
        .relay
        .handle_message(&user_id, &message)
        .instrument(span)
        .await
    {
        Ok(reply) => {
            let mut body = json!({
                "success": true,
                "reply": reply.reply,
                "userId": user_id,
            });
            if let Some(usage) = reply.usage {
                body["usage"] = usage;
            }
            Json(body).into_response()
        }
        Err(e) => e.into_response(),
    }
}
