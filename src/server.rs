use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::GatewayConfig,
    error::GatewayError,
    horde::HordeClient,
    ids::IdGenerator,
    mapping,
    openai::{ChatCompletionRequest, ChatCompletionResponse, CompletionRequest, CompletionResponse},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub horde: Arc<HordeClient>,
    pub ids: Arc<dyn IdGenerator>,
}

pub fn build_router(
    config: Arc<GatewayConfig>,
    horde: Arc<HordeClient>,
    ids: Arc<dyn IdGenerator>,
) -> Router {
    let state = AppState { config, horde, ids };

    Router::new()
        .route("/health", get(health))
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/completions", post(completions))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

async fn chat_completions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatCompletionResponse>, GatewayError> {
    let request: ChatCompletionRequest =
        serde_json::from_slice(&body).map_err(|err| GatewayError::Decode(err.to_string()))?;

    info!(model = %request.model, messages = request.messages.len(), "chat completion requested");

    let job = mapping::chat_to_job(&request, &state.config);
    let api_key = bearer_key(&headers, &state.config.anonymous_key);
    let status = state.horde.submit_and_await(&job, &api_key).await?;

    Ok(Json(mapping::job_to_chat(&status, state.ids.as_ref())?))
}

async fn completions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CompletionResponse>, GatewayError> {
    let request: CompletionRequest =
        serde_json::from_slice(&body).map_err(|err| GatewayError::Decode(err.to_string()))?;

    info!(model = %request.model, max_tokens = request.max_tokens, "completion requested");

    let job = mapping::completion_to_job(&request, &state.config);
    let api_key = bearer_key(&headers, &state.config.anonymous_key);
    let status = state.horde.submit_and_await(&job, &api_key).await?;

    Ok(Json(mapping::job_to_completion(
        &status,
        state.ids.as_ref(),
    )?))
}

// The caller's Authorization header is forwarded to the generation
// service; requests without one run under the anonymous key.
fn bearer_key(headers: &HeaderMap, anonymous: &str) -> String {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    let key = raw.strip_prefix("Bearer ").unwrap_or(raw);
    if key.is_empty() {
        anonymous.to_string()
    } else {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_key_strips_prefix() {
        let headers = headers_with_auth("Bearer secret-key");
        assert_eq!(bearer_key(&headers, "anon"), "secret-key");
    }

    #[test]
    fn test_bearer_key_keeps_bare_value() {
        let headers = headers_with_auth("secret-key");
        assert_eq!(bearer_key(&headers, "anon"), "secret-key");
    }

    #[test]
    fn test_bearer_key_missing_header_uses_anonymous() {
        assert_eq!(bearer_key(&HeaderMap::new(), "anon"), "anon");
    }

    #[test]
    fn test_bearer_key_empty_value_uses_anonymous() {
        let headers = headers_with_auth("Bearer ");
        assert_eq!(bearer_key(&headers, "anon"), "anon");
    }
}
