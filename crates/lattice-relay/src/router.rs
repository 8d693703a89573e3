//! Axum route handlers for the `OpenAI`-compatible relay surface

use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use futures_util::{Stream, StreamExt};
use lattice_config::{BedrockConfig, BedrockProtocol};
use lattice_core::{HttpError, RequestContext};

use crate::convert;
use crate::convert::anthropic::{fresh_response_id, unix_timestamp};
use crate::error::RelayError;
use crate::model;
use crate::protocol::openai::{OpenAiModel, OpenAiModelList, OpenAiRequest, OpenAiResponse};
use crate::provider::bedrock::BedrockProvider;
use crate::provider::{CompletionStream, Provider, UnimplementedProvider};
use crate::types::{CompletionRequest, StreamEvent};

/// Shared state for relay route handlers
#[derive(Clone)]
pub struct RelayState {
    provider: Arc<dyn Provider>,
}

impl RelayState {
    /// Build state from configuration, constructing the backend
    pub async fn from_config(config: &BedrockConfig) -> Self {
        let provider: Arc<dyn Provider> = match config.protocol {
            BedrockProtocol::Invoke => Arc::new(BedrockProvider::new(config).await),
            // Reserved flavor; requests fail per-call with 501
            BedrockProtocol::Converse => Arc::new(UnimplementedProvider::new("converse")),
        };

        Self { provider }
    }

    /// Build state around an explicit provider
    ///
    /// Used by tests to substitute a scripted backend.
    pub fn with_provider(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

/// Build the relay router with all endpoints
pub fn relay_router(state: RelayState) -> Router {
    Router::new()
        .route("/v1/chat/completions", routing::post(chat_completions))
        .route("/v1/models", routing::get(list_models))
        .with_state(state)
}

/// Handle `POST /v1/chat/completions`
async fn chat_completions(
    State(state): State<RelayState>,
    axum::Extension(context): axum::Extension<RequestContext>,
    Json(wire_request): Json<OpenAiRequest>,
) -> Response {
    let model = wire_request.model.clone();
    let internal_request: CompletionRequest = wire_request.into();

    if internal_request.stream {
        match state.provider.complete_stream(&internal_request, &context).await {
            Ok(stream) => openai_stream_response(stream, model).into_response(),
            Err(e) => error_to_openai_response(&e),
        }
    } else {
        match state.provider.complete(&internal_request, &context).await {
            Ok(response) => Json(OpenAiResponse::from(response)).into_response(),
            Err(e) => error_to_openai_response(&e),
        }
    }
}

/// Handle `GET /v1/models`
async fn list_models() -> Response {
    let now = unix_timestamp();

    let data: Vec<OpenAiModel> = model::supported_models()
        .map(|name| OpenAiModel {
            id: name.to_owned(),
            object: "model".to_owned(),
            created: now,
            owned_by: "anthropic".to_owned(),
        })
        .collect();

    Json(OpenAiModelList {
        object: "list".to_owned(),
        data,
    })
    .into_response()
}

/// Build a streaming SSE response in `OpenAI` chunk format
///
/// id, model, and created are fixed once per stream; the terminal frame is a
/// literal `data: [DONE]`.
fn openai_stream_response(stream: CompletionStream, model: String) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let created = unix_timestamp();
    let response_id = fresh_response_id();

    let event_stream = stream.map(move |result| match result {
        Ok(StreamEvent::Delta(delta)) => {
            let chunk = convert::openai::delta_to_openai_chunk(&delta, &response_id, &model, created);
            let data = serde_json::to_string(&chunk).unwrap_or_default();
            Ok(Event::default().data(data))
        }
        Ok(StreamEvent::Usage(usage)) => {
            let chunk = convert::openai::usage_to_openai_chunk(&usage, &response_id, &model, created);
            let data = serde_json::to_string(&chunk).unwrap_or_default();
            Ok(Event::default().data(data))
        }
        Ok(StreamEvent::Done) => Ok(Event::default().data("[DONE]")),
        Err(e) => {
            let error_data = serde_json::json!({
                "error": {
                    "message": e.client_message(),
                    "type": e.error_type(),
                    "code": null
                }
            });
            Ok(Event::default().data(error_data.to_string()))
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}

/// Convert a relay error to an `OpenAI`-style JSON error response
fn error_to_openai_response(error: &RelayError) -> Response {
    let status = error.status_code();
    let body = serde_json::json!({
        "error": {
            "message": error.client_message(),
            "type": error.error_type(),
            "code": null
        }
    });

    (status, Json(body)).into_response()
}
