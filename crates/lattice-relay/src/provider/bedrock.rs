//! AWS Bedrock provider using the model-native `InvokeModel` API
//!
//! Requests go out as Anthropic Messages JSON bodies; the model is addressed
//! through the invocation URL, so the body carries no model field. Streams
//! arrive as event-stream payload parts whose bytes each hold one Anthropic
//! stream event.

use std::collections::VecDeque;

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::error::ProvideErrorMetadata;
use aws_sdk_bedrockruntime::types::ResponseStream;
use aws_smithy_types::Blob;
use aws_smithy_runtime_api::client::result::SdkError;
use futures_util::stream;
use lattice_config::BedrockConfig;
use lattice_core::RequestContext;
use secrecy::ExposeSecret;

use super::{CompletionStream, Provider, ProviderCapabilities};
use crate::convert::anthropic::{AnthropicStreamState, to_completion_response, to_invoke_request};
use crate::error::RelayError;
use crate::model;
use crate::protocol::anthropic::{AnthropicInvokeResponse, AnthropicStreamEvent};
use crate::types::{CompletionRequest, CompletionResponse, Content, ContentPart};

/// Bedrock backend speaking the Anthropic-native invoke protocol
pub struct BedrockProvider {
    client: BedrockClient,
    default_max_tokens: u32,
}

impl BedrockProvider {
    /// Create from configuration
    pub async fn new(config: &BedrockConfig) -> Self {
        Self {
            client: build_bedrock_client(config).await,
            default_max_tokens: config.default_max_output_tokens,
        }
    }
}

/// Build a Bedrock runtime client from configuration
///
/// Explicit credentials take precedence; otherwise the default chain applies.
/// `endpoint_url` points the client at a stand-in server during testing.
async fn build_bedrock_client(config: &BedrockConfig) -> BedrockClient {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let (Some(access_key), Some(secret_key)) = (&config.access_key_id, &config.secret_access_key) {
        let credentials = aws_credential_types::Credentials::new(
            access_key.expose_secret(),
            secret_key.expose_secret(),
            None,
            None,
            "lattice-config",
        );
        builder = builder.credentials_provider(credentials);
    }

    let mut sdk_config = builder.load().await;

    if let Some(endpoint) = &config.endpoint_url {
        sdk_config = sdk_config.into_builder().endpoint_url(endpoint.as_str()).build();
    }

    BedrockClient::new(&sdk_config)
}

/// Reject image input for models whose registry entry is text-only
fn check_image_support(request: &CompletionRequest) -> Result<(), RelayError> {
    if model::is_multimodal(&request.model) {
        return Ok(());
    }

    let has_images = request.messages.iter().any(|msg| match &msg.content {
        Content::Parts(parts) => parts.iter().any(|part| matches!(part, ContentPart::Image { .. })),
        Content::Text(_) => false,
    });

    if has_images {
        return Err(RelayError::InvalidRequest(format!(
            "model {} does not accept image input",
            request.model
        )));
    }

    Ok(())
}

/// Map a Bedrock SDK error onto the relay taxonomy
fn handle_bedrock_error<E, R>(error: SdkError<E, R>) -> RelayError
where
    E: ProvideErrorMetadata + std::fmt::Debug,
    R: std::fmt::Debug,
{
    match &error {
        SdkError::ServiceError(service_error) => {
            let err = service_error.err();
            let message = err.message().unwrap_or("unknown error").to_owned();

            match err.code() {
                Some("ValidationException") => RelayError::InvalidRequest(message),
                Some(code) => RelayError::Upstream(format!("{code}: {message}")),
                None => RelayError::Upstream(message),
            }
        }
        other => RelayError::Upstream(other.to_string()),
    }
}

#[async_trait]
impl Provider for BedrockProvider {
    fn name(&self) -> &str {
        "bedrock"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            streaming: true,
            tool_calling: true,
        }
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
        _context: &RequestContext,
    ) -> Result<CompletionResponse, RelayError> {
        let model_id = model::resolve(&request.model)?;
        check_image_support(request)?;
        let body = serde_json::to_vec(&to_invoke_request(request, self.default_max_tokens))
            .map_err(|e| RelayError::Internal(e.into()))?;

        tracing::debug!(model = %request.model, model_id, "invoking model");

        let output = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model_id, error = %e, "bedrock invoke_model failed");
                handle_bedrock_error(e)
            })?;

        let response: AnthropicInvokeResponse =
            serde_json::from_slice(output.body.as_ref()).map_err(|e| RelayError::Decode(e.to_string()))?;

        Ok(to_completion_response(response, &request.model))
    }

    async fn complete_stream(
        &self,
        request: &CompletionRequest,
        _context: &RequestContext,
    ) -> Result<CompletionStream, RelayError> {
        let model_id = model::resolve(&request.model)?;
        check_image_support(request)?;
        let body = serde_json::to_vec(&to_invoke_request(request, self.default_max_tokens))
            .map_err(|e| RelayError::Internal(e.into()))?;

        tracing::debug!(model = %request.model, model_id, "invoking model with response stream");

        let output = self
            .client
            .invoke_model_with_response_stream()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model_id, error = %e, "bedrock invoke_model_with_response_stream failed");
                handle_bedrock_error(e)
            })?;

        let receiver = output.body;
        let state = AnthropicStreamState::new();

        // One payload part can translate to several chunks, so converted
        // events queue up and drain before the next receive.
        let stream = stream::unfold(
            (receiver, state, VecDeque::new()),
            |(mut receiver, mut state, mut pending)| async move {
                loop {
                    if let Some(event) = pending.pop_front() {
                        return Some((Ok(event), (receiver, state, pending)));
                    }

                    match receiver.recv().await {
                        Ok(Some(part)) => {
                            let bytes = match part {
                                ResponseStream::Chunk(payload) => payload.bytes,
                                _ => None,
                            };
                            let Some(bytes) = bytes else { continue };

                            match serde_json::from_slice::<AnthropicStreamEvent>(bytes.as_ref()) {
                                Ok(event) => pending.extend(state.convert_event(&event)),
                                // Malformed events are skipped, not fatal
                                Err(e) => {
                                    tracing::warn!(error = %e, "skipping undecodable stream event");
                                }
                            }
                        }
                        // Exhaustion without a message_stop still owes the
                        // terminal chunk and the Done sentinel.
                        Ok(None) => {
                            pending.extend(state.finish());
                            if pending.is_empty() {
                                return None;
                            }
                        }
                        Err(e) => {
                            return Some((
                                Err(RelayError::Streaming(e.to_string())),
                                (receiver, state, pending),
                            ));
                        }
                    }
                }
            },
        );

        Ok(Box::pin(stream))
    }
}
