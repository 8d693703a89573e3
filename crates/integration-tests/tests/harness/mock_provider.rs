//! Scripted in-process provider, substituted for the Bedrock backend

use async_trait::async_trait;
use futures_util::stream;
use lattice_core::RequestContext;
use lattice_relay::provider::CompletionStream;
use lattice_relay::types::{Choice, ChoiceMessage, FinishReason, Usage};
use lattice_relay::{CompletionRequest, CompletionResponse, Provider, ProviderCapabilities, RelayError, StreamEvent};

/// Provider that replays a canned response or event script
pub struct ScriptedProvider {
    response: Option<CompletionResponse>,
    events: Vec<StreamEvent>,
    upstream_error: Option<String>,
}

impl ScriptedProvider {
    /// Replies to non-streaming requests with the given response
    pub fn completing(response: CompletionResponse) -> Self {
        Self {
            response: Some(response),
            events: Vec::new(),
            upstream_error: None,
        }
    }

    /// Replies to streaming requests with the given event sequence
    pub fn streaming(events: Vec<StreamEvent>) -> Self {
        Self {
            response: None,
            events,
            upstream_error: None,
        }
    }

    /// Fails every request with an upstream error
    pub fn failing_upstream(message: &str) -> Self {
        Self {
            response: None,
            events: Vec::new(),
            upstream_error: Some(message.to_owned()),
        }
    }
}

/// A plain text completion response with usage, echoing the given model
pub fn text_response(model: &str, content: &str) -> CompletionResponse {
    CompletionResponse {
        id: "chatcmpl-test".to_owned(),
        object: "chat.completion".to_owned(),
        created: 1_700_000_000,
        model: model.to_owned(),
        choices: vec![Choice {
            index: 0,
            message: ChoiceMessage {
                role: "assistant".to_owned(),
                content: Some(content.to_owned()),
                tool_calls: None,
            },
            finish_reason: Some(FinishReason::Stop),
        }],
        usage: Some(Usage::new(5, 1)),
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            streaming: true,
            tool_calling: true,
        }
    }

    async fn complete(
        &self,
        _request: &CompletionRequest,
        _context: &RequestContext,
    ) -> Result<CompletionResponse, RelayError> {
        if let Some(message) = &self.upstream_error {
            return Err(RelayError::Upstream(message.clone()));
        }
        Ok(self.response.clone().expect("scripted response"))
    }

    async fn complete_stream(
        &self,
        _request: &CompletionRequest,
        _context: &RequestContext,
    ) -> Result<CompletionStream, RelayError> {
        if let Some(message) = &self.upstream_error {
            return Err(RelayError::Upstream(message.clone()));
        }
        let events: Vec<Result<StreamEvent, RelayError>> = self.events.clone().into_iter().map(Ok).collect();
        Ok(Box::pin(stream::iter(events)))
    }
}
