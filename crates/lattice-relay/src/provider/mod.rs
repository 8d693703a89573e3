//! Provider trait and the Bedrock backend

pub mod bedrock;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use lattice_core::RequestContext;

use crate::error::RelayError;
use crate::types::{CompletionRequest, CompletionResponse, StreamEvent};

/// Boxed stream of completion events
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, RelayError>> + Send>>;

/// Capabilities advertised by a provider
#[derive(Debug, Clone)]
pub struct ProviderCapabilities {
    /// Whether the provider supports streaming responses
    pub streaming: bool,
    /// Whether the provider supports tool/function calling
    pub tool_calling: bool,
}

/// Trait implemented by each completion backend
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Advertised capabilities
    fn capabilities(&self) -> ProviderCapabilities;

    /// Send a non-streaming completion request
    async fn complete(
        &self,
        request: &CompletionRequest,
        context: &RequestContext,
    ) -> Result<CompletionResponse, RelayError>;

    /// Send a streaming completion request
    async fn complete_stream(
        &self,
        request: &CompletionRequest,
        context: &RequestContext,
    ) -> Result<CompletionStream, RelayError>;
}

/// Backend for config-selected protocols that have no implementation yet
///
/// Accepts every request and fails it with `not_implemented`, so the server
/// still starts and reports the gap per request instead of at boot.
pub struct UnimplementedProvider {
    protocol: &'static str,
}

impl UnimplementedProvider {
    /// Create a placeholder for the named protocol
    pub const fn new(protocol: &'static str) -> Self {
        Self { protocol }
    }
}

#[async_trait]
impl Provider for UnimplementedProvider {
    fn name(&self) -> &str {
        self.protocol
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            streaming: false,
            tool_calling: false,
        }
    }

    async fn complete(
        &self,
        _request: &CompletionRequest,
        _context: &RequestContext,
    ) -> Result<CompletionResponse, RelayError> {
        Err(RelayError::NotImplemented(self.protocol))
    }

    async fn complete_stream(
        &self,
        _request: &CompletionRequest,
        _context: &RequestContext,
    ) -> Result<CompletionStream, RelayError> {
        Err(RelayError::NotImplemented(self.protocol))
    }
}
