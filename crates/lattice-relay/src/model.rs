//! Static registry of the Claude models this gateway fronts
//!
//! Maps the client-facing model names to Bedrock model identifiers. The
//! Claude 3 generation uses direct model IDs; later generations must be
//! addressed through cross-region inference profile IDs.

use crate::error::RelayError;

/// One registry entry
#[derive(Debug, Clone, Copy)]
pub struct ModelEntry {
    /// Client-facing model name
    pub name: &'static str,
    /// Bedrock model or inference-profile identifier
    pub bedrock_id: &'static str,
    /// Whether the model accepts image input
    pub multimodal: bool,
}

/// All models the gateway accepts, in display order
pub const MODELS: &[ModelEntry] = &[
    ModelEntry {
        name: "claude-instant-1.2",
        bedrock_id: "anthropic.claude-instant-v1",
        multimodal: false,
    },
    ModelEntry {
        name: "claude-2.0",
        bedrock_id: "anthropic.claude-v2",
        multimodal: false,
    },
    ModelEntry {
        name: "claude-2.1",
        bedrock_id: "anthropic.claude-v2:1",
        multimodal: false,
    },
    ModelEntry {
        name: "claude-3-haiku-20240307",
        bedrock_id: "anthropic.claude-3-haiku-20240307-v1:0",
        multimodal: true,
    },
    ModelEntry {
        name: "claude-3-sonnet-20240229",
        bedrock_id: "anthropic.claude-3-sonnet-20240229-v1:0",
        multimodal: true,
    },
    ModelEntry {
        name: "claude-3-opus-20240229",
        bedrock_id: "anthropic.claude-3-opus-20240229-v1:0",
        multimodal: true,
    },
    ModelEntry {
        name: "claude-3-5-sonnet-20240620",
        bedrock_id: "anthropic.claude-3-5-sonnet-20240620-v1:0",
        multimodal: true,
    },
    ModelEntry {
        name: "claude-3-5-sonnet-20241022",
        bedrock_id: "us.anthropic.claude-3-5-sonnet-20241022-v2:0",
        multimodal: true,
    },
    ModelEntry {
        name: "claude-3-5-sonnet-latest",
        bedrock_id: "us.anthropic.claude-3-5-sonnet-20241022-v2:0",
        multimodal: true,
    },
    ModelEntry {
        name: "claude-3-5-haiku-20241022",
        bedrock_id: "us.anthropic.claude-3-5-haiku-20241022-v1:0",
        multimodal: false,
    },
    ModelEntry {
        name: "claude-3-7-sonnet-20250219",
        bedrock_id: "us.anthropic.claude-3-7-sonnet-20250219-v1:0",
        multimodal: true,
    },
    ModelEntry {
        name: "claude-opus-4-20250514",
        bedrock_id: "us.anthropic.claude-opus-4-20250514-v1:0",
        multimodal: true,
    },
    ModelEntry {
        name: "claude-sonnet-4-20250514",
        bedrock_id: "us.anthropic.claude-sonnet-4-20250514-v1:0",
        multimodal: true,
    },
];

/// Resolve a client-facing model name to its Bedrock identifier
///
/// # Errors
///
/// Returns [`RelayError::UnsupportedModel`] for names outside the registry,
/// before any backend call is attempted.
pub fn resolve(name: &str) -> Result<&'static str, RelayError> {
    MODELS
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.bedrock_id)
        .ok_or_else(|| RelayError::UnsupportedModel { model: name.to_owned() })
}

/// All client-facing model names, for the model listing endpoint
pub fn supported_models() -> impl Iterator<Item = &'static str> {
    MODELS.iter().map(|entry| entry.name)
}

/// Whether the named model accepts image input
pub fn is_multimodal(name: &str) -> bool {
    MODELS.iter().any(|entry| entry.name == name && entry.multimodal)
}
