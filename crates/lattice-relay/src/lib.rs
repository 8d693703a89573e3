//! Protocol translation core for Lattice
//!
//! Exposes an `OpenAI`-compatible chat completion surface while invoking
//! Anthropic Claude models on AWS Bedrock through their native Messages
//! JSON protocol. Translation is bidirectional: requests are reshaped into
//! the Bedrock invoke envelope, and both complete responses and live event
//! streams are reshaped back into `OpenAI` form.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod error;
pub mod model;
pub mod protocol;
pub mod provider;
pub mod router;
pub mod types;

pub use error::RelayError;
pub use provider::{Provider, ProviderCapabilities};
pub use router::{RelayState, relay_router};
pub use types::{CompletionRequest, CompletionResponse, StreamEvent};
