//! Conversions between wire protocols and internal types
//!
//! The `OpenAI` module covers the client-facing surface; the Anthropic module
//! covers the Bedrock-facing invoke protocol, including the streaming state
//! machine.

pub mod anthropic;
pub mod openai;
