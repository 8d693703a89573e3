//! Internal canonical types for request/response representation
//!
//! These types are the normalized internal representation that both wire
//! formats (the `OpenAI` surface and the Anthropic-native Bedrock protocol)
//! convert to and from.

pub mod message;
pub mod request;
pub mod response;
pub mod stream;
pub mod tool;

pub use message::{Content, ContentPart, FunctionCall, Message, Role, ToolCall};
pub use request::{CompletionParams, CompletionRequest};
pub use response::{Choice, ChoiceMessage, CompletionResponse, FinishReason, Usage};
pub use stream::{StreamDelta, StreamEvent, StreamFunctionCall, StreamToolCall};
pub use tool::{FunctionDefinition, ToolDefinition};
