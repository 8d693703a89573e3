//! Conversion between internal types and the `OpenAI` wire format

use crate::protocol::openai::{
    OpenAiChoice, OpenAiChoiceMessage, OpenAiContent, OpenAiContentPart, OpenAiFunctionCall, OpenAiMessage,
    OpenAiRequest, OpenAiResponse, OpenAiStreamChoice, OpenAiStreamChunk, OpenAiStreamDelta,
    OpenAiStreamFunctionCall, OpenAiStreamToolCall, OpenAiTool, OpenAiToolCall, OpenAiUsage,
};
use crate::types::{
    CompletionParams, CompletionRequest, CompletionResponse, Content, ContentPart, FinishReason, FunctionCall,
    FunctionDefinition, Message, Role, StreamDelta, ToolCall, ToolDefinition, Usage,
};

// -- Inbound: OpenAI wire format -> internal types --

impl From<OpenAiRequest> for CompletionRequest {
    fn from(req: OpenAiRequest) -> Self {
        Self {
            model: req.model,
            messages: req.messages.into_iter().map(Into::into).collect(),
            params: CompletionParams {
                temperature: req.temperature,
                top_p: req.top_p,
                max_tokens: req.max_tokens,
                stop: req.stop,
            },
            tools: req.tools.map(|tools| tools.into_iter().map(Into::into).collect()),
            stream: req.stream.unwrap_or(false),
        }
    }
}

impl From<OpenAiMessage> for Message {
    fn from(msg: OpenAiMessage) -> Self {
        let role = match msg.role.as_str() {
            "system" => Role::System,
            "assistant" => Role::Assistant,
            "tool" => Role::Tool,
            _ => Role::User,
        };

        let content = match msg.content {
            Some(OpenAiContent::Text(text)) => Content::Text(text),
            Some(OpenAiContent::Parts(parts)) => Content::Parts(parts.into_iter().map(Into::into).collect()),
            None => Content::Text(String::new()),
        };

        let tool_calls = msg.tool_calls.map(|calls| {
            calls
                .into_iter()
                .map(|tc| ToolCall {
                    id: tc.id,
                    function: FunctionCall {
                        name: tc.function.name,
                        arguments: tc.function.arguments,
                    },
                })
                .collect()
        });

        Self {
            role,
            content,
            tool_calls,
            tool_call_id: msg.tool_call_id,
        }
    }
}

impl From<OpenAiContentPart> for ContentPart {
    fn from(part: OpenAiContentPart) -> Self {
        match part {
            OpenAiContentPart::Text { text } => Self::Text { text },
            OpenAiContentPart::ImageUrl { image_url } => Self::Image { url: image_url.url },
        }
    }
}

impl From<OpenAiTool> for ToolDefinition {
    fn from(tool: OpenAiTool) -> Self {
        Self {
            tool_type: tool.tool_type,
            function: FunctionDefinition {
                name: tool.function.name,
                description: tool.function.description,
                parameters: tool.function.parameters,
            },
        }
    }
}

// -- Outbound: internal types -> OpenAI wire format --

impl From<CompletionResponse> for OpenAiResponse {
    fn from(resp: CompletionResponse) -> Self {
        Self {
            id: resp.id,
            object: resp.object,
            created: resp.created,
            model: resp.model,
            choices: resp.choices.into_iter().map(Into::into).collect(),
            usage: resp.usage.map(Into::into),
        }
    }
}

impl From<crate::types::Choice> for OpenAiChoice {
    fn from(choice: crate::types::Choice) -> Self {
        Self {
            index: choice.index,
            message: OpenAiChoiceMessage {
                role: choice.message.role,
                content: choice.message.content,
                tool_calls: choice.message.tool_calls.map(|calls| {
                    calls
                        .into_iter()
                        .map(|tc| OpenAiToolCall {
                            id: tc.id,
                            tool_type: "function".to_owned(),
                            function: OpenAiFunctionCall {
                                name: tc.function.name,
                                arguments: tc.function.arguments,
                            },
                        })
                        .collect()
                }),
            },
            finish_reason: choice.finish_reason.map(|fr| finish_reason_str(fr).to_owned()),
        }
    }
}

impl From<Usage> for OpenAiUsage {
    fn from(usage: Usage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

const fn finish_reason_str(reason: FinishReason) -> &'static str {
    match reason {
        FinishReason::Stop => "stop",
        FinishReason::Length => "length",
        FinishReason::ToolCalls => "tool_calls",
    }
}

// -- Streaming --

/// Convert an internal stream delta to an `OpenAI` stream chunk
pub fn delta_to_openai_chunk(delta: &StreamDelta, id: &str, model: &str, created: u64) -> OpenAiStreamChunk {
    let tool_calls = delta.tool_call.as_ref().map(|tc| {
        vec![OpenAiStreamToolCall {
            index: tc.index,
            id: tc.id.clone(),
            tool_type: tc.id.as_ref().map(|_| "function".to_owned()),
            function: tc.function.as_ref().map(|f| OpenAiStreamFunctionCall {
                name: f.name.clone(),
                arguments: f.arguments.clone(),
            }),
        }]
    });

    OpenAiStreamChunk {
        id: id.to_owned(),
        object: "chat.completion.chunk".to_owned(),
        created,
        model: model.to_owned(),
        choices: vec![OpenAiStreamChoice {
            index: delta.index,
            delta: OpenAiStreamDelta {
                role: delta.role.clone(),
                content: delta.content.clone(),
                tool_calls,
            },
            finish_reason: delta.finish_reason.map(|fr| finish_reason_str(fr).to_owned()),
        }],
        usage: None,
    }
}

/// Convert an internal `Usage` to an `OpenAI` stream chunk with usage data
///
/// The usage chunk carries no choices; it precedes the `[DONE]` sentinel.
pub fn usage_to_openai_chunk(usage: &Usage, id: &str, model: &str, created: u64) -> OpenAiStreamChunk {
    OpenAiStreamChunk {
        id: id.to_owned(),
        object: "chat.completion.chunk".to_owned(),
        created,
        model: model.to_owned(),
        choices: vec![],
        usage: Some(OpenAiUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }),
    }
}
