//! Conversion between internal types and the Anthropic-native invoke protocol
//!
//! Inbound requests become invoke bodies (system prompt hoisted, tool traffic
//! reshaped into content blocks); invoke responses and stream events become
//! internal completions and chunks. [`AnthropicStreamState`] is the
//! per-stream translator, fed one decoded backend event at a time.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::protocol::anthropic::{
    ANTHROPIC_VERSION, AnthropicContent, AnthropicContentBlock, AnthropicImageSource, AnthropicInvokeRequest,
    AnthropicInvokeResponse, AnthropicMessage, AnthropicResponseBlock, AnthropicStreamContentBlock,
    AnthropicStreamDelta, AnthropicStreamEvent, AnthropicTool,
};
use crate::types::{
    Choice, ChoiceMessage, CompletionRequest, CompletionResponse, Content, ContentPart, FinishReason, FunctionCall,
    Message, Role, StreamDelta, StreamEvent, StreamFunctionCall, StreamToolCall, ToolCall, Usage,
};

// -- Tool argument policy --

/// Decode a tool-call argument string into JSON for the backend
///
/// Upstream argument encoding is not contractually guaranteed, so a string
/// that fails to decode is passed through as a raw JSON string rather than
/// rejected.
pub fn decode_tool_arguments(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_owned()))
}

/// Serialize a backend `tool_use` input for the client-facing argument string
pub fn encode_tool_arguments(input: &serde_json::Value) -> String {
    input.to_string()
}

// -- Stop reason mapping --

/// Map a backend stop reason onto the client vocabulary
///
/// Total: unknown and absent reasons map to [`FinishReason::Stop`].
pub fn map_stop_reason(stop_reason: Option<&str>) -> FinishReason {
    match stop_reason {
        Some("max_tokens") => FinishReason::Length,
        Some("tool_use") => FinishReason::ToolCalls,
        // end_turn, stop_sequence, and anything the backend invents later
        _ => FinishReason::Stop,
    }
}

// -- Inbound: internal request -> invoke body --

/// Build the Anthropic-native invoke body for a normalized request
///
/// `default_max_tokens` fills the protocol-mandatory `max_tokens` field when
/// the client did not set one.
pub fn to_invoke_request(req: &CompletionRequest, default_max_tokens: u32) -> AnthropicInvokeRequest {
    let mut system: Option<String> = None;
    let mut messages = Vec::new();

    for msg in &req.messages {
        match msg.role {
            // Hoisted out of the message list; a later system message
            // overwrites an earlier one.
            Role::System => system = Some(msg.content.as_text()),
            Role::Tool => messages.push(AnthropicMessage {
                role: "user".to_owned(),
                content: AnthropicContent::Blocks(vec![AnthropicContentBlock::ToolResult {
                    tool_use_id: msg.tool_call_id.clone().unwrap_or_default(),
                    content: Some(msg.content.as_text()),
                }]),
            }),
            Role::Assistant if msg.tool_calls.is_some() => {
                let mut blocks = Vec::new();
                let text = msg.content.as_text();
                if !text.is_empty() {
                    blocks.push(AnthropicContentBlock::Text { text });
                }
                for call in msg.tool_calls.iter().flatten() {
                    blocks.push(AnthropicContentBlock::ToolUse {
                        id: call.id.clone(),
                        name: call.function.name.clone(),
                        input: decode_tool_arguments(&call.function.arguments),
                    });
                }
                messages.push(AnthropicMessage {
                    role: "assistant".to_owned(),
                    content: AnthropicContent::Blocks(blocks),
                });
            }
            Role::User | Role::Assistant => messages.push(AnthropicMessage {
                role: if msg.role == Role::Assistant { "assistant" } else { "user" }.to_owned(),
                content: plain_content(&msg.content),
            }),
        }
    }

    let tools = req.tools.as_ref().map(|tools| {
        tools
            .iter()
            .map(|tool| AnthropicTool {
                name: tool.function.name.clone(),
                description: tool.function.description.clone(),
                input_schema: tool
                    .function
                    .parameters
                    .clone()
                    .unwrap_or_else(|| serde_json::json!({"type": "object"})),
            })
            .collect()
    });

    AnthropicInvokeRequest {
        anthropic_version: ANTHROPIC_VERSION.to_owned(),
        max_tokens: req.params.max_tokens.unwrap_or(default_max_tokens),
        system: system.filter(|s| !s.is_empty()),
        messages,
        temperature: req.params.temperature,
        top_p: req.params.top_p,
        stop_sequences: req.params.stop.clone(),
        tools,
    }
}

fn plain_content(content: &Content) -> AnthropicContent {
    match content {
        Content::Text(text) => AnthropicContent::Text(text.clone()),
        Content::Parts(parts) => AnthropicContent::Blocks(
            parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => AnthropicContentBlock::Text { text: text.clone() },
                    ContentPart::Image { url } => AnthropicContentBlock::Image {
                        source: image_source(url),
                    },
                })
                .collect(),
        ),
    }
}

/// Split a `data:<media>;base64,<payload>` URI into a base64 source; other
/// URLs pass through as URL sources
fn image_source(url: &str) -> AnthropicImageSource {
    if let Some(rest) = url.strip_prefix("data:") {
        if let Some((media_type, data)) = rest.split_once(";base64,") {
            return AnthropicImageSource {
                source_type: "base64".to_owned(),
                media_type: Some(media_type.to_owned()),
                data: data.to_owned(),
            };
        }
    }

    AnthropicImageSource {
        source_type: "url".to_owned(),
        media_type: None,
        data: url.to_owned(),
    }
}

// -- Outbound: invoke response -> internal response --

/// Translate a complete invoke response into a normalized completion
///
/// `model` is the client-requested name, echoed back so callers match on the
/// identifier they sent rather than the Bedrock one.
pub fn to_completion_response(resp: AnthropicInvokeResponse, model: &str) -> CompletionResponse {
    let mut text: Option<String> = None;
    let mut tool_calls = Vec::new();

    for block in resp.content {
        match block {
            // When a response carries several text blocks the last one wins,
            // matching the established relay behavior for this protocol.
            AnthropicResponseBlock::Text { text: t } => text = Some(t),
            AnthropicResponseBlock::ToolUse { id, name, input } => tool_calls.push(ToolCall {
                id,
                function: FunctionCall {
                    name,
                    arguments: encode_tool_arguments(&input),
                },
            }),
        }
    }

    let usage = resp.usage.unwrap_or_default();

    CompletionResponse {
        id: fresh_response_id(),
        object: "chat.completion".to_owned(),
        created: unix_timestamp(),
        model: model.to_owned(),
        choices: vec![Choice {
            index: 0,
            message: ChoiceMessage {
                role: "assistant".to_owned(),
                content: text,
                tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
            },
            finish_reason: Some(map_stop_reason(resp.stop_reason.as_deref())),
        }],
        usage: Some(Usage::new(usage.input_tokens, usage.output_tokens)),
    }
}

pub(crate) fn fresh_response_id() -> String {
    format!("chatcmpl-{}", Uuid::new_v4())
}

pub(crate) fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

// -- Stream conversion --

/// Per-stream translator from backend stream events to internal chunks
///
/// Lives for exactly one response stream. Tracks open content blocks by
/// backend index, assigns the client-facing sequential tool-call indices,
/// and tallies token usage until the final event finalizes it.
#[derive(Debug, Default)]
pub struct AnthropicStreamState {
    /// Open content blocks, keyed by backend block index
    blocks: HashMap<u32, OpenBlock>,
    /// Counter assigning each `tool_use` block its client-facing index
    ///
    /// The backend block index is shared across all block types, so a tool
    /// use following a text block arrives with index 1+; consumers that key
    /// `tool_calls` entries by that value would see phantom entries.
    next_tool_call_index: u32,
    /// Whether a finish-reason chunk has been emitted
    terminal_sent: bool,
    /// Whether the stream has completed; later events are ignored
    done: bool,
    /// Whether any usage figures were observed
    saw_usage: bool,
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug)]
enum OpenBlock {
    Text,
    ToolUse {
        name: String,
        tool_call_index: u32,
        /// Concatenation of the argument fragments seen so far; fragments
        /// are forwarded unmodified, this buffer exists for diagnostics at
        /// block close
        buffer: String,
    },
}

impl AnthropicStreamState {
    /// Create a new stream state tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert one backend stream event to internal stream events
    pub fn convert_event(&mut self, event: &AnthropicStreamEvent) -> Vec<StreamEvent> {
        if self.done {
            return Vec::new();
        }

        match event {
            AnthropicStreamEvent::MessageStart { message } => {
                if let Some(usage) = message.usage {
                    self.absorb_usage(usage.input_tokens, usage.output_tokens);
                }
                vec![StreamEvent::Delta(StreamDelta {
                    role: Some("assistant".to_owned()),
                    content: Some(String::new()),
                    ..Default::default()
                })]
            }

            AnthropicStreamEvent::ContentBlockStart { index, content_block } => match content_block {
                AnthropicStreamContentBlock::Text { .. } => {
                    self.blocks.insert(*index, OpenBlock::Text);
                    Vec::new()
                }
                AnthropicStreamContentBlock::ToolUse { id, name, .. } => {
                    let tool_call_index = self.next_tool_call_index;
                    self.next_tool_call_index += 1;
                    self.blocks.insert(
                        *index,
                        OpenBlock::ToolUse {
                            name: name.clone(),
                            tool_call_index,
                            buffer: String::new(),
                        },
                    );
                    vec![StreamEvent::Delta(StreamDelta {
                        tool_call: Some(StreamToolCall {
                            index: tool_call_index,
                            id: Some(id.clone()),
                            function: Some(StreamFunctionCall {
                                name: Some(name.clone()),
                                arguments: Some(String::new()),
                            }),
                        }),
                        ..Default::default()
                    })]
                }
            },

            AnthropicStreamEvent::ContentBlockDelta { index, delta } => match delta {
                AnthropicStreamDelta::TextDelta { text } => {
                    vec![StreamEvent::Delta(StreamDelta {
                        content: Some(text.clone()),
                        ..Default::default()
                    })]
                }
                AnthropicStreamDelta::InputJsonDelta { partial_json } => {
                    let Some(OpenBlock::ToolUse {
                        tool_call_index, buffer, ..
                    }) = self.blocks.get_mut(index)
                    else {
                        tracing::warn!(index, "input_json_delta for unknown tool block, skipping");
                        return Vec::new();
                    };
                    buffer.push_str(partial_json);
                    vec![StreamEvent::Delta(StreamDelta {
                        tool_call: Some(StreamToolCall {
                            index: *tool_call_index,
                            id: None,
                            function: Some(StreamFunctionCall {
                                name: None,
                                arguments: Some(partial_json.clone()),
                            }),
                        }),
                        ..Default::default()
                    })]
                }
            },

            AnthropicStreamEvent::ContentBlockStop { index } => {
                if let Some(OpenBlock::ToolUse { name, buffer, .. }) = self.blocks.remove(index) {
                    tracing::debug!(tool = %name, arguments_len = buffer.len(), "tool use block closed");
                }
                Vec::new()
            }

            AnthropicStreamEvent::MessageDelta { delta, usage } => {
                if let Some(usage) = usage {
                    self.absorb_usage(usage.input_tokens, usage.output_tokens);
                }

                let Some(stop_reason) = delta.stop_reason.as_deref() else {
                    return Vec::new();
                };
                self.terminal_sent = true;
                vec![StreamEvent::Delta(StreamDelta {
                    finish_reason: Some(map_stop_reason(Some(stop_reason))),
                    ..Default::default()
                })]
            }

            AnthropicStreamEvent::MessageStop { invocation_metrics } => {
                if let Some(metrics) = invocation_metrics {
                    self.saw_usage = true;
                    self.prompt_tokens = metrics.input_token_count;
                    self.completion_tokens = metrics.output_token_count;
                }
                self.finish()
            }

            AnthropicStreamEvent::Ping | AnthropicStreamEvent::Unknown => Vec::new(),
        }
    }

    /// Close out the stream, emitting whatever terminal events are still owed
    ///
    /// Called for `message_stop` and when the event source ends without one;
    /// the `Done` sentinel must go out either way. Idempotent: a finished
    /// stream emits nothing further.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        if self.done {
            return Vec::new();
        }
        self.done = true;

        let mut events = Vec::new();
        if !self.terminal_sent {
            self.terminal_sent = true;
            events.push(StreamEvent::Delta(StreamDelta {
                finish_reason: Some(FinishReason::Stop),
                ..Default::default()
            }));
        }
        if self.saw_usage {
            events.push(StreamEvent::Usage(Usage::new(self.prompt_tokens, self.completion_tokens)));
        }
        events.push(StreamEvent::Done);
        events
    }

    fn absorb_usage(&mut self, input_tokens: u32, output_tokens: u32) {
        self.saw_usage = true;
        // Tally only ever grows; later events may carry partial figures
        self.prompt_tokens = self.prompt_tokens.max(input_tokens);
        self.completion_tokens = self.completion_tokens.max(output_tokens);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::anthropic::{AnthropicMessageDelta, AnthropicStreamMessage, AnthropicUsage};
    use crate::types::{CompletionParams, FunctionDefinition, ToolDefinition};

    fn user_request(messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest {
            model: "claude-sonnet-4-20250514".to_owned(),
            messages,
            params: CompletionParams::default(),
            tools: None,
            stream: false,
        }
    }

    // -- Request translation --

    #[test]
    fn bare_request_omits_system_and_tools() {
        let req = user_request(vec![Message::text(Role::User, "2+2?")]);
        let body = serde_json::to_value(to_invoke_request(&req, 4096)).unwrap();

        assert!(body.get("system").is_none());
        assert!(body.get("tools").is_none());
        assert_eq!(body["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn system_message_is_hoisted_and_last_wins() {
        let req = user_request(vec![
            Message::text(Role::System, "Be verbose"),
            Message::text(Role::User, "2+2?"),
            Message::text(Role::System, "Be terse"),
        ]);
        let invoke = to_invoke_request(&req, 4096);

        assert_eq!(invoke.system.as_deref(), Some("Be terse"));
        assert_eq!(invoke.messages.len(), 1);
        assert_eq!(invoke.messages[0].role, "user");
    }

    #[test]
    fn explicit_max_tokens_beats_default() {
        let mut req = user_request(vec![Message::text(Role::User, "hi")]);
        req.params.max_tokens = Some(128);

        assert_eq!(to_invoke_request(&req, 4096).max_tokens, 128);
    }

    #[test]
    fn tool_message_becomes_user_tool_result() {
        let mut tool_msg = Message::text(Role::Tool, "72 degrees");
        tool_msg.tool_call_id = Some("toolu_1".to_owned());
        let req = user_request(vec![Message::text(Role::User, "weather?"), tool_msg]);

        let invoke = to_invoke_request(&req, 4096);
        assert_eq!(invoke.messages[1].role, "user");
        let AnthropicContent::Blocks(blocks) = &invoke.messages[1].content else {
            panic!("expected blocks");
        };
        assert!(matches!(
            &blocks[0],
            AnthropicContentBlock::ToolResult { tool_use_id, content }
                if tool_use_id == "toolu_1" && content.as_deref() == Some("72 degrees")
        ));
    }

    #[test]
    fn assistant_tool_calls_become_text_and_tool_use_blocks() {
        let mut assistant = Message::text(Role::Assistant, "Checking two cities.");
        assistant.tool_calls = Some(vec![
            ToolCall {
                id: "toolu_1".to_owned(),
                function: FunctionCall {
                    name: "get_weather".to_owned(),
                    arguments: "{\"city\":\"Oslo\"}".to_owned(),
                },
            },
            ToolCall {
                id: "toolu_2".to_owned(),
                function: FunctionCall {
                    name: "get_weather".to_owned(),
                    arguments: "not json".to_owned(),
                },
            },
        ]);
        let req = user_request(vec![Message::text(Role::User, "weather?"), assistant]);

        let invoke = to_invoke_request(&req, 4096);
        let AnthropicContent::Blocks(blocks) = &invoke.messages[1].content else {
            panic!("expected blocks");
        };
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], AnthropicContentBlock::Text { text } if text == "Checking two cities."));
        assert!(matches!(
            &blocks[1],
            AnthropicContentBlock::ToolUse { input, .. } if input["city"] == "Oslo"
        ));
        // Undecodable arguments pass through as a raw JSON string
        assert!(matches!(
            &blocks[2],
            AnthropicContentBlock::ToolUse { input, .. } if input == &serde_json::json!("not json")
        ));
    }

    #[test]
    fn tool_definitions_translate_to_input_schema() {
        let mut req = user_request(vec![Message::text(Role::User, "hi")]);
        req.tools = Some(vec![ToolDefinition {
            tool_type: "function".to_owned(),
            function: FunctionDefinition {
                name: "get_weather".to_owned(),
                description: Some("Current weather".to_owned()),
                parameters: Some(serde_json::json!({"type": "object", "properties": {"city": {"type": "string"}}})),
            },
        }]);

        let invoke = to_invoke_request(&req, 4096);
        let tool = &invoke.tools.unwrap()[0];
        assert_eq!(tool.name, "get_weather");
        assert_eq!(tool.input_schema["properties"]["city"]["type"], "string");
    }

    #[test]
    fn data_uri_images_become_base64_sources() {
        let req = user_request(vec![Message {
            role: Role::User,
            content: Content::Parts(vec![
                ContentPart::Text { text: "what is this?".to_owned() },
                ContentPart::Image {
                    url: "data:image/png;base64,iVBORw0=".to_owned(),
                },
            ]),
            tool_calls: None,
            tool_call_id: None,
        }]);

        let invoke = to_invoke_request(&req, 4096);
        let AnthropicContent::Blocks(blocks) = &invoke.messages[0].content else {
            panic!("expected blocks");
        };
        let AnthropicContentBlock::Image { source } = &blocks[1] else {
            panic!("expected image");
        };
        assert_eq!(source.source_type, "base64");
        assert_eq!(source.media_type.as_deref(), Some("image/png"));
        assert_eq!(source.data, "iVBORw0=");
    }

    // -- Response translation --

    fn invoke_response(content: Vec<AnthropicResponseBlock>, stop_reason: Option<&str>) -> AnthropicInvokeResponse {
        AnthropicInvokeResponse {
            id: "msg_01".to_owned(),
            response_type: "message".to_owned(),
            role: "assistant".to_owned(),
            content,
            model: "claude-sonnet-4-20250514".to_owned(),
            stop_reason: stop_reason.map(str::to_owned),
            stop_sequence: None,
            usage: Some(AnthropicUsage {
                input_tokens: 5,
                output_tokens: 1,
            }),
        }
    }

    #[test]
    fn text_response_translates_with_usage() {
        let resp = invoke_response(vec![AnthropicResponseBlock::Text { text: "4".to_owned() }], Some("end_turn"));
        let completion = to_completion_response(resp, "claude-sonnet-4-20250514");

        assert!(completion.id.starts_with("chatcmpl-"));
        assert_eq!(completion.object, "chat.completion");
        assert_eq!(completion.model, "claude-sonnet-4-20250514");
        let choice = &completion.choices[0];
        assert_eq!(choice.message.content.as_deref(), Some("4"));
        assert_eq!(choice.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage, Some(Usage::new(5, 1)));
        assert_eq!(completion.usage.unwrap().total_tokens, 6);
    }

    #[test]
    fn multiple_text_blocks_keep_the_last() {
        // Documented simplification: earlier text blocks are dropped, not
        // concatenated.
        let resp = invoke_response(
            vec![
                AnthropicResponseBlock::Text { text: "first".to_owned() },
                AnthropicResponseBlock::Text { text: "second".to_owned() },
            ],
            Some("end_turn"),
        );

        let completion = to_completion_response(resp, "m");
        assert_eq!(completion.choices[0].message.content.as_deref(), Some("second"));
    }

    #[test]
    fn tool_use_blocks_become_tool_calls() {
        let resp = invoke_response(
            vec![AnthropicResponseBlock::ToolUse {
                id: "toolu_1".to_owned(),
                name: "get_weather".to_owned(),
                input: serde_json::json!({"city": "Oslo"}),
            }],
            Some("tool_use"),
        );

        let completion = to_completion_response(resp, "m");
        let choice = &completion.choices[0];
        assert_eq!(choice.finish_reason, Some(FinishReason::ToolCalls));
        assert!(choice.message.content.is_none());
        let call = &choice.message.tool_calls.as_ref().unwrap()[0];
        assert_eq!(call.id, "toolu_1");
        let decoded: serde_json::Value = serde_json::from_str(&call.function.arguments).unwrap();
        assert_eq!(decoded["city"], "Oslo");
    }

    #[test]
    fn tool_calls_round_trip_through_both_translations() {
        let mut assistant = Message::text(Role::Assistant, "");
        assistant.tool_calls = Some(vec![ToolCall {
            id: "toolu_1".to_owned(),
            function: FunctionCall {
                name: "lookup".to_owned(),
                arguments: "{\"q\": \"rust\"}".to_owned(),
            },
        }]);
        let req = user_request(vec![assistant]);
        let invoke = to_invoke_request(&req, 4096);

        let AnthropicContent::Blocks(blocks) = &invoke.messages[0].content else {
            panic!("expected blocks");
        };
        let AnthropicContentBlock::ToolUse { id, name, input } = &blocks[0] else {
            panic!("expected tool use");
        };

        let resp = invoke_response(
            vec![AnthropicResponseBlock::ToolUse {
                id: id.clone(),
                name: name.clone(),
                input: input.clone(),
            }],
            Some("tool_use"),
        );
        let completion = to_completion_response(resp, "m");
        let call = &completion.choices[0].message.tool_calls.as_ref().unwrap()[0];

        assert_eq!(call.function.name, "lookup");
        let decoded: serde_json::Value = serde_json::from_str(&call.function.arguments).unwrap();
        assert_eq!(decoded, serde_json::json!({"q": "rust"}));
    }

    #[test]
    fn missing_stop_reason_and_usage_default() {
        let mut resp = invoke_response(vec![], None);
        resp.usage = None;

        let completion = to_completion_response(resp, "m");
        assert_eq!(completion.choices[0].finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage, Some(Usage::default()));
    }

    #[test]
    fn stop_reason_mapping_is_total() {
        assert_eq!(map_stop_reason(Some("end_turn")), FinishReason::Stop);
        assert_eq!(map_stop_reason(Some("stop_sequence")), FinishReason::Stop);
        assert_eq!(map_stop_reason(Some("max_tokens")), FinishReason::Length);
        assert_eq!(map_stop_reason(Some("tool_use")), FinishReason::ToolCalls);
        assert_eq!(map_stop_reason(Some("model_context_window_exceeded")), FinishReason::Stop);
        assert_eq!(map_stop_reason(None), FinishReason::Stop);
    }

    // -- Stream conversion --

    fn message_start(usage: Option<AnthropicUsage>) -> AnthropicStreamEvent {
        AnthropicStreamEvent::MessageStart {
            message: AnthropicStreamMessage {
                id: "msg_01".to_owned(),
                message_type: "message".to_owned(),
                role: "assistant".to_owned(),
                model: "claude-sonnet-4-20250514".to_owned(),
                usage,
            },
        }
    }

    fn text_block_start(index: u32) -> AnthropicStreamEvent {
        AnthropicStreamEvent::ContentBlockStart {
            index,
            content_block: AnthropicStreamContentBlock::Text { text: String::new() },
        }
    }

    fn tool_block_start(index: u32, id: &str, name: &str) -> AnthropicStreamEvent {
        AnthropicStreamEvent::ContentBlockStart {
            index,
            content_block: AnthropicStreamContentBlock::ToolUse {
                id: id.to_owned(),
                name: name.to_owned(),
                input: serde_json::json!({}),
            },
        }
    }

    fn text_delta(index: u32, text: &str) -> AnthropicStreamEvent {
        AnthropicStreamEvent::ContentBlockDelta {
            index,
            delta: AnthropicStreamDelta::TextDelta { text: text.to_owned() },
        }
    }

    fn json_delta(index: u32, fragment: &str) -> AnthropicStreamEvent {
        AnthropicStreamEvent::ContentBlockDelta {
            index,
            delta: AnthropicStreamDelta::InputJsonDelta {
                partial_json: fragment.to_owned(),
            },
        }
    }

    fn message_delta(stop_reason: Option<&str>, usage: Option<AnthropicUsage>) -> AnthropicStreamEvent {
        AnthropicStreamEvent::MessageDelta {
            delta: AnthropicMessageDelta {
                stop_reason: stop_reason.map(str::to_owned),
                stop_sequence: None,
            },
            usage,
        }
    }

    #[test]
    fn minimal_text_stream_emits_four_events() {
        let mut state = AnthropicStreamState::new();
        let mut events = Vec::new();
        for event in [
            message_start(None),
            text_block_start(0),
            text_delta(0, "Hi"),
            AnthropicStreamEvent::ContentBlockStop { index: 0 },
            message_delta(Some("end_turn"), None),
            AnthropicStreamEvent::MessageStop { invocation_metrics: None },
        ] {
            events.extend(state.convert_event(&event));
        }

        assert_eq!(events.len(), 4);
        assert!(matches!(&events[0], StreamEvent::Delta(d) if d.role.as_deref() == Some("assistant")));
        assert!(matches!(&events[1], StreamEvent::Delta(d) if d.content.as_deref() == Some("Hi")));
        assert!(
            matches!(&events[2], StreamEvent::Delta(d) if d.finish_reason == Some(FinishReason::Stop) && d.content.is_none())
        );
        assert!(matches!(&events[3], StreamEvent::Done));
    }

    #[test]
    fn terminal_chunk_is_emitted_at_most_once() {
        let mut state = AnthropicStreamState::new();
        let from_delta = state.convert_event(&message_delta(Some("end_turn"), None));
        let from_stop = state.convert_event(&AnthropicStreamEvent::MessageStop { invocation_metrics: None });

        let finish_chunks = from_delta
            .iter()
            .chain(&from_stop)
            .filter(|e| matches!(e, StreamEvent::Delta(d) if d.finish_reason.is_some()))
            .count();
        assert_eq!(finish_chunks, 1);
    }

    #[test]
    fn message_stop_without_prior_terminal_emits_stop() {
        let mut state = AnthropicStreamState::new();
        let events = state.convert_event(&AnthropicStreamEvent::MessageStop { invocation_metrics: None });

        assert!(
            matches!(&events[0], StreamEvent::Delta(d) if d.finish_reason == Some(FinishReason::Stop))
        );
        assert!(matches!(events.last(), Some(StreamEvent::Done)));
    }

    #[test]
    fn tool_call_indices_are_sequential_not_block_indices() {
        let mut state = AnthropicStreamState::new();
        state.convert_event(&text_block_start(0));
        let first = state.convert_event(&tool_block_start(1, "toolu_1", "get_weather"));
        let second = state.convert_event(&tool_block_start(2, "toolu_2", "get_time"));

        let StreamEvent::Delta(d) = &first[0] else { panic!("expected delta") };
        assert_eq!(d.tool_call.as_ref().unwrap().index, 0);
        let StreamEvent::Delta(d) = &second[0] else { panic!("expected delta") };
        assert_eq!(d.tool_call.as_ref().unwrap().index, 1);
    }

    #[test]
    fn argument_fragments_pass_through_and_accumulate() {
        let mut state = AnthropicStreamState::new();
        state.convert_event(&tool_block_start(0, "toolu_1", "get_weather"));
        let first = state.convert_event(&json_delta(0, "{\"a\":"));
        let second = state.convert_event(&json_delta(0, "1}"));

        let fragment = |events: &[StreamEvent]| {
            let StreamEvent::Delta(d) = &events[0] else { panic!("expected delta") };
            d.tool_call.as_ref().unwrap().function.as_ref().unwrap().arguments.clone().unwrap()
        };
        assert_eq!(fragment(&first), "{\"a\":");
        assert_eq!(fragment(&second), "1}");

        let Some(OpenBlock::ToolUse { buffer, .. }) = state.blocks.get(&0) else {
            panic!("expected open tool block");
        };
        let assembled: serde_json::Value = serde_json::from_str(buffer).unwrap();
        assert_eq!(assembled, serde_json::json!({"a": 1}));
    }

    #[test]
    fn fragment_for_unknown_block_is_skipped() {
        let mut state = AnthropicStreamState::new();
        assert!(state.convert_event(&json_delta(7, "{}")).is_empty());
    }

    #[test]
    fn invocation_metrics_finalize_usage() {
        let mut state = AnthropicStreamState::new();
        state.convert_event(&message_start(Some(AnthropicUsage {
            input_tokens: 5,
            output_tokens: 0,
        })));
        state.convert_event(&message_delta(
            Some("end_turn"),
            Some(AnthropicUsage {
                input_tokens: 0,
                output_tokens: 3,
            }),
        ));
        let events = state.convert_event(&AnthropicStreamEvent::MessageStop {
            invocation_metrics: Some(crate::protocol::anthropic::BedrockInvocationMetrics {
                input_token_count: 12,
                output_token_count: 34,
                invocation_latency: 900,
                first_byte_latency: 100,
            }),
        });

        let usage = events
            .iter()
            .find_map(|e| match e {
                StreamEvent::Usage(u) => Some(*u),
                _ => None,
            })
            .unwrap();
        assert_eq!(usage, Usage::new(12, 34));
    }

    #[test]
    fn usage_chunk_omitted_when_backend_never_reported_any() {
        let mut state = AnthropicStreamState::new();
        state.convert_event(&message_delta(Some("end_turn"), None));
        let events = state.convert_event(&AnthropicStreamEvent::MessageStop { invocation_metrics: None });

        assert!(!events.iter().any(|e| matches!(e, StreamEvent::Usage(_))));
    }

    #[test]
    fn exhausted_stream_without_message_stop_still_terminates() {
        let mut state = AnthropicStreamState::new();
        state.convert_event(&message_start(None));
        state.convert_event(&text_block_start(0));
        state.convert_event(&text_delta(0, "Hi"));

        let events = state.finish();
        assert!(
            matches!(&events[0], StreamEvent::Delta(d) if d.finish_reason == Some(FinishReason::Stop))
        );
        assert!(matches!(events.last(), Some(StreamEvent::Done)));
    }

    #[test]
    fn finish_after_message_stop_emits_nothing() {
        let mut state = AnthropicStreamState::new();
        state.convert_event(&message_delta(Some("end_turn"), None));
        state.convert_event(&AnthropicStreamEvent::MessageStop { invocation_metrics: None });

        assert!(state.finish().is_empty());
    }

    #[test]
    fn events_after_stop_are_ignored() {
        let mut state = AnthropicStreamState::new();
        state.convert_event(&AnthropicStreamEvent::MessageStop { invocation_metrics: None });
        assert!(state.convert_event(&text_delta(0, "late")).is_empty());
    }

    #[test]
    fn unrecognized_events_emit_nothing() {
        let mut state = AnthropicStreamState::new();
        assert!(state.convert_event(&AnthropicStreamEvent::Ping).is_empty());
        assert!(state.convert_event(&AnthropicStreamEvent::Unknown).is_empty());
    }
}
