//! OpenAI Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Uses an OpenAI-compatible Chat Completions API. Requires `OPENAI_API_KEY`
//! (or explicit config). Optional tools can be set for function/tool calling;
//! when present, the API may return `tool_calls` in the response.
//!
//! # Streaming
//!
//! Implements `invoke_stream()` for token-by-token streaming. Uses the
//! streaming API (`create_stream`) and sends `MessageChunk` through the
//! provided channel as tokens arrive. Tool calls are accumulated from stream
//! chunks by index.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::{debug, trace};

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse, LlmUsage, MessageChunk};
use crate::message::Message;
use crate::state::ToolCall;
use crate::tool_source::ToolSpec;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCalls, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage, ChatCompletionTool,
        ChatCompletionTools, CreateChatCompletionRequestArgs, FunctionObject,
    },
    Client,
};

/// OpenAI Chat Completions client implementing `LlmClient`.
///
/// Uses `OPENAI_API_KEY` from the environment by default; or provide config
/// via `ChatOpenAI::with_config`. Optionally set tools (from a tool source's
/// catalog) to enable tool_calls in the response.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    tools: Option<Vec<ToolSpec>>,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            tools: None,
            temperature: None,
        }
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            tools: None,
            temperature: None,
        }
    }

    /// Set tools for this completion (enables tool_calls in response).
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Chat completions URL used for logging (base from OPENAI_BASE_URL or
    /// OPENAI_API_BASE env, else default). Does not append /v1 when base
    /// already ends with /v1.
    fn chat_completions_url() -> String {
        let base = std::env::var("OPENAI_BASE_URL")
            .or_else(|_| std::env::var("OPENAI_API_BASE"))
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let base = base.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }

    /// Convert our `Message` list to OpenAI request messages.
    ///
    /// Tool records are rendered as user-role observations ("Tool {name}
    /// returned/failed: …") so the exchange stays valid for providers that
    /// reject tool-role messages without a preceding tool_calls turn.
    fn messages_to_request(messages: &[Message]) -> Vec<ChatCompletionRequestMessage> {
        messages
            .iter()
            .map(|m| match m {
                Message::System(s) => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(s.as_str()),
                ),
                Message::User(s) => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(s.as_str()),
                ),
                Message::Assistant { content, name } => {
                    let text = match name {
                        Some(n) => format!("[{n}] {content}"),
                        None => content.clone(),
                    };
                    ChatCompletionRequestMessage::Assistant((text.as_str()).into())
                }
                Message::Tool(rec) => {
                    let text = if rec.is_error {
                        format!("Tool {} failed: {}", rec.name, rec.content)
                    } else {
                        format!("Tool {} returned: {}", rec.name, rec.content)
                    };
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(
                        text.as_str(),
                    ))
                }
            })
            .collect()
    }

    fn build_request(
        &self,
        messages: &[Message],
        stream: bool,
    ) -> Result<async_openai::types::chat::CreateChatCompletionRequest, AgentError> {
        let openai_messages = Self::messages_to_request(messages);
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(openai_messages);
        if stream {
            args.stream(true);
        }

        if let Some(ref tools) = self.tools {
            let chat_tools: Vec<ChatCompletionTools> = tools
                .iter()
                .map(|t| {
                    ChatCompletionTools::Function(ChatCompletionTool {
                        function: FunctionObject {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: Some(t.input_schema.clone()),
                            ..Default::default()
                        },
                    })
                })
                .collect();
            args.tools(chat_tools);
        }

        if let Some(t) = self.temperature {
            args.temperature(t);
        }

        args.build()
            .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI request build failed: {}", e)))
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let request = self.build_request(messages, false)?;

        let tools_count = self.tools.as_ref().map(|t| t.len()).unwrap_or(0);
        let url = Self::chat_completions_url();
        debug!(
            url = %url,
            model = %self.model,
            message_count = messages.len(),
            tools_count = tools_count,
            temperature = ?self.temperature,
            "OpenAI chat create"
        );
        if let Ok(js) = serde_json::to_string_pretty(&request) {
            trace!(url = %url, request = %js, "OpenAI request body");
        }

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::ExecutionFailed("OpenAI returned no choices".to_string()))?;

        let msg = choice.message;
        let content = msg.content.unwrap_or_default();
        let tool_calls: Vec<ToolCall> = msg
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tc| {
                if let ChatCompletionMessageToolCalls::Function(f) = tc {
                    Some(ToolCall {
                        name: f.function.name,
                        arguments: f.function.arguments,
                        id: Some(f.id),
                    })
                } else {
                    None
                }
            })
            .collect();

        let usage = response.usage.map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        Ok(LlmResponse {
            content,
            tool_calls,
            usage,
        })
    }

    /// Streaming variant: sends message chunks as they arrive.
    ///
    /// Each content delta is sent through `chunk_tx` as a `MessageChunk`.
    /// Tool calls are accumulated from stream chunks by index and returned in
    /// the final `LlmResponse`.
    async fn invoke_stream(
        &self,
        messages: &[Message],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
    ) -> Result<LlmResponse, AgentError> {
        let Some(chunk_tx) = chunk_tx else {
            return self.invoke(messages).await;
        };

        let request = self.build_request(messages, true)?;

        let url = Self::chat_completions_url();
        debug!(
            url = %url,
            model = %self.model,
            message_count = messages.len(),
            stream = true,
            "OpenAI chat create_stream"
        );

        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI stream error: {}", e)))?;

        let mut full_content = String::new();
        // Track if we sent any content chunk (avoid duplicating at end for
        // APIs that deliver content only in the final payload).
        let mut sent_any_content = false;
        // Tool calls accumulator: index -> (id, name, arguments)
        let mut tool_call_map: std::collections::HashMap<u32, (String, String, String)> =
            std::collections::HashMap::new();
        let mut stream_usage: Option<LlmUsage> = None;

        while let Some(result) = stream.next().await {
            let response = result
                .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI stream error: {}", e)))?;

            if let Some(ref u) = response.usage {
                stream_usage = Some(LlmUsage {
                    prompt_tokens: u.prompt_tokens,
                    completion_tokens: u.completion_tokens,
                    total_tokens: u.total_tokens,
                });
            }

            for choice in response.choices {
                let delta = &choice.delta;

                if let Some(ref content) = delta.content {
                    if !content.is_empty() {
                        full_content.push_str(content);
                        sent_any_content = true;
                        // Ignore send errors: receiver may have hung up.
                        let _ = chunk_tx
                            .send(MessageChunk {
                                content: content.clone(),
                            })
                            .await;
                    }
                }

                if let Some(ref tool_calls) = delta.tool_calls {
                    for tc in tool_calls {
                        let entry = tool_call_map.entry(tc.index).or_insert_with(|| {
                            (
                                tc.id.clone().unwrap_or_default(),
                                String::new(),
                                String::new(),
                            )
                        });

                        if let Some(ref id) = tc.id {
                            if !id.is_empty() {
                                entry.0 = id.clone();
                            }
                        }

                        if let Some(ref func) = tc.function {
                            if let Some(ref name) = func.name {
                                entry.1.push_str(name);
                            }
                            if let Some(ref args) = func.arguments {
                                entry.2.push_str(args);
                            }
                        }
                    }
                }
            }
        }

        // Some APIs send content only in the final payload, not in deltas.
        if !sent_any_content && !full_content.is_empty() {
            let _ = chunk_tx
                .send(MessageChunk {
                    content: full_content.clone(),
                })
                .await;
        }

        let mut tool_calls: Vec<ToolCall> = tool_call_map
            .into_iter()
            .map(|(_, (id, name, arguments))| ToolCall {
                name,
                arguments,
                id: if id.is_empty() { None } else { Some(id) },
            })
            .collect();

        // Sort by name for deterministic order
        tool_calls.sort_by(|a, b| a.name.cmp(&b.name));

        trace!(
            url = %url,
            content = %full_content,
            tool_calls = ?tool_calls,
            usage = ?stream_usage,
            "OpenAI stream response"
        );

        Ok(LlmResponse {
            content: full_content,
            tool_calls,
            usage: stream_usage,
        })
    }
}
