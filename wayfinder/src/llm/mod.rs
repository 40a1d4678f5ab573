//! LLM client abstraction: `LlmClient` trait, response types and the
//! streaming chunk type.
//!
//! `ChatOpenAI` talks to an OpenAI-compatible Chat Completions API; `MockLlm`
//! is a scripted double for tests.

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::AgentError;
use crate::message::Message;
use crate::state::ToolCall;

/// One incremental piece of streamed assistant text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageChunk {
    pub content: String,
}

/// Token usage reported by the provider for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One completion: assistant text, requested tool calls, optional usage.
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<LlmUsage>,
}

/// Chat completion client.
///
/// `invoke` returns the full response at once. `invoke_stream` additionally
/// forwards content chunks through `chunk_tx` as they arrive; the default
/// implementation completes non-streaming and sends the whole content as one
/// chunk.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// One completion over the given messages.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;

    /// Streaming completion: content chunks are sent through `chunk_tx` as
    /// they arrive; the accumulated response is returned at the end.
    async fn invoke_stream(
        &self,
        messages: &[Message],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
    ) -> Result<LlmResponse, AgentError> {
        let response = self.invoke(messages).await?;
        if let Some(tx) = chunk_tx {
            if !response.content.is_empty() {
                let _ = tx
                    .send(MessageChunk {
                        content: response.content.clone(),
                    })
                    .await;
            }
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoLlm;

    #[async_trait]
    impl LlmClient for EchoLlm {
        async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
            let content = match messages.last() {
                Some(Message::User(q)) => format!("echo: {q}"),
                _ => String::new(),
            };
            Ok(LlmResponse {
                content,
                tool_calls: vec![],
                usage: None,
            })
        }
    }

    /// **Scenario**: the default invoke_stream sends the full content as a
    /// single chunk and returns the same response as invoke.
    #[tokio::test]
    async fn default_invoke_stream_sends_one_chunk() {
        let llm = EchoLlm;
        let (tx, mut rx) = mpsc::channel(4);
        let messages = [Message::user("hi")];
        let response = llm.invoke_stream(&messages, Some(tx)).await.unwrap();
        assert_eq!(response.content, "echo: hi");
        let chunk = rx.recv().await.expect("one chunk");
        assert_eq!(chunk.content, "echo: hi");
        assert!(rx.recv().await.is_none());
    }
}
