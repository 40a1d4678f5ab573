//! Scripted mock LLM for deterministic tests.
//!
//! `MockLlm` plays back a fixed sequence of responses; once the script is
//! exhausted it repeats the last entry. This lets a test drive the supervisor
//! through several routing turns and a specialist through tool rounds without
//! any network access.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse, MessageChunk};
use crate::message::Message;
use crate::state::ToolCall;

/// Deterministic, scripted `LlmClient` double.
pub struct MockLlm {
    script: Vec<(String, Vec<ToolCall>)>,
    cursor: AtomicUsize,
    stream_by_char: bool,
}

impl MockLlm {
    /// A single fixed reply with no tool calls.
    pub fn with_reply(content: impl Into<String>) -> Self {
        Self::scripted(vec![(content.into(), vec![])])
    }

    /// A sequence of turns: each entry is (content, tool_calls). The last
    /// entry repeats once the script runs out.
    pub fn scripted(turns: Vec<(String, Vec<ToolCall>)>) -> Self {
        assert!(!turns.is_empty(), "script must have at least one turn");
        Self {
            script: turns,
            cursor: AtomicUsize::new(0),
            stream_by_char: false,
        }
    }

    /// Stream content one character per chunk instead of one chunk total.
    pub fn with_stream_by_char(mut self) -> Self {
        self.stream_by_char = true;
        self
    }

    fn next_turn(&self) -> LlmResponse {
        let idx = self
            .cursor
            .fetch_add(1, Ordering::SeqCst)
            .min(self.script.len() - 1);
        let (content, tool_calls) = &self.script[idx];
        LlmResponse {
            content: content.clone(),
            tool_calls: tool_calls.clone(),
            usage: None,
        }
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, _messages: &[Message]) -> Result<LlmResponse, AgentError> {
        Ok(self.next_turn())
    }

    async fn invoke_stream(
        &self,
        messages: &[Message],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
    ) -> Result<LlmResponse, AgentError> {
        let response = self.invoke(messages).await?;
        if let Some(tx) = chunk_tx {
            if self.stream_by_char {
                for ch in response.content.chars() {
                    if tx
                        .send(MessageChunk {
                            content: ch.to_string(),
                        })
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
            } else if !response.content.is_empty() {
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

    /// **Scenario**: scripted turns play back in order and the last one
    /// repeats after the script is exhausted.
    #[tokio::test]
    async fn scripted_turns_play_in_order_then_repeat() {
        let llm = MockLlm::scripted(vec![
            ("first".into(), vec![]),
            ("second".into(), vec![]),
        ]);
        let messages = [Message::user("q")];
        assert_eq!(llm.invoke(&messages).await.unwrap().content, "first");
        assert_eq!(llm.invoke(&messages).await.unwrap().content, "second");
        assert_eq!(llm.invoke(&messages).await.unwrap().content, "second");
    }

    /// **Scenario**: stream_by_char emits one chunk per character.
    #[tokio::test]
    async fn stream_by_char_emits_per_character_chunks() {
        let llm = MockLlm::with_reply("abc").with_stream_by_char();
        let (tx, mut rx) = mpsc::channel(8);
        let response = llm
            .invoke_stream(&[Message::user("q")], Some(tx))
            .await
            .unwrap();
        assert_eq!(response.content, "abc");
        let mut chunks = Vec::new();
        while let Some(c) = rx.recv().await {
            chunks.push(c.content);
        }
        assert_eq!(chunks, vec!["a", "b", "c"]);
    }

    /// **Scenario**: a scripted turn can carry tool calls.
    #[tokio::test]
    async fn scripted_turn_carries_tool_calls() {
        let llm = MockLlm::scripted(vec![(
            String::new(),
            vec![ToolCall {
                name: "search_tickets".into(),
                arguments: "{\"from\":\"Beijing\"}".into(),
                id: Some("call_1".into()),
            }],
        )]);
        let response = llm.invoke(&[Message::user("q")]).await.unwrap();
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "search_tickets");
    }
}
