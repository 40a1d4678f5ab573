//! Specialist agent: reactive tool loop for one domain (navigation or
//! ticketing).
//!
//! One graph node per specialist. The run loop asks the LLM, executes any
//! requested tools, appends tagged tool records, and re-asks until the model
//! answers without tool calls. Tool failures are recorded with
//! `is_error: true` and the loop continues so the model can react; only the
//! per-turn budget or a provider failure aborts the turn.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::TravelState;
use crate::tool_source::{ToolSource, ToolSpec};

/// Default maximum number of tool rounds in one specialist turn.
pub const DEFAULT_TOOL_BUDGET: u32 = 8;

/// Truncates a string for logging, appending "..." if longer than max_len.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Parses ToolCall.arguments string to JSON Value. Logs a warning on parse
/// failure and falls back to an empty object.
fn parse_tool_arguments(arguments: &str) -> Value {
    let raw = if arguments.trim().is_empty() {
        serde_json::json!({})
    } else {
        match serde_json::from_str(arguments) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, arguments = %arguments, "tool arguments JSON parse failed, using empty object");
                serde_json::json!({})
            }
        }
    };
    if let Some(s) = raw.as_str() {
        serde_json::from_str(s).unwrap_or_else(|e| {
            warn!(error = %e, "nested tool arguments JSON parse failed");
            raw
        })
    } else {
        raw
    }
}

/// A domain expert backed by an LLM and one tool source.
pub struct SpecialistAgent {
    name: String,
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
    tool_specs: Vec<ToolSpec>,
    system_prompt: String,
    tool_budget: u32,
}

impl SpecialistAgent {
    /// Builds a specialist. `tool_specs` is the catalog the agent is allowed
    /// to call; an empty catalog means the agent never invokes tools.
    pub fn new(
        name: impl Into<String>,
        llm: Arc<dyn LlmClient>,
        tools: Arc<dyn ToolSource>,
        tool_specs: Vec<ToolSpec>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            llm,
            tools,
            tool_specs,
            system_prompt: system_prompt.into(),
            tool_budget: DEFAULT_TOOL_BUDGET,
        }
    }

    /// Overrides the per-turn tool round budget.
    pub fn with_tool_budget(mut self, tool_budget: u32) -> Self {
        self.tool_budget = tool_budget;
        self
    }
}

#[async_trait]
impl Node<TravelState> for SpecialistAgent {
    fn id(&self) -> &str {
        &self.name
    }

    async fn run(&self, state: TravelState) -> Result<(TravelState, Next), AgentError> {
        let mut state = state;
        // The routing decision that brought us here is consumed.
        state.pending_route = None;

        let mut working: Vec<Message> = Vec::with_capacity(state.messages.len() + 1);
        working.push(Message::system(&self.system_prompt));
        working.extend(state.messages.iter().cloned());

        let mut rounds: u32 = 0;
        loop {
            let response = self.llm.invoke(&working).await?;

            if response.tool_calls.is_empty() {
                debug!(
                    agent = %self.name,
                    rounds = rounds,
                    reply_preview = %truncate_for_log(&response.content, 200),
                    "specialist turn complete"
                );
                let reply = Message::assistant_named(&self.name, response.content);
                working.push(reply.clone());
                state.messages.push(reply);
                return Ok((state, Next::Continue));
            }

            if self.tool_specs.is_empty() {
                return Err(AgentError::ExecutionFailed(format!(
                    "agent '{}' has no tools but the model requested {}",
                    self.name,
                    response.tool_calls.len()
                )));
            }

            rounds += 1;
            if rounds > self.tool_budget {
                return Err(AgentError::ToolBudgetExhausted {
                    agent: self.name.clone(),
                    limit: self.tool_budget,
                });
            }

            if !response.content.is_empty() {
                let interim = Message::assistant_named(&self.name, response.content);
                working.push(interim.clone());
                state.messages.push(interim);
            }

            for tc in &response.tool_calls {
                let args = parse_tool_arguments(&tc.arguments);
                debug!(agent = %self.name, tool = %tc.name, "calling tool");
                let record = match self.tools.call_tool(&tc.name, args).await {
                    Ok(content) => {
                        debug!(
                            agent = %self.name,
                            tool = %tc.name,
                            result_preview = %truncate_for_log(&content.text, 200),
                            "tool call ok"
                        );
                        Message::tool_ok(&tc.name, tc.id.clone(), content.text)
                    }
                    Err(e) => {
                        warn!(agent = %self.name, tool = %tc.name, error = %e, "tool call failed");
                        Message::tool_error(&tc.name, tc.id.clone(), e.to_string())
                    }
                };
                working.push(record.clone());
                state.messages.push(record);
            }
        }
    }
}
