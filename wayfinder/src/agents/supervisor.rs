//! Supervisor agent: routes the conversation to a specialist or ends it.
//!
//! The supervisor never calls tools. It reads the whole conversation, asks
//! the LLM for exactly one routing label, and stores that label in
//! `pending_route` for the graph's conditional router to act on. The raw
//! reply also lands in the transcript as a supervisor-named assistant
//! message so the routing trace survives into the final answer context.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::TravelState;

/// Node id the conditional edges hang off of.
pub const SUPERVISOR_NODE_ID: &str = "supervisor";

/// The routing LLM. Tool-free by construction.
pub struct SupervisorAgent {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl SupervisorAgent {
    pub fn new(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
        }
    }
}

#[async_trait]
impl Node<TravelState> for SupervisorAgent {
    fn id(&self) -> &str {
        SUPERVISOR_NODE_ID
    }

    async fn run(&self, state: TravelState) -> Result<(TravelState, Next), AgentError> {
        let mut state = state;

        let mut working: Vec<Message> = Vec::with_capacity(state.messages.len() + 1);
        working.push(Message::system(&self.system_prompt));
        working.extend(state.messages.iter().cloned());

        let response = self.llm.invoke(&working).await?;
        let label = response.content.trim().to_string();
        debug!(
            turn = state.supervisor_turns + 1,
            label = %label,
            "supervisor routing decision"
        );

        state
            .messages
            .push(Message::assistant_named(SUPERVISOR_NODE_ID, response.content.clone()));
        state.pending_route = Some(label);
        state.supervisor_turns += 1;

        Ok((state, Next::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;

    /// **Scenario**: the supervisor stores the trimmed routing label, appends
    /// its own named message, and counts the turn.
    #[tokio::test]
    async fn supervisor_stores_trimmed_label() {
        let llm = Arc::new(MockLlm::with_reply("  ticketing_expert\n"));
        let agent = SupervisorAgent::new(llm, "route");

        let (state, next) = agent
            .run(TravelState::with_query("Beijing to Hangzhou"))
            .await
            .unwrap();

        assert_eq!(next, Next::Continue);
        assert_eq!(state.pending_route.as_deref(), Some("ticketing_expert"));
        assert_eq!(state.supervisor_turns, 1);
        assert_eq!(state.messages.len(), 2);
        assert!(
            matches!(&state.messages[1], Message::Assistant { name: Some(n), .. } if n == SUPERVISOR_NODE_ID)
        );
    }

    /// **Scenario**: repeated turns keep incrementing the counter and never
    /// drop earlier messages.
    #[tokio::test]
    async fn supervisor_turns_accumulate() {
        let llm = Arc::new(MockLlm::with_reply("terminate"));
        let agent = SupervisorAgent::new(llm, "route");

        let (state, _) = agent.run(TravelState::with_query("q")).await.unwrap();
        let before = state.messages.clone();
        let (state, _) = agent.run(state).await.unwrap();

        assert_eq!(state.supervisor_turns, 2);
        assert_eq!(&state.messages[..before.len()], &before[..]);
    }
}
