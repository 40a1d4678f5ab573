//! Workflow state shared by the supervisor and the specialists.
//!
//! `TravelState` flows through the graph; nodes append messages and never
//! rewrite history. The supervisor records its latest routing decision in
//! `pending_route`, and the specialist that handles it clears the field so a
//! decision is consumed exactly once.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// A tool call requested by the LLM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name as exposed by the tool server.
    pub name: String,
    /// JSON-encoded arguments, exactly as the model produced them.
    pub arguments: String,
    /// Provider-assigned call id, when present.
    pub id: Option<String>,
}

/// The supervisor's routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Hand the conversation to the navigation specialist.
    NavigationExpert,
    /// Hand the conversation to the ticketing specialist.
    TicketingExpert,
    /// The plan is complete; stop routing.
    Terminate,
}

impl RouteDecision {
    /// Canonical label for this decision (what the supervisor is asked to emit).
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::NavigationExpert => "navigation_expert",
            Self::TicketingExpert => "ticketing_expert",
            Self::Terminate => "terminate",
        }
    }

    /// Graph node id this decision routes to. `Terminate` maps to END in the
    /// workflow's path map, not here.
    pub fn node_id(&self) -> &'static str {
        self.as_label()
    }
}

impl FromStr for RouteDecision {
    type Err = String;

    /// Parses a routing label, case-insensitively and ignoring surrounding
    /// whitespace. `__end__` is accepted as a terminate alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "navigation_expert" => Ok(Self::NavigationExpert),
            "ticketing_expert" => Ok(Self::TicketingExpert),
            "terminate" | "__end__" => Ok(Self::Terminate),
            other => Err(format!("unknown routing label: {other}")),
        }
    }
}

/// Conversation state for one travel-planning query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelState {
    /// Append-only conversation history.
    pub messages: Vec<Message>,
    /// The routing label the supervisor produced on its last turn; consumed
    /// (cleared) by the specialist that runs next.
    pub pending_route: Option<String>,
    /// How many times the supervisor has run for this query.
    pub supervisor_turns: u32,
}

impl TravelState {
    /// Initial state for a query: the user's question and nothing else.
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(query)],
            pending_route: None,
            supervisor_turns: 0,
        }
    }

    /// Content of the last assistant message, if any.
    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Assistant { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }
}
