//! Message types for the travel-planning conversation.
//!
//! Message roles: System (usually first in the list), User, Assistant, Tool.
//! Assistant messages carry an optional agent name so the supervisor and both
//! specialists stay attributable in a shared transcript. Tool results are
//! `ToolRecord`s with an explicit `is_error` flag; success vs failure is a
//! field, never inferred from the content text.

use serde::{Deserialize, Serialize};

/// Outcome of one tool invocation, appended to the conversation by the
/// specialist that issued the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRecord {
    /// Tool name as advertised by the tool server.
    pub name: String,
    /// Provider-assigned call id, when the model supplied one.
    pub call_id: Option<String>,
    /// Result text (or the error message when `is_error` is set).
    pub content: String,
    /// True when the invocation failed; the record still enters the
    /// transcript so the model can react to it.
    pub is_error: bool,
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// System prompt; typically placed first in the message list.
    System(String),
    /// User input.
    User(String),
    /// Model/agent reply. `name` attributes the reply to a specific agent.
    Assistant {
        content: String,
        name: Option<String>,
    },
    /// Tagged tool result.
    Tool(ToolRecord),
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    /// Creates an unattributed assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            name: None,
        }
    }

    /// Creates an assistant message attributed to a named agent.
    pub fn assistant_named(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            name: Some(name.into()),
        }
    }

    /// Creates a successful tool result record.
    pub fn tool_ok(
        name: impl Into<String>,
        call_id: Option<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::Tool(ToolRecord {
            name: name.into(),
            call_id,
            content: content.into(),
            is_error: false,
        })
    }

    /// Creates a failed tool result record.
    pub fn tool_error(
        name: impl Into<String>,
        call_id: Option<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::Tool(ToolRecord {
            name: name.into(),
            call_id,
            content: content.into(),
            is_error: true,
        })
    }
}
