//! Response formatter: completed conversation → grounding context string.
//!
//! A pure, order-preserving function of its input. The rendered transcript
//! feeds the final answer generator, so every message keeps its role and
//! origin label.

use crate::message::Message;

/// Renders the full conversation into a single labelled transcript.
pub fn render_transcript(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        if !out.is_empty() {
            out.push('\n');
        }
        match message {
            Message::System(content) => {
                out.push_str("[system] ");
                out.push_str(content);
            }
            Message::User(content) => {
                out.push_str("[user] ");
                out.push_str(content);
            }
            Message::Assistant { content, name } => {
                match name {
                    Some(name) => {
                        out.push('[');
                        out.push_str(name);
                        out.push_str("] ");
                    }
                    None => out.push_str("[assistant] "),
                }
                out.push_str(content);
            }
            Message::Tool(record) => {
                out.push_str("[tool ");
                out.push_str(&record.name);
                if record.is_error {
                    out.push_str(" error] ");
                } else {
                    out.push_str("] ");
                }
                out.push_str(&record.content);
            }
        }
    }
    out
}
