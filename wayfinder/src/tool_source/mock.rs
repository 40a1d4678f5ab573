//! Mock tool source for deterministic tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use super::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};

/// In-memory `ToolSource` double: fixed catalog, canned replies, and a call
/// counter so tests can assert how often tools were actually invoked.
#[derive(Default)]
pub struct MockToolSource {
    specs: Vec<ToolSpec>,
    /// name -> Ok(reply text) or Err(error message).
    results: HashMap<String, Result<String, String>>,
    calls: AtomicUsize,
}

impl MockToolSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool that succeeds with the given reply.
    pub fn with_tool(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        reply: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.specs.push(ToolSpec {
            name: name.clone(),
            description: Some(description.into()),
            input_schema: serde_json::json!({"type": "object"}),
        });
        self.results.insert(name, Ok(reply.into()));
        self
    }

    /// Registers a tool that fails with the given error message.
    pub fn with_failing_tool(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.specs.push(ToolSpec {
            name: name.clone(),
            description: Some(description.into()),
            input_schema: serde_json::json!({"type": "object"}),
        });
        self.results.insert(name, Err(error.into()));
        self
    }

    /// Number of `call_tool` invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.specs.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        _arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.results.get(name) {
            Some(Ok(text)) => Ok(ToolCallContent { text: text.clone() }),
            Some(Err(msg)) => Err(ToolSourceError::Failed(msg.clone())),
            None => Err(ToolSourceError::NotFound(name.to_string())),
        }
    }
}
