//! Workflow agents: the routing supervisor and the tool-using specialists.

mod specialist;
mod supervisor;

pub use specialist::{SpecialistAgent, DEFAULT_TOOL_BUDGET};
pub use supervisor::{SupervisorAgent, SUPERVISOR_NODE_ID};
