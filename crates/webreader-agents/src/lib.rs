pub mod agent;
pub mod mcp;
pub mod profile;

pub use agent::{AgentSummary, LlmAgent, LlmAgentBuilder};
pub use mcp::{McpToolset, StdioConnectionParams, StdioServerParameters, ToolsetSummary};
#[cfg(feature = "mcp")]
pub use mcp::{McpConnection, McpToolInfo};
pub use profile::{Profile, ServerScript, UNSET_WARNING, warn_if_unset};
