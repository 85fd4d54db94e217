use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_AGENT_NAME: &str = "web_reader_mcp_client_agent";
pub const DEFAULT_INSTRUCTION: &str =
    "Use the 'load_web_page' tool to fetch content from a URL provided by the user.";
pub const DEFAULT_SERVER_COMMAND: &str = "python3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Top-level configuration, read from `~/.webreader/config.yml` when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentConfig,

    /// Extra tool servers, attached after the profile's own server.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub mcp: BTreeMap<String, McpServerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    pub model: String,
    pub name: String,
    pub instruction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            name: DEFAULT_AGENT_NAME.to_string(),
            instruction: DEFAULT_INSTRUCTION.to_string(),
            description: None,
        }
    }
}

/// A tool server launched as a child process and spoken to over stdio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct McpServerConfig {
    #[serde(default = "default_command")]
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Only these tools are exposed to the agent. `None` exposes all of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_filter: Option<Vec<String>>,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: Vec::new(),
            env: BTreeMap::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            tool_filter: None,
        }
    }
}

fn default_command() -> String {
    DEFAULT_SERVER_COMMAND.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
