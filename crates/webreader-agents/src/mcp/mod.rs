#[cfg(feature = "mcp")]
pub mod client;

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use webreader_config::McpServerConfig;

#[cfg(feature = "mcp")]
pub use client::{McpConnection, McpToolInfo};

const SECRET_MARKERS: [&str; 4] = ["KEY", "TOKEN", "SECRET", "PASSWORD"];
const REDACTED: &str = "<redacted>";

/// Command line and environment used to launch a tool server.
#[derive(Clone, PartialEq)]
pub struct StdioServerParameters {
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

impl StdioServerParameters {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            env: BTreeMap::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Environment with secret-looking values masked.
    pub fn redacted_env(&self) -> BTreeMap<String, String> {
        self.env
            .iter()
            .map(|(k, v)| {
                let shown = if is_secret_key(k) {
                    REDACTED.to_string()
                } else {
                    v.clone()
                };
                (k.clone(), shown)
            })
            .collect()
    }
}

impl fmt::Debug for StdioServerParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdioServerParameters")
            .field("command", &self.command)
            .field("args", &self.args)
            .field("env", &self.redacted_env())
            .finish()
    }
}

fn is_secret_key(key: &str) -> bool {
    let upper = key.to_ascii_uppercase();
    SECRET_MARKERS.iter().any(|m| upper.contains(m))
}

#[derive(Debug, Clone, PartialEq)]
pub struct StdioConnectionParams {
    pub server_params: StdioServerParameters,
    /// Upper bound on spawning the server and completing the handshake.
    pub timeout: Duration,
}

impl StdioConnectionParams {
    pub fn new(server_params: StdioServerParameters) -> Self {
        Self {
            server_params,
            timeout: Duration::from_secs(webreader_config::model::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A set of tools served by one MCP server, optionally narrowed by name.
#[derive(Debug, Clone, PartialEq)]
pub struct McpToolset {
    pub connection_params: StdioConnectionParams,
    pub tool_filter: Option<Vec<String>>,
}

impl McpToolset {
    pub fn new(connection_params: StdioConnectionParams) -> Self {
        Self {
            connection_params,
            tool_filter: None,
        }
    }

    pub fn with_tool_filter<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tool_filter = Some(tools.into_iter().map(Into::into).collect());
        self
    }

    pub fn from_config(config: &McpServerConfig) -> Self {
        let server_params = StdioServerParameters {
            command: config.command.clone(),
            args: config.args.clone(),
            env: config.env.clone(),
        };
        Self {
            connection_params: StdioConnectionParams::new(server_params)
                .with_timeout(Duration::from_secs(config.timeout_secs)),
            tool_filter: config.tool_filter.clone(),
        }
    }

    /// Whether `tool_name` is exposed to the agent.
    pub fn allows(&self, tool_name: &str) -> bool {
        match &self.tool_filter {
            Some(names) => names.iter().any(|n| n == tool_name),
            None => true,
        }
    }

    pub fn server_params(&self) -> &StdioServerParameters {
        &self.connection_params.server_params
    }

    /// Human-readable launch line, e.g. `python3 /srv/adk_server.py`.
    pub fn display_command(&self) -> String {
        let params = self.server_params();
        std::iter::once(params.command.as_str())
            .chain(params.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn summary(&self) -> ToolsetSummary {
        let params = self.server_params();
        ToolsetSummary {
            command: params.command.clone(),
            args: params.args.clone(),
            env: params.redacted_env(),
            timeout_secs: self.connection_params.timeout.as_secs_f64(),
            tool_filter: self.tool_filter.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolsetSummary {
    pub command: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    pub timeout_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_filter: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toolset() -> McpToolset {
        McpToolset::new(StdioConnectionParams::new(StdioServerParameters::new(
            "python3",
            vec!["/srv/adk_server.py".to_string()],
        )))
    }

    #[test]
    fn no_filter_allows_everything() {
        let set = toolset();
        assert!(set.allows("load_web_page"));
        assert!(set.allows("anything_else"));
    }

    #[test]
    fn filter_restricts_by_exact_name() {
        let set = toolset().with_tool_filter(["load_web_page"]);
        assert!(set.allows("load_web_page"));
        assert!(!set.allows("load_web_pages"));
        assert!(!set.allows("search"));
    }

    #[test]
    fn default_timeout_is_five_seconds() {
        assert_eq!(toolset().connection_params.timeout, Duration::from_secs(5));
    }

    #[test]
    fn from_config_copies_launch_details() {
        let config = McpServerConfig {
            command: "uv".into(),
            args: vec!["run".into(), "server.py".into()],
            timeout_secs: 12,
            tool_filter: Some(vec!["fetch".into()]),
            ..Default::default()
        };
        let set = McpToolset::from_config(&config);
        assert_eq!(set.display_command(), "uv run server.py");
        assert_eq!(set.connection_params.timeout, Duration::from_secs(12));
        assert!(set.allows("fetch"));
        assert!(!set.allows("load_web_page"));
    }

    #[test]
    fn secrets_are_masked_in_debug_and_summary() {
        let params = StdioServerParameters::new("python3", vec![])
            .with_env("GOOGLE_MAPS_API_KEY", "AIza-secret")
            .with_env("LOG_LEVEL", "debug");

        let debug = format!("{params:?}");
        assert!(!debug.contains("AIza-secret"));
        assert!(debug.contains("debug"));

        let set = McpToolset::new(StdioConnectionParams::new(params));
        let summary = set.summary();
        assert_eq!(summary.env["GOOGLE_MAPS_API_KEY"], "<redacted>");
        assert_eq!(summary.env["LOG_LEVEL"], "debug");
    }

    #[test]
    fn secret_detection_ignores_case() {
        assert!(is_secret_key("github_token"));
        assert!(is_secret_key("Db_Password"));
        assert!(!is_secret_key("HOME"));
    }
}
