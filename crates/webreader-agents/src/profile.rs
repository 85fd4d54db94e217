use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use tracing::{debug, warn};
use webreader_common::{Error, Result};
use webreader_config::env::maps_api_key_from;
use webreader_config::{AppConfig, MAPS_API_KEY_VAR, expand_vars};

use crate::agent::LlmAgent;
use crate::mcp::{McpToolset, StdioConnectionParams, StdioServerParameters};

pub const PLACEHOLDER_SCRIPT: &str = "/path/to/your/adk_server.py";
pub const WORKSHOP_SCRIPT_TEMPLATE: &str = "$HOME/adk_workshop/adk_tools/adk_mcp_server/adk_server.py";

/// Marker value that counts as "not configured".
pub const UNSET_SENTINEL: &str = "None";
pub const UNSET_WARNING: &str =
    "WARNING: PATH_TO_YOUR_MCP_SERVER_SCRIPT is not set. Please update it in agent.py.";

pub const WEB_PAGE_TOOL: &str = "load_web_page";
pub const SCRIPT_INTERPRETER: &str = "python3";

/// Path of the tool server script, as configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerScript(String);

impl ServerScript {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact match against the sentinel; empty strings do not count.
    pub fn is_unset(&self) -> bool {
        self.0 == UNSET_SENTINEL
    }
}

impl fmt::Display for ServerScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Write the unset warning to `out` if `script` is the sentinel.
/// Returns whether the warning was written.
pub fn warn_if_unset<W: Write>(script: &ServerScript, out: &mut W) -> io::Result<bool> {
    if !script.is_unset() {
        return Ok(false);
    }
    warn!("tool server script path is unset");
    writeln!(out, "{UNSET_WARNING}")?;
    Ok(true)
}

/// Which flavour of the web reader setup to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Literal placeholder path that the user is expected to edit.
    Placeholder,
    /// Workshop layout under `$HOME`, with `.env` support and a maps key.
    #[default]
    Workshop,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Placeholder => "placeholder",
            Profile::Workshop => "workshop",
        }
    }

    /// Whether this profile reads a `.env` file before resolving anything.
    pub fn loads_dotenv(self) -> bool {
        matches!(self, Profile::Workshop)
    }

    pub fn server_script<F>(self, lookup: F) -> ServerScript
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            Profile::Placeholder => ServerScript::new(PLACEHOLDER_SCRIPT),
            Profile::Workshop => ServerScript::new(expand_vars(WORKSHOP_SCRIPT_TEMPLATE, lookup)),
        }
    }

    /// Build the root agent for this profile.
    ///
    /// The sentinel check runs against `out` before the agent is built and
    /// never stops the build. Extra servers from `config.mcp` follow the
    /// profile's own server.
    pub fn build_root_agent<F, W>(self, config: &AppConfig, lookup: F, out: &mut W) -> Result<LlmAgent>
    where
        F: Fn(&str) -> Option<String>,
        W: Write,
    {
        let script = self.server_script(&lookup);
        debug!(profile = self.as_str(), script = %script, "resolved tool server script");
        warn_if_unset(&script, out)?;

        let mut server = StdioServerParameters::new(SCRIPT_INTERPRETER, vec![script.to_string()]);
        if self == Profile::Workshop {
            match maps_api_key_from(&lookup) {
                Some(key) => server = server.with_env(MAPS_API_KEY_VAR, key),
                None => debug!("{MAPS_API_KEY_VAR} not set, tool server gets no maps key"),
            }
        }
        let web_reader = McpToolset::new(StdioConnectionParams::new(server))
            .with_tool_filter([WEB_PAGE_TOOL]);

        let mut builder = LlmAgent::from_config(&config.agent).tool(web_reader);
        for (name, server) in &config.mcp {
            debug!(server = %name, "attaching configured tool server");
            builder = builder.tool(McpToolset::from_config(server));
        }
        builder.build()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(Profile::Placeholder),
            "workshop" => Ok(Profile::Workshop),
            other => Err(Error::Config(format!(
                "unknown profile `{other}` (expected `placeholder` or `workshop`)"
            ))),
        }
    }
}
