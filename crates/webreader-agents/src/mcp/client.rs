use rmcp::service::RunningService;
use rmcp::transport::TokioChildProcess;
use rmcp::{RoleClient, ServiceExt};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use webreader_common::{Error, Result};

use super::McpToolset;

#[derive(Debug, Clone, Serialize)]
pub struct McpToolInfo {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// A live session with a tool server child process.
pub struct McpConnection {
    service: RunningService<RoleClient, ()>,
    toolset: McpToolset,
    label: String,
}

impl McpToolset {
    /// Spawn the server and complete the MCP handshake within the
    /// connection timeout.
    pub async fn connect(&self) -> Result<McpConnection> {
        let params = self.server_params();
        let label = self.display_command();

        let mut command = tokio::process::Command::new(&params.command);
        command.args(&params.args).envs(&params.env);

        let transport = TokioChildProcess::new(command)
            .map_err(|e| Error::Mcp(format!("failed to spawn `{label}`: {e}")))?;

        let timeout = self.connection_params.timeout;
        let service = tokio::time::timeout(timeout, ().serve(transport))
            .await
            .map_err(|_| {
                Error::Mcp(format!(
                    "`{label}` did not complete the handshake within {timeout:?}"
                ))
            })?
            .map_err(|e| Error::Mcp(format!("handshake with `{label}` failed: {e}")))?;

        match service.peer_info() {
            Some(peer) => info!(
                server = %peer.server_info.name,
                version = %peer.server_info.version,
                "connected to tool server `{label}`"
            ),
            None => info!("connected to tool server `{label}`"),
        }

        Ok(McpConnection {
            service,
            toolset: self.clone(),
            label,
        })
    }
}

impl McpConnection {
    /// Tools offered by the server that pass the toolset's filter.
    pub async fn list_tools(&self) -> Result<Vec<McpToolInfo>> {
        let tools = self
            .service
            .list_all_tools()
            .await
            .map_err(|e| Error::Mcp(format!("listing tools on `{}` failed: {e}", self.label)))?;

        let offered = tools.len();
        let allowed: Vec<McpToolInfo> = tools
            .into_iter()
            .filter(|tool| self.toolset.allows(&tool.name))
            .map(|tool| McpToolInfo {
                name: tool.name.to_string(),
                description: tool
                    .description
                    .as_deref()
                    .unwrap_or_default()
                    .to_string(),
                input_schema: Value::Object(tool.input_schema.as_ref().clone()),
            })
            .collect();

        debug!(
            offered,
            allowed = allowed.len(),
            "listed tools on `{}`",
            self.label
        );
        Ok(allowed)
    }

    /// End the session; the child process exits with it.
    pub async fn close(self) -> Result<()> {
        self.service
            .cancel()
            .await
            .map_err(|e| Error::Mcp(format!("closing `{}` failed: {e}", self.label)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::mcp::{StdioConnectionParams, StdioServerParameters};

    #[tokio::test]
    async fn missing_command_fails_to_spawn() {
        let set = McpToolset::new(StdioConnectionParams::new(StdioServerParameters::new(
            "webreader-no-such-server-binary",
            vec![],
        )));

        let err = set.connect().await.err().expect("spawn should fail");
        assert!(matches!(err, Error::Mcp(_)));
        assert!(err.to_string().contains("failed to spawn"));
    }

    fn fixture_server() -> StdioServerParameters {
        StdioServerParameters::new(
            "python3",
            vec![concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/web_tools_server.py").to_string()],
        )
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn lists_only_filtered_tools_then_closes() {
        let set = McpToolset::new(
            StdioConnectionParams::new(fixture_server()).with_timeout(Duration::from_secs(10)),
        )
        .with_tool_filter(["load_web_page"]);

        let connection = set.connect().await.expect("fixture server should connect");
        let tools = connection.list_tools().await.expect("tools should list");

        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["load_web_page"]);
        assert_eq!(tools[0].description, "Fetch the content of a web page");
        assert_eq!(tools[0].input_schema["properties"]["url"]["type"], "string");

        connection.close().await.expect("session should close");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unfiltered_toolset_sees_every_tool() {
        let set = McpToolset::new(
            StdioConnectionParams::new(fixture_server()).with_timeout(Duration::from_secs(10)),
        );

        let connection = set.connect().await.expect("fixture server should connect");
        let mut names: Vec<String> = connection
            .list_tools()
            .await
            .expect("tools should list")
            .into_iter()
            .map(|t| t.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["get_directions", "load_web_page"]);

        connection.close().await.expect("session should close");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn silent_server_hits_the_timeout() {
        let set = McpToolset::new(
            StdioConnectionParams::new(StdioServerParameters::new(
                "sleep",
                vec!["30".to_string()],
            ))
            .with_timeout(Duration::from_millis(200)),
        );

        let err = set.connect().await.err().expect("handshake should time out");
        assert!(err.to_string().contains("did not complete the handshake"));
    }
}
