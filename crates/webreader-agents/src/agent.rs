use serde::Serialize;
use webreader_common::{Error, Result};
use webreader_config::AgentConfig;

use crate::mcp::{McpToolset, ToolsetSummary};

/// A model-backed agent: which model to use, how to instruct it and which
/// tool servers it may call.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmAgent {
    pub model: String,
    pub name: String,
    pub instruction: String,
    pub description: Option<String>,
    pub tools: Vec<McpToolset>,
}

impl LlmAgent {
    pub fn builder() -> LlmAgentBuilder {
        LlmAgentBuilder::default()
    }

    /// Builder pre-filled from config; tools are added by the caller.
    pub fn from_config(config: &AgentConfig) -> LlmAgentBuilder {
        let mut builder = Self::builder()
            .model(&config.model)
            .name(&config.name)
            .instruction(&config.instruction);
        if let Some(description) = &config.description {
            builder = builder.description(description);
        }
        builder
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            name: self.name.clone(),
            model: self.model.clone(),
            instruction: self.instruction.clone(),
            description: self.description.clone(),
            tools: self.tools.iter().map(McpToolset::summary).collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct LlmAgentBuilder {
    model: String,
    name: String,
    instruction: String,
    description: Option<String>,
    tools: Vec<McpToolset>,
}

impl LlmAgentBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tool(mut self, toolset: McpToolset) -> Self {
        self.tools.push(toolset);
        self
    }

    pub fn build(self) -> Result<LlmAgent> {
        if self.model.trim().is_empty() {
            return Err(Error::Agent("model cannot be empty".into()));
        }
        if self.name.is_empty() {
            return Err(Error::Agent("agent name cannot be empty".into()));
        }
        if !is_identifier(&self.name) {
            return Err(Error::Agent(format!(
                "agent name `{}` must start with a letter or underscore and contain only letters, digits and underscores",
                self.name
            )));
        }

        Ok(LlmAgent {
            model: self.model,
            name: self.name,
            instruction: self.instruction,
            description: self.description,
            tools: self.tools,
        })
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Serializable view of an agent for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentSummary {
    pub name: String,
    pub model: String,
    pub instruction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tools: Vec<ToolsetSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::{StdioConnectionParams, StdioServerParameters};

    #[test]
    fn builds_from_default_config() {
        let agent = LlmAgent::from_config(&AgentConfig::default())
            .build()
            .expect("default config should build");
        assert_eq!(agent.model, "gemini-2.0-flash");
        assert_eq!(agent.name, "web_reader_mcp_client_agent");
        assert!(agent.tools.is_empty());
        assert!(agent.description.is_none());
    }

    #[test]
    fn rejects_empty_model() {
        let err = LlmAgent::builder()
            .model("  ")
            .name("reader")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("model cannot be empty"));
    }

    #[test]
    fn rejects_bad_names() {
        for name in ["", "1reader", "web-reader", "web reader"] {
            let result = LlmAgent::builder().model("m").name(name).build();
            assert!(result.is_err(), "name {name:?} should be rejected");
        }
        assert!(LlmAgent::builder().model("m").name("_reader2").build().is_ok());
    }

    #[test]
    fn summary_includes_tools_in_order() {
        let first = McpToolset::new(StdioConnectionParams::new(StdioServerParameters::new(
            "python3",
            vec!["a.py".into()],
        )));
        let second = McpToolset::new(StdioConnectionParams::new(StdioServerParameters::new(
            "node",
            vec!["b.js".into()],
        )));
        let agent = LlmAgent::builder()
            .model("m")
            .name("reader")
            .description("reads pages")
            .tool(first)
            .tool(second)
            .build()
            .unwrap();

        let summary = agent.summary();
        assert_eq!(summary.tools.len(), 2);
        assert_eq!(summary.tools[0].command, "python3");
        assert_eq!(summary.tools[1].command, "node");

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["description"], "reads pages");
        assert_eq!(json["tools"][0]["args"][0], "a.py");
    }
}
