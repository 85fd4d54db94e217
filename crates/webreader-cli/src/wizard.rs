use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result, bail};
use dialoguer::{Confirm, Input};
use tracing::info;
use webreader_config::model::{DEFAULT_AGENT_NAME, DEFAULT_INSTRUCTION, DEFAULT_MODEL};
use webreader_config::{AgentConfig, AppConfig};

/// Run the interactive setup and write the result to `config_path`, in
/// YAML or TOML according to its extension.
pub fn run_wizard(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    if !std::io::stdin().is_terminal() {
        println!("Non-interactive environment detected.");
        println!("To configure webreader, create: {}", config_path.display());
        println!();
        println!("Minimal config.yml example:");
        println!("---");
        println!("agent:");
        println!("  model: {DEFAULT_MODEL}");
        println!("  name: {DEFAULT_AGENT_NAME}");
        println!("mcp:");
        println!("  maps:");
        println!("    command: python3");
        println!("    args: [\"$HOME/servers/maps_server.py\"]");
        return Ok(());
    }

    println!();
    println!("  webreader setup");
    println!("  ---------------");
    println!();

    let model: String = Input::new()
        .with_prompt("Model")
        .default(DEFAULT_MODEL.to_string())
        .interact_text()
        .context("model input cancelled")?;

    let name: String = Input::new()
        .with_prompt("Agent name")
        .default(DEFAULT_AGENT_NAME.to_string())
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if is_valid_name(input) {
                Ok(())
            } else {
                Err("use letters, digits and underscores, not starting with a digit")
            }
        })
        .interact_text()
        .context("agent name input cancelled")?;

    let instruction: String = Input::new()
        .with_prompt("Instruction")
        .default(DEFAULT_INSTRUCTION.to_string())
        .interact_text()
        .context("instruction input cancelled")?;

    let config = build_config(model, name, instruction);
    let rendered = render_config(&config, config_path)?;

    println!();
    println!("{rendered}");
    let write = Confirm::new()
        .with_prompt(format!("Write this to {}?", config_path.display()))
        .default(true)
        .interact()
        .context("confirmation cancelled")?;
    if !write {
        println!("  Nothing written.");
        return Ok(());
    }

    if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).context(format!("failed to create {}", dir.display()))?;
    }
    std::fs::write(config_path, &rendered)
        .context(format!("failed to write {}", config_path.display()))?;

    info!("config written to {}", config_path.display());
    println!("  Config written to {}", config_path.display());
    println!("  Run `webreader check` to verify the tool server script.");
    println!();

    Ok(())
}

fn render_config(config: &AppConfig, path: &Path) -> Result<String> {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "yml" | "yaml" => serde_yaml::to_string(config).context("failed to serialize config"),
        "toml" => toml::to_string(config).context("failed to serialize config"),
        other => bail!("unsupported config extension: {other} (use .yml, .yaml or .toml)"),
    }
}

fn build_config(model: String, name: String, instruction: String) -> AppConfig {
    AppConfig {
        agent: AgentConfig {
            model: model.trim().to_string(),
            name: name.trim().to_string(),
            instruction: instruction.trim().to_string(),
            description: None,
        },
        ..Default::default()
    }
}

fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
