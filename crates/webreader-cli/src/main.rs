mod banner;
mod check;
mod wizard;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use webreader_agents::{LlmAgent, Profile};
use webreader_config::{AppConfig, ConfigLoader, load_dotenv};

#[derive(Parser)]
#[command(name = "webreader", version, about = "Inspect and check the web reader agent setup")]
struct Cli {
    /// Config file to use instead of ~/.webreader/config.{yml,yaml,toml}
    #[arg(long, global = true, env = "WEBREADER_CONFIG")]
    config: Option<PathBuf>,

    /// Which setup to build the agent from
    #[arg(long, global = true, value_enum, default_value_t = ProfileArg::Workshop)]
    profile: ProfileArg,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the root agent definition
    Show {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Check the tool server script the agent would launch
    Check,
    /// Start each tool server and list the tools the agent may call
    Tools,
    /// Interactively write a config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Directory holding the config file; the parent of `--config` when given.
    fn config_dir(&self) -> PathBuf {
        match &self.config {
            Some(path) => path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            None => ConfigLoader::default_dir(),
        }
    }

    /// File `init` writes: `--config` as given, else `config.yml` in the default dir.
    fn init_target(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| ConfigLoader::default_dir().join("config.yml"))
    }

    /// Load the config along with the file it came from. Runs before the
    /// subscriber exists, so the caller logs the source.
    fn load_config(&self) -> webreader_common::Result<(AppConfig, Option<PathBuf>)> {
        match &self.config {
            Some(path) => Ok((ConfigLoader::load_from(path)?, Some(path.clone()))),
            None => {
                let loader = ConfigLoader::new(self.config_dir());
                Ok((loader.load()?, loader.config_path()))
            }
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ProfileArg {
    Placeholder,
    Workshop,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Placeholder => Profile::Placeholder,
            ProfileArg::Workshop => Profile::Workshop,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let profile = Profile::from(cli.profile);

    let config_dir = cli.config_dir();

    if let Commands::Init { force } = cli.command {
        init_tracing(cli.verbose, None);
        wizard::run_wizard(&cli.init_target(), force)?;
        return Ok(ExitCode::SUCCESS);
    }

    let (config, source) = cli.load_config()?;
    init_tracing(cli.verbose, config.log_level.as_deref());
    match &source {
        Some(path) => info!("config loaded from {}", path.display()),
        None => debug!("no config file in {}, using defaults", config_dir.display()),
    }
    debug!(profile = %profile, "starting");

    let agent = build_agent(profile, &config)?;

    match cli.command {
        Commands::Show { format } => {
            show(&agent, profile, &config_dir, format)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => Ok(run_check(profile)),
        Commands::Tools => list_tools(&agent, cli.verbose).await,
        Commands::Init { .. } => Ok(ExitCode::SUCCESS),
    }
}

/// Logs go to stderr; stdout carries command output and the unset warning.
fn init_tracing(verbose: bool, configured: Option<&str>) {
    let default_level = if verbose {
        "debug"
    } else {
        configured.unwrap_or("info")
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_agent(profile: Profile, config: &AppConfig) -> Result<LlmAgent> {
    if profile.loads_dotenv() {
        load_dotenv();
    }
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let agent = profile
        .build_root_agent(config, |name: &str| std::env::var(name).ok(), &mut out)
        .context("failed to build the root agent")?;
    out.flush()?;
    info!(agent = %agent.name, model = %agent.model, tools = agent.tools.len(), "root agent ready");
    Ok(agent)
}

fn show(
    agent: &LlmAgent,
    profile: Profile,
    config_dir: &std::path::Path,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => banner::print_banner(agent, profile, config_dir),
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&agent.summary()).context("failed to render YAML")?;
            print!("{yaml}");
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&agent.summary())
                .context("failed to render JSON")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn run_check(profile: Profile) -> ExitCode {
    let script = profile.server_script(|name: &str| std::env::var(name).ok());
    let results = check::check_server_script(&script);
    for result in &results {
        println!("{result}");
    }

    if results.iter().all(|d| d.ok) {
        ExitCode::SUCCESS
    } else {
        warn!("tool server script checks failed");
        ExitCode::FAILURE
    }
}

async fn list_tools(agent: &LlmAgent, with_schema: bool) -> Result<ExitCode> {
    let mut failures = 0usize;

    for toolset in &agent.tools {
        println!("{}", toolset.display_command());
        let connection = match toolset.connect().await {
            Ok(connection) => connection,
            Err(e) => {
                println!("  error: {e}");
                failures += 1;
                continue;
            }
        };

        match connection.list_tools().await {
            Ok(tools) if tools.is_empty() => println!("  (no matching tools)"),
            Ok(tools) => {
                for tool in tools {
                    println!("  {:<24} {}", tool.name, tool.description);
                    if with_schema {
                        let schema = serde_json::to_string_pretty(&tool.input_schema)
                            .context("failed to render tool schema")?;
                        for line in schema.lines() {
                            println!("      {line}");
                        }
                    }
                }
            }
            Err(e) => {
                println!("  error: {e}");
                failures += 1;
            }
        }

        if let Err(e) = connection.close().await {
            warn!("{e}");
        }
    }

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
