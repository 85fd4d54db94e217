pub mod env;
pub mod loader;
pub mod model;

pub use env::{MAPS_API_KEY_VAR, expand_env_vars, expand_vars, load_dotenv, maps_api_key_from};
pub use loader::ConfigLoader;
pub use model::{AgentConfig, AppConfig, McpServerConfig};
