use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, warn};

/// Environment variable holding the maps service API key handed to the tool server.
pub const MAPS_API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

static VAR_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z0-9_]+|\{[^}]*\})").expect("variable pattern is valid"));

/// Load a `.env` file from the current directory or one of its parents.
///
/// Returns the path that was loaded. A missing file is normal and yields
/// `None`; a malformed one is logged and skipped.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!("loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => {
            debug!("no .env file found");
            None
        }
        Err(e) => {
            warn!("ignoring unreadable .env file: {e}");
            None
        }
    }
}

/// Expand `$name` and `${name}` references using `lookup`.
///
/// References to names `lookup` does not know are kept verbatim, as is any
/// `$` that does not start a reference.
pub fn expand_vars<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if !input.contains('$') {
        return input.to_string();
    }

    VAR_REF
        .replace_all(input, |caps: &Captures<'_>| {
            let raw = &caps[1];
            let name = raw
                .strip_prefix('{')
                .and_then(|n| n.strip_suffix('}'))
                .unwrap_or(raw);
            lookup(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// [`expand_vars`] against the process environment.
pub fn expand_env_vars(input: &str) -> String {
    expand_vars(input, |name| std::env::var(name).ok())
}

/// The maps API key from `lookup`, if set and non-empty.
pub fn maps_api_key_from<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(MAPS_API_KEY_VAR).filter(|key| !key.trim().is_empty())
}
