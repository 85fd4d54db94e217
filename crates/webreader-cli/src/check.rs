use std::fmt;
use std::path::Path;

use webreader_agents::ServerScript;

/// Outcome of one setup check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub name: &'static str,
    pub ok: bool,
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.ok { "ok  " } else { "FAIL" };
        write!(f, "[{mark}] {}: {}", self.name, self.detail)
    }
}

/// Checks on the tool server script. The sentinel check is not repeated
/// here; it runs when the agent is built.
pub fn check_server_script(script: &ServerScript) -> Vec<Diagnostic> {
    let path = Path::new(script.as_str());

    let absolute = Diagnostic {
        name: "absolute path",
        ok: path.is_absolute(),
        detail: if path.is_absolute() {
            script.to_string()
        } else {
            format!("`{script}` is relative; the server is launched from an unknown directory")
        },
    };

    let exists = if path.is_file() {
        Diagnostic {
            name: "script exists",
            ok: true,
            detail: script.to_string(),
        }
    } else if path.exists() {
        Diagnostic {
            name: "script exists",
            ok: false,
            detail: format!("`{script}` is not a regular file"),
        }
    } else {
        Diagnostic {
            name: "script exists",
            ok: false,
            detail: format!("`{script}` not found"),
        }
    };

    vec![absolute, exists]
}
