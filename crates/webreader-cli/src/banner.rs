use std::path::Path;

use webreader_agents::{LlmAgent, Profile};

const WIDTH: usize = 72;
const LEFT_W: usize = 28;

/// Render the boxed agent summary shown by `webreader show`.
pub fn render_banner(agent: &LlmAgent, profile: Profile, config_dir: &Path) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let left_w = LEFT_W;
    let right_w = WIDTH - LEFT_W - 5; // "│ " + "│ " + "│"

    let tools = if agent.tools.is_empty() {
        "none".to_string()
    } else {
        let count = agent.tools.len();
        format!("{count} server{}", if count == 1 { "" } else { "s" })
    };

    let dir_display = match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => config_dir.to_string_lossy().replace(&home, "~"),
        _ => config_dir.to_string_lossy().to_string(),
    };

    let title = format!("webreader v{version}");
    let title_dashes = WIDTH.saturating_sub(title.chars().count() + 7);
    let top = format!("╭─── {title} {}╮", "─".repeat(title_dashes));
    let bottom = format!("╰{}╯", "─".repeat(WIDTH - 2));

    let row = |l: &str, r: &str| {
        format!(
            "│ {:<left_w$}│ {:<right_w$}│",
            clip(l, left_w),
            clip(r, right_w)
        )
    };

    let mut lines = vec![
        top,
        row("", ""),
        row("  web reader agent", &format!("Agent    {}", agent.name)),
        row(&format!("  profile: {profile}"), &format!("Model    {}", agent.model)),
        row("", &format!("Tools    {tools}")),
    ];
    for toolset in &agent.tools {
        lines.push(row("", &format!("  {}", toolset.display_command())));
    }
    lines.push(row(&format!("  {dir_display}"), ""));
    lines.push(row("", ""));
    lines.push(bottom);
    lines.join("\n")
}

pub fn print_banner(agent: &LlmAgent, profile: Profile, config_dir: &Path) {
    println!("{}", render_banner(agent, profile, config_dir));
}

/// Truncate to `max` chars, marking the cut with an ellipsis.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
