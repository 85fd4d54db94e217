use std::collections::HashMap;

use webreader_agents::{Profile, UNSET_WARNING};
use webreader_config::{AppConfig, ConfigLoader};

/// Lookup backed by a fixed set of variables.
fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn config_file_drives_the_workshop_agent() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(
        dir.path().join("config.yml"),
        r#"
agent:
  model: gemini-2.5-flash
  description: Reads web pages for the user
mcp:
  maps:
    command: python3
    args: ["/opt/maps_server.py"]
    env:
      GOOGLE_MAPS_API_KEY: from-config
    tool_filter: [get_directions]
    timeout_secs: 20
"#,
    )
    .expect("write config");

    let config = ConfigLoader::new(dir.path()).load().expect("config loads");
    let env = env_of(&[("HOME", "/home/ada")]);
    let mut out = Vec::new();
    let agent = Profile::Workshop
        .build_root_agent(&config, |name: &str| env.get(name).cloned(), &mut out)
        .expect("agent builds");

    assert!(out.is_empty());
    assert_eq!(agent.model, "gemini-2.5-flash");
    assert_eq!(agent.name, "web_reader_mcp_client_agent");
    assert_eq!(agent.tools.len(), 2);
    assert!(agent.tools[0].allows("load_web_page"));
    assert!(agent.tools[1].allows("get_directions"));
    assert!(!agent.tools[1].allows("load_web_page"));

    let summary = serde_yaml::to_string(&agent.summary()).expect("summary serializes");
    assert!(summary.contains("/home/ada/adk_workshop/adk_tools/adk_mcp_server/adk_server.py"));
    assert!(summary.contains("<redacted>"));
    assert!(!summary.contains("from-config"));
}

#[test]
fn running_either_profile_prints_nothing() {
    let env = env_of(&[]);
    for profile in [Profile::Placeholder, Profile::Workshop] {
        let mut out = Vec::new();
        profile
            .build_root_agent(&AppConfig::default(), |name: &str| env.get(name).cloned(), &mut out)
            .expect("agent builds");
        let printed = String::from_utf8(out).expect("utf8");
        assert!(!printed.contains(UNSET_WARNING), "{profile} warned");
        assert!(printed.is_empty());
    }
}
