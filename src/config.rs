use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Optional settings read from `config.json` in the platform config dir.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where printed documents land. Unset means a kept temp file.
    #[serde(default)]
    pub print_dir: Option<PathBuf>,
}

impl Config {
    /// Load the config file, falling back to defaults when it is missing
    /// or unreadable. A broken config is worth a log line, not a refusal
    /// to start.
    pub fn load() -> Self {
        let Some(dirs) = directories::ProjectDirs::from("com", "resumeforge", "resume-forge")
        else {
            return Self::default();
        };
        let path = dirs.config_dir().join("config.json");
        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("ignoring malformed config {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
