use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name used when no explicit mock config is selected.
pub const DEFAULT_CONFIG: &str = "default";

/// Caller-supplied knobs for the mock controller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mock config name passed as `-r <name>`; `None` means mock's default.
    pub mock_config: Option<String>,
    /// Extra options appended to every `mock` invocation.
    pub mock_options: Option<String>,
    /// Overrides where built packages and logs are collected.
    pub resultdir: Option<PathBuf>,
    /// Default results location of the review tool.
    pub review_results: PathBuf,
    /// Directory holding `<name>.cfg` files.
    pub config_dir: PathBuf,
    /// Mock's state directory, parent of every chroot.
    pub state_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mock_config: None,
            mock_options: None,
            resultdir: None,
            review_results: PathBuf::from("results"),
            config_dir: PathBuf::from("/etc/mock"),
            state_root: PathBuf::from("/var/lib/mock"),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; absent keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read settings file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn config_name(&self) -> &str {
        self.mock_config.as_deref().unwrap_or(DEFAULT_CONFIG)
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(format!("{}.cfg", self.config_name()))
    }

    /// `-r <config>` when a non-default config is selected, else empty.
    pub fn config_flag(&self) -> String {
        match &self.mock_config {
            Some(config) => format!("-r {}", config),
            None => String::new(),
        }
    }
}
