use std::{fs, path::Path, path::PathBuf};

use miette::{Context, IntoDiagnostic};
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Engine settings, persisted as TOML. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub logging: LogConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Console filter directive, e.g. `info` or `tessera=debug`
    pub level: String,
    /// Start with the file layer enabled
    pub file: bool,
    pub dir: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO.to_string().to_lowercase(),
            file: false,
            dir: std::env::temp_dir().join("tessera_logs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Depth used by `go` when none is given
    pub default_depth: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_depth: 5 }
    }
}

impl EngineConfig {
    /// Save to a TOML File
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> miette::Result<()> {
        let path = path.as_ref();
        let toml_string = toml::to_string_pretty(self).into_diagnostic()?;
        fs::write(path, toml_string)
            .into_diagnostic()
            .with_context(|| format!("Writing config to {}", path.display()))?;
        Ok(())
    }

    /// Load from a TOML File
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> miette::Result<Self> {
        let path = path.as_ref();
        let file_content = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("Reading config from {}", path.display()))?;
        let config: Self = toml::from_str(&file_content).into_diagnostic()?;
        Ok(config)
    }
}
