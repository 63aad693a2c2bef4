use anyhow::{Context, Result};
use ipmanager_engine::IpOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of the TOML config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ip: IpOptions,
}

impl Config {
    /// Load the config file; a missing file means defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        Self::parse(&text).with_context(|| format!("Failed to parse {:?}", path))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(text)?;
        for group in &cfg.ip.groups {
            for block in &group.blocks {
                if block.min > block.max {
                    tracing::warn!(
                        "Group {} has an inverted block {}-{}; it will never yield addresses",
                        group.name, block.min, block.max
                    );
                }
            }
        }
        Ok(cfg)
    }
}

pub fn default_config_path() -> PathBuf {
    let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.push("ipmanager");
    dir.push("config.toml");
    dir
}
