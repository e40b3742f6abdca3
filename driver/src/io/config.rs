//! Driver configuration from an optional `driver.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::state::Project;

/// Driver configuration (TOML).
///
/// This file is edited by humans next to the monorepo it drives. Missing
/// fields (and a missing file) fall back to the lattice defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DriverConfig {
    pub project: Project,

    /// Directory whose presence marks a usable local puppeteer install.
    pub puppeteer_dir: String,

    /// Bound on captured stdout for silent suite runs.
    pub silent_output_limit_bytes: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            project: Project::default(),
            puppeteer_dir: "node_modules/puppeteer".to_string(),
            silent_output_limit_bytes: 1_000_000,
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("project.scope", &self.project.scope),
            ("project.native_package", &self.project.native_package),
            ("project.timezone_package", &self.project.timezone_package),
            ("project.notebook_package", &self.project.notebook_package),
            ("project.sandbox_image", &self.project.sandbox_image),
            ("project.runner_config", &self.project.runner_config),
            ("puppeteer_dir", &self.puppeteer_dir),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow!("{field} must be non-empty"));
            }
        }
        if self.silent_output_limit_bytes == 0 {
            return Err(anyhow!("silent_output_limit_bytes must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `DriverConfig::default()`.
pub fn load_config(path: &Path) -> Result<DriverConfig> {
    if !path.exists() {
        let cfg = DriverConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: DriverConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
