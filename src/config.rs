//! Site resolution and per-site configuration.
//!
//! A site lives in `<data_dir>/sites/<site>/` and holds the store (`site.db`)
//! and an optional `site_config.json`. The data directory and site name come
//! from CLI flags, then `ORCHESTRATOR_DATA_DIR` / `ORCHESTRATOR_SITE`, then
//! the platform data directory and [`DEFAULT_SITE`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SITE: &str = "orchestrator.local";
const DB_FILE: &str = "site.db";
const CONFIG_FILE: &str = "site_config.json";

/// Location of one site on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub name: String,
    pub dir: PathBuf,
}

impl Site {
    pub fn new(data_dir: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        let dir = data_dir.join("sites").join(&name);
        Self { name, dir }
    }

    /// Resolve a site from explicit overrides, falling back to the environment
    /// and then to platform defaults.
    pub fn resolve(data_dir: Option<PathBuf>, name: Option<String>) -> Result<Self> {
        let data_dir = match data_dir.or_else(|| std::env::var_os("ORCHESTRATOR_DATA_DIR").map(PathBuf::from)) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let name = name
            .or_else(|| std::env::var("ORCHESTRATOR_SITE").ok())
            .unwrap_or_else(|| DEFAULT_SITE.to_string());
        Ok(Self::new(&data_dir, name))
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.join(DB_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "orchestrator")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Per-site settings read by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Desk route opened after login.
    #[serde(default = "default_home_page")]
    pub home_page: String,
    /// Hide the framework's footer branding on the desk.
    #[serde(default = "default_true")]
    pub hide_footer_branding: bool,
    /// Origins allowed to call the host API. Empty allows any origin.
    #[serde(default)]
    pub allow_cors: Vec<String>,
}

fn default_home_page() -> String {
    "Workspace".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            home_page: default_home_page(),
            hide_footer_branding: true,
            allow_cors: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Load the site config. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create site directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize site config")?;
        fs::write(path, content).context("Failed to write site config")?;

        Ok(())
    }
}
