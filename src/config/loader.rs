//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/reporoast/config.toml)
//! 3. Project config (.reporoast/config.toml)
//! 4. Environment variables (REPOROAST_* prefix, `__` separates sections)
//! 5. Well-known credentials (GOOGLE_API_KEY, OPENAI_API_KEY, GITHUB_TOKEN)

use directories::BaseDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{Result, RoastError};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars → credentials
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // e.g. REPOROAST_LLM__MODEL -> llm.model
        figment = figment.merge(Env::prefixed("REPOROAST_").split("__"));

        let mut config: Config = figment
            .extract()
            .map_err(|e| RoastError::Config(format!("Configuration error: {}", e)))?;

        Self::apply_credentials(&mut config, |key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| RoastError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Fill unset secrets from the conventional environment variables.
    ///
    /// Components never read the environment themselves; this is the only
    /// place credentials enter the process.
    pub fn apply_credentials<F>(config: &mut Config, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if config.llm.api_key.is_none() {
            config.llm.api_key = match config.llm.provider.as_str() {
                "openai" => non_empty("OPENAI_API_KEY"),
                _ => non_empty("GOOGLE_API_KEY").or_else(|| non_empty("GEMINI_API_KEY")),
            };
        }

        if config.hosting.token.is_none() {
            config.hosting.token = non_empty("GITHUB_TOKEN");
        }
    }

    /// Apply command-line overrides on top of a loaded configuration.
    ///
    /// Switching provider drops the key resolved for the previous one so the
    /// matching credential is looked up again.
    pub fn apply_overrides<F>(
        config: &mut Config,
        provider: Option<String>,
        model: Option<String>,
        lookup: F,
    ) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = provider
            && provider != config.llm.provider
        {
            debug!("LLM provider override: {} -> {}", config.llm.provider, provider);
            config.llm.provider = provider;
            config.llm.api_key = None;
            config.llm.model = None;
            Self::apply_credentials(config, lookup);
        }
        if model.is_some() {
            config.llm.model = model;
        }
        config.validate()
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/reporoast/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| BaseDirs::new().map(|dirs| dirs.home_dir().join(".config")))
            .map(|p| p.join("reporoast"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".reporoast")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Render an effective configuration (secrets are never serialized)
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| RoastError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            RoastError::Config("Cannot determine global config directory".to_string())
        })?;
        Self::write_default(&global_dir, force)?;
        Ok(global_dir)
    }

    /// Initialize project configuration
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let project_dir = Self::project_dir();
        Self::write_default(&project_dir, force)?;
        Ok(project_dir)
    }

    fn write_default(dir: &Path, force: bool) -> Result<()> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_config_toml())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }
        Ok(())
    }

    /// Default config file content (TOML)
    fn default_config_toml() -> String {
        r#"# reporoast configuration
# Secrets belong in the environment: GOOGLE_API_KEY (or OPENAI_API_KEY), GITHUB_TOKEN.

version = "1.0"

[hosting]
api_base = "https://api.github.com"
raw_base = "https://raw.githubusercontent.com"
timeout_secs = 15
file_timeout_secs = 5

[llm]
provider = "gemini"
# model = "gemini-2.5-flash"
timeout_secs = 60
temperature = 0.9
max_retries = 2

[persona]
# creator = "your-github-login"

[workflow]
init_pause_ms = 500
"#
        .to_string()
    }
}
