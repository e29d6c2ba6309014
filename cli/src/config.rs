//! Context configuration for the CLI.
//!
//! Configuration is stored in `~/.camb/config.yaml` and holds any number of
//! named contexts, one of which may be current.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default configuration directory name, relative to the home directory.
pub const DEFAULT_BASE_DIR: &str = ".camb";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Name of the currently active context.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_context: String,

    /// Map of context name to context configuration.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub contexts: HashMap<String, Context>,

    #[serde(skip)]
    config_path: PathBuf,
}

/// A single API context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Context name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// API key sent as `x-api-key`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// API base URL (optional, uses the public endpoint if empty).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,

    /// Request timeout in seconds (optional).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub timeout: u64,

    /// Seconds between status polls (optional).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub polling_interval: u64,

    /// Directory for downloaded audio (optional).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output_dir: String,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl Config {
    /// Gets the default config directory.
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR))
    }

    /// Gets the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join(DEFAULT_CONFIG_FILE))
    }

    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Adds or replaces a context.
    pub fn add_context(&mut self, name: &str, mut ctx: Context) -> anyhow::Result<()> {
        if name.trim().is_empty() {
            anyhow::bail!("context name must not be empty");
        }
        ctx.name = name.to_string();
        self.contexts.insert(name.to_string(), ctx);
        self.save()
    }

    /// Deletes a context, clearing the current one if it was selected.
    pub fn delete_context(&mut self, name: &str) -> anyhow::Result<()> {
        if self.contexts.remove(name).is_none() {
            anyhow::bail!("context '{}' not found", name);
        }
        if self.current_context == name {
            self.current_context.clear();
        }
        self.save()
    }

    /// Sets the current context.
    pub fn use_context(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.contexts.contains_key(name) {
            anyhow::bail!("context '{}' not found", name);
        }
        self.current_context = name.to_string();
        self.save()
    }

    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    pub fn get_current_context(&self) -> Option<&Context> {
        if self.current_context.is_empty() {
            return None;
        }
        self.contexts.get(&self.current_context)
    }

    /// Resolves the context by name, or the current context if no name is given.
    pub fn resolve_context(&self, name: Option<&str>) -> Option<&Context> {
        match name {
            Some(n) if !n.is_empty() => self.get_context(n),
            _ => self.get_current_context(),
        }
    }

    /// Lists all context names, sorted.
    pub fn list_contexts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.contexts.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Loads configuration from `custom_path`, or from `~/.camb/config.yaml`.
///
/// A missing file is created empty.
pub fn load_config(custom_path: Option<&str>) -> anyhow::Result<Config> {
    let config_path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => Config::default_config_path()
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path"))?,
    };

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut cfg = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        }
    } else {
        let cfg = Config::default();
        std::fs::write(&config_path, serde_yaml::to_string(&cfg)?)?;
        cfg
    };

    cfg.config_path = config_path;
    Ok(cfg)
}

/// Masks an API key for display, keeping the first and last four characters.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let cfg = load_config(path.to_str()).unwrap();
        (dir, cfg)
    }

    #[test]
    fn test_load_creates_missing_file() {
        let (_dir, cfg) = temp_config();
        assert!(cfg.path().exists());
        assert!(cfg.contexts.is_empty());
        assert!(cfg.get_current_context().is_none());
    }

    #[test]
    fn test_context_lifecycle_persists() {
        let (_dir, mut cfg) = temp_config();

        cfg.add_context(
            "prod",
            Context {
                api_key: "sk-prod-0123456789".to_string(),
                polling_interval: 5,
                output_dir: "out".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        cfg.add_context("dev", Context::default()).unwrap();
        cfg.use_context("prod").unwrap();

        let reloaded = load_config(cfg.path().to_str()).unwrap();
        assert_eq!(reloaded.current_context, "prod");
        assert_eq!(reloaded.list_contexts(), vec!["dev", "prod"]);

        let ctx = reloaded.resolve_context(None).unwrap();
        assert_eq!(ctx.name, "prod");
        assert_eq!(ctx.polling_interval, 5);
        assert_eq!(ctx.output_dir, "out");
        assert_eq!(reloaded.resolve_context(Some("dev")).unwrap().name, "dev");
        assert!(reloaded.resolve_context(Some("staging")).is_none());
    }

    #[test]
    fn test_delete_current_context_clears_selection() {
        let (_dir, mut cfg) = temp_config();
        cfg.add_context("prod", Context::default()).unwrap();
        cfg.use_context("prod").unwrap();

        cfg.delete_context("prod").unwrap();

        assert!(cfg.current_context.is_empty());
        assert!(cfg.delete_context("prod").is_err());
    }

    #[test]
    fn test_use_unknown_context_fails() {
        let (_dir, mut cfg) = temp_config();
        let err = cfg.use_context("missing").unwrap_err();
        assert!(err.to_string().contains("missing"));
        assert!(cfg.add_context(" ", Context::default()).is_err());
    }

    #[test]
    fn test_zero_fields_are_omitted() {
        let yaml = serde_yaml::to_string(&Context {
            name: "a".to_string(),
            api_key: "k".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert!(!yaml.contains("timeout"));
        assert!(!yaml.contains("polling_interval"));
        assert!(!yaml.contains("output_dir"));
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key(""), "");
        assert_eq!(mask_api_key("short"), "*****");
        assert_eq!(mask_api_key("abcd1234efgh"), "abcd****efgh");
    }
}
