//! Project configuration for Autocraft.
//!
//! The `Config` struct says where the crew files live, where generated output
//! goes by default and, optionally, which templates directory to use. It can
//! be created programmatically or loaded from a YAML, TOML or JSON file; the
//! format is chosen from the file extension (YAML when there is none).
//!
//! # Examples
//!
//! ```no_run
//! use autocraft_core::config::Config;
//!
//! // Create a new config programmatically
//! let mut config = Config::new("qa-kit");
//! config.output_dir = "generated".into();
//!
//! // Or load from a config file
//! let config = Config::from_file("autocraft.yaml").unwrap();
//! ```

// Internal imports (std, crate)
use std::fs;
use std::path::{Path, PathBuf};

use crate::templates::TemplateDir;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};

/// File names probed in the working directory when no config path is given
pub const DEFAULT_CONFIG_FILES: [&str; 4] = [
    "autocraft.yaml",
    "autocraft.yml",
    "autocraft.toml",
    "autocraft.json",
];

/// Settings shared by the CLI and library callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Project name, used in log output
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Directory holding `agents.yaml` and `tasks.yaml`
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Default `base_dir` for generated artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Templates directory; discovered when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => Self::Toml,
            Some("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(default_project_name())
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            config_dir: default_config_dir(),
            output_dir: default_output_dir(),
            template_dir: None,
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = match Format::of(path) {
            Format::Yaml => serde_yaml::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
            Format::Json => serde_json::from_str(&content)?,
        };
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given, else the first default file found in `dir`,
    /// else the defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> crate::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
        {
            Some(found) => Self::from_file(found),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let content = match Format::of(path) {
            Format::Yaml => serde_yaml::to_string(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
            Format::Json => serde_json::to_string_pretty(self)?,
        };
        fs::write(path, content)?;
        Ok(())
    }

    /// `<config_dir>/agents.yaml`
    pub fn agents_path(&self) -> PathBuf {
        self.config_dir.join("agents.yaml")
    }

    /// `<config_dir>/tasks.yaml`
    pub fn tasks_path(&self) -> PathBuf {
        self.config_dir.join("tasks.yaml")
    }

    /// The configured templates directory, or the discovered one.
    pub fn templates(&self) -> crate::Result<TemplateDir> {
        Ok(TemplateDir::discover(self.template_dir.as_deref())?)
    }
}

fn default_project_name() -> String {
    "autocraft".to_string()
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("config")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_roundtrip() -> crate::Result<()> {
        let dir = tempdir()?;
        let mut config = Config::new("qa-kit");
        config.output_dir = PathBuf::from("generated");
        config.template_dir = Some(PathBuf::from("tmpl"));

        for name in ["config.yaml", "config.toml", "config.json"] {
            let file_path = dir.path().join(name);
            config.save(&file_path)?;
            let loaded = Config::from_file(&file_path)?;
            assert_eq!(config, loaded, "roundtrip through {name}");
        }
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("autocraft.yaml");
        fs::write(&file_path, "output_dir: out\n")?;

        let config = Config::load(None, dir.path())?;
        assert_eq!(config.project_name, "autocraft");
        assert_eq!(config.config_dir, PathBuf::from("config"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.template_dir.is_none());
        assert_eq!(config.agents_path(), PathBuf::from("config/agents.yaml"));
        Ok(())
    }

    #[test]
    fn test_load_without_file_gives_defaults() -> crate::Result<()> {
        let dir = tempdir()?;
        assert_eq!(Config::load(None, dir.path())?, Config::default());
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_an_error() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("bad.json");
        fs::write(&file_path, "{ not json")?;
        assert!(matches!(
            Config::from_file(&file_path),
            Err(crate::Error::Json(_))
        ));
        Ok(())
    }
}
