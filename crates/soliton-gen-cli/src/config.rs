//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `SOLITON_GEN__SERVER__PORT=9000`
//! 3. Config file: `--config`, else `./.soliton-gen.toml` layered over the
//!    user config dir
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use soliton_gen_core::domain::template_data::DEFAULT_MODULE_PREFIX;

pub const ENV_PREFIX: &str = "SOLITON_GEN";
pub const LOCAL_CONFIG_FILE: &str = ".soliton-gen.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub server: ServerConfig,
    pub output: OutputConfig,
    pub project: ProjectDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Where layout discovery starts when `--dir` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_dir: Option<PathBuf>,
    /// Directory of `<template>.j2` overrides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    /// Record generated artifacts in `.soliton-gen/manifest.json`.
    pub manifest: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            project_dir: None,
            templates_dir: None,
            manifest: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefaults {
    pub module_prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_version: Option<String>,
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        Self {
            module_prefix: DEFAULT_MODULE_PREFIX.into(),
            framework_version: None,
            go_version: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, file(s) and environment.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = toml::to_string(&Self::default()).context("serialising default configuration")?;
        let mut builder = Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml));

        match config_file {
            Some(path) => {
                builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
            }
            None => {
                if let Some(global) = Self::global_config_path() {
                    builder = builder.add_source(File::from(global).format(FileFormat::Toml).required(false));
                }
                builder = builder.add_source(
                    File::from(Path::new(LOCAL_CONFIG_FILE))
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("reading configuration")?;

        settings
            .try_deserialize()
            .context("configuration has invalid values")
    }

    /// User config file, e.g. `~/.config/soliton-gen/config.toml`.
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "soliton-go", "soliton-gen")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// The file `config init` writes and `config path` reports.
    pub fn config_path(local: bool) -> PathBuf {
        if local {
            return PathBuf::from(LOCAL_CONFIG_FILE);
        }
        Self::global_config_path().unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Start directory for layout discovery.
    pub fn start_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.generator.project_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.project.module_prefix, "github.com/soliton-go");
        assert_eq!(cfg.server.port, 3000);
        assert!(cfg.generator.manifest);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 8080\n\n[project]\nmodule_prefix = \"example.com/acme\"\n\n[generator]\nmanifest = false"
        )
        .unwrap();

        let cfg = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.project.module_prefix, "example.com/acme");
        assert!(!cfg.generator.manifest);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }

    #[test]
    fn start_dir_prefers_flag_then_config() {
        let mut cfg = AppConfig::default();
        assert_eq!(cfg.start_dir(None), PathBuf::from("."));
        cfg.generator.project_dir = Some("/srv/shop".into());
        assert_eq!(cfg.start_dir(None), PathBuf::from("/srv/shop"));
        assert_eq!(cfg.start_dir(Some(Path::new("/tmp"))), PathBuf::from("/tmp"));
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path(false).as_os_str().is_empty());
        assert_eq!(AppConfig::config_path(true), PathBuf::from(".soliton-gen.toml"));
    }
}
