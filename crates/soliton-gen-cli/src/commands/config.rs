//! `soliton-gen config`: inspect and create configuration files.

use std::fs;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(config, &key)?;
            if output.is_json() {
                return output.json(&serde_json::json!({ "key": key, "value": value }));
            }
            output.print(&value)?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                return output.json(config);
            }
            output.header("Current configuration:")?;
            output.print(&to_toml(config)?)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path(false).display().to_string())?;
        }

        ConfigCommands::Init { local, force } => {
            let path = AppConfig::config_path(local);
            if path.exists() && !force {
                return Err(CliError::ConfigExists { path });
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| CliError::IoError {
                    message: format!("failed to create {}", parent.display()),
                    source: e,
                })?;
            }
            fs::write(&path, to_toml(config)?).map_err(|e| CliError::IoError {
                message: format!("failed to write {}", path.display()),
                source: e,
            })?;
            output.success(&format!("Wrote {}", path.display()))?;
        }
    }

    Ok(())
}

fn to_toml(config: &AppConfig) -> CliResult<String> {
    toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })
}

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let path_or_empty = |p: &Option<std::path::PathBuf>| {
        p.as_ref().map(|p| p.display().to_string()).unwrap_or_default()
    };
    match key {
        "generator.project_dir" => Ok(path_or_empty(&config.generator.project_dir)),
        "generator.templates_dir" => Ok(path_or_empty(&config.generator.templates_dir)),
        "generator.manifest" => Ok(config.generator.manifest.to_string()),
        "server.host" => Ok(config.server.host.clone()),
        "server.port" => Ok(config.server.port.to_string()),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        "project.module_prefix" => Ok(config.project.module_prefix.clone()),
        "project.framework_version" => Ok(config.project.framework_version.clone().unwrap_or_default()),
        "project.go_version" => Ok(config.project.go_version.clone().unwrap_or_default()),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
