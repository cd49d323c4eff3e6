//! Command handlers. Each translates parsed arguments into a core request,
//! runs it, and hands the result to the [`OutputManager`].

pub mod completions;
pub mod config;
pub mod ddd;
pub mod domain;
pub mod init;
pub mod serve;
pub mod service;
pub mod tidy;

use std::path::PathBuf;

use soliton_gen_adapters::{PortOptions, local_ports};
use soliton_gen_core::application::GeneratorPorts;
use soliton_gen_core::domain::{DeleteResult, FieldConfig, parse_fields};

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub global: GlobalArgs,
    pub config: AppConfig,
    pub output: OutputManager,
}

impl Context {
    pub fn new(global: GlobalArgs, config: AppConfig, output: OutputManager) -> Self {
        Self {
            global,
            config,
            output,
        }
    }

    /// Local filesystem, built-in (or overridden) templates, marker patcher.
    pub fn ports(&self) -> CliResult<GeneratorPorts> {
        let options = PortOptions {
            templates_dir: self.config.generator.templates_dir.clone(),
            manifest: self.config.generator.manifest,
        };
        Ok(local_ports(&options)?)
    }

    pub fn start_dir(&self) -> PathBuf {
        self.config.start_dir(self.global.dir.as_deref())
    }

    /// Interactive confirmation; `--yes`, `--quiet` and JSON output skip it.
    pub fn confirm(&self, prompt: &str, yes: bool) -> CliResult<()> {
        if yes || self.global.quiet || self.output.is_json() {
            return Ok(());
        }
        if ask(prompt)? {
            Ok(())
        } else {
            Err(CliError::Cancelled)
        }
    }
}

pub fn fields(spec: Option<&str>) -> Vec<FieldConfig> {
    spec.map(parse_fields).unwrap_or_default()
}

pub fn finish_delete(ctx: &Context, result: &DeleteResult) -> CliResult<()> {
    ctx.output.deletion(result)?;
    if result.success {
        Ok(())
    } else {
        Err(CliError::GenerationFailed {
            message: result.message.clone(),
            errors: result.errors.clone(),
        })
    }
}

#[cfg(feature = "interactive")]
fn ask(prompt: &str) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn ask(prompt: &str) -> CliResult<bool> {
    use std::io::{self, Write};

    print!("{prompt} [y/N] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input == "y" || input == "yes")
}
