//! Runs the `go` binary.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, instrument, warn};

use soliton_gen_core::application::ApplicationError;
use soliton_gen_core::application::ports::Toolchain;
use soliton_gen_core::error::GenResult;

const TIDY: &str = "go mod tidy";

/// [`Toolchain`] backed by a `go` executable. Commands run with
/// `GOWORK=off` so a surrounding `go.work` does not leak into the module.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    binary: PathBuf,
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("go"),
        }
    }
}

impl GoToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Toolchain for GoToolchain {
    #[instrument(skip(self), fields(module_dir = %module_dir.display()))]
    fn tidy(&self, module_dir: &Path) -> GenResult<String> {
        let output = Command::new(&self.binary)
            .args(["mod", "tidy"])
            .current_dir(module_dir)
            .env("GOWORK", "off")
            .output()
            .map_err(|e| ApplicationError::ExternalCommand {
                command: TIDY.into(),
                reason: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = format!("{stdout}{stderr}").trim().to_string();

        if !output.status.success() {
            warn!(status = %output.status, "go mod tidy failed");
            return Err(ApplicationError::ExternalCommand {
                command: TIDY.into(),
                reason: if combined.is_empty() {
                    output.status.to_string()
                } else {
                    combined
                },
            }
            .into());
        }

        debug!(bytes = combined.len(), "go mod tidy finished");
        Ok(combined)
    }
}
