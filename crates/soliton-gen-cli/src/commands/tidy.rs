//! `soliton-gen tidy`: run `go mod tidy` in the resolved module.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use soliton_gen_core::application::ProjectGenerator;

use super::Context;
use crate::error::CliResult;

pub fn execute(ctx: &Context) -> CliResult<()> {
    let generator = ProjectGenerator::new(ctx.ports()?);
    let spinner = spinner(ctx);

    let outcome = generator.tidy(&ctx.start_dir());
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let output = outcome?;

    if ctx.output.is_json() {
        return ctx.output.json(&serde_json::json!({ "success": true, "output": output }));
    }
    if !output.trim().is_empty() {
        ctx.output.print(output.trim_end())?;
    }
    ctx.output.success("Dependencies tidied")?;
    Ok(())
}

fn spinner(ctx: &Context) -> Option<ProgressBar> {
    if ctx.global.quiet || !ctx.output.supports_color() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
    pb.set_message("Running go mod tidy...");
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}
