//! `soliton-gen init`: create a new project skeleton.

use tracing::instrument;

use soliton_gen_core::application::ProjectGenerator;
use soliton_gen_core::domain::ProjectConfig;

use super::Context;
use crate::{cli::InitArgs, error::CliResult, output::check};

/// Creates `<dir>/<name>`; flags win over `[project]` config values.
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(args: InitArgs, ctx: &Context) -> CliResult<()> {
    let defaults = &ctx.config.project;
    let cfg = ProjectConfig {
        name: args.name,
        module_name: args.module,
        framework_version: args.framework_version.or_else(|| defaults.framework_version.clone()),
        framework_replace: args.framework_replace,
        go_version: defaults.go_version.clone(),
    };

    let parent = ctx.start_dir();
    let result = ProjectGenerator::new(ctx.ports()?)
        .with_module_prefix(defaults.module_prefix.clone())
        .init(&cfg, &parent, args.preview)?;
    ctx.output.generation(&result)?;
    check(&result)?;

    if !args.preview && !ctx.output.is_json() {
        ctx.output.print("")?;
        ctx.output.print("Next steps:")?;
        ctx.output.print(&format!("  cd {}", parent.join(&cfg.name).display()))?;
        ctx.output.print("  soliton-gen domain <Name> -f \"field:type,...\" --wire")?;
        ctx.output.print("  soliton-gen tidy")?;
    }
    Ok(())
}
