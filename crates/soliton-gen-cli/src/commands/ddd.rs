//! DDD building blocks: value objects, specs, policies, events and handlers.

use soliton_gen_core::application::{Catalog, DddGenerator};
use soliton_gen_core::domain::{
    ArtifactItem, ArtifactKind, EventConfig, EventHandlerConfig, PolicyConfig, SpecificationConfig,
    ValueObjectConfig,
};

use super::{Context, fields, finish_delete};
use crate::{
    cli::{ArtifactArg, DddCommands, EventArgs, EventHandlerArgs, TargetedArgs, ValueObjectArgs},
    error::CliResult,
    output::check,
};

impl From<ArtifactArg> for ArtifactKind {
    fn from(arg: ArtifactArg) -> Self {
        match arg {
            ArtifactArg::ValueObject => Self::ValueObject,
            ArtifactArg::Spec => Self::Specification,
            ArtifactArg::Policy => Self::Policy,
            ArtifactArg::Event => Self::Event,
            ArtifactArg::EventHandler => Self::EventHandler,
        }
    }
}

pub fn value_object(args: ValueObjectArgs, ctx: &Context) -> CliResult<()> {
    let cfg = ValueObjectConfig {
        domain: args.domain,
        name: args.name,
        fields: fields(args.fields.as_deref()),
        force: args.mode.force,
    };
    let result = DddGenerator::new(ctx.ports()?).value_object(&ctx.start_dir(), &cfg, args.mode.preview)?;
    ctx.output.generation(&result)?;
    check(&result)
}

pub fn specification(args: TargetedArgs, ctx: &Context) -> CliResult<()> {
    let cfg = SpecificationConfig {
        domain: args.domain,
        name: args.name,
        target: args.target,
        force: args.mode.force,
    };
    let result = DddGenerator::new(ctx.ports()?).specification(&ctx.start_dir(), &cfg, args.mode.preview)?;
    ctx.output.generation(&result)?;
    check(&result)
}

pub fn policy(args: TargetedArgs, ctx: &Context) -> CliResult<()> {
    let cfg = PolicyConfig {
        domain: args.domain,
        name: args.name,
        target: args.target,
        force: args.mode.force,
    };
    let result = DddGenerator::new(ctx.ports()?).policy(&ctx.start_dir(), &cfg, args.mode.preview)?;
    ctx.output.generation(&result)?;
    check(&result)
}

pub fn event(args: EventArgs, ctx: &Context) -> CliResult<()> {
    let cfg = EventConfig {
        domain: args.domain,
        name: args.name,
        fields: fields(args.fields.as_deref()),
        topic: args.topic,
        force: args.mode.force,
    };
    let result = DddGenerator::new(ctx.ports()?).event(&ctx.start_dir(), &cfg, args.mode.preview)?;
    ctx.output.generation(&result)?;
    check(&result)
}

pub fn event_handler(args: EventHandlerArgs, ctx: &Context) -> CliResult<()> {
    let cfg = EventHandlerConfig {
        domain: args.domain,
        event_name: args.event,
        topic: args.topic,
        force: args.mode.force,
    };
    let result = DddGenerator::new(ctx.ports()?).event_handler(&ctx.start_dir(), &cfg, args.mode.preview)?;
    ctx.output.generation(&result)?;
    check(&result)
}

/// `ddd list | rename | delete`.
pub fn execute(cmd: DddCommands, ctx: &Context) -> CliResult<()> {
    let catalog = Catalog::new(ctx.ports()?);
    let start = ctx.start_dir();
    match cmd {
        DddCommands::List { domain } => {
            let listing = catalog.list_artifacts(&start, &domain)?;
            if ctx.output.is_json() {
                return ctx.output.json(&listing);
            }
            ctx.output.header(&format!("Domain {domain}"))?;
            section(ctx, "Value objects", &listing.value_objects)?;
            section(ctx, "Specifications", &listing.specs)?;
            section(ctx, "Policies", &listing.policies)?;
            section(ctx, "Events", &listing.events)?;
            section(ctx, "Event handlers", &listing.event_handlers)?;
            Ok(())
        }
        DddCommands::Rename {
            domain,
            kind,
            name,
            new_name,
            force,
        } => {
            let result = catalog.rename_artifact(&start, &domain, kind.into(), &name, &new_name, force)?;
            ctx.output.generation(&result)?;
            check(&result)
        }
        DddCommands::Delete {
            domain,
            kind,
            name,
            yes,
        } => {
            let kind = ArtifactKind::from(kind);
            ctx.confirm(&format!("Delete {kind} '{name}' from domain '{domain}'?"), yes)?;
            let result = catalog.delete_artifact(&start, &domain, kind, &name)?;
            finish_delete(ctx, &result)
        }
    }
}

fn section(ctx: &Context, title: &str, items: &[ArtifactItem]) -> CliResult<()> {
    if items.is_empty() {
        return Ok(());
    }
    ctx.output.print(&format!("  {title}:"))?;
    for item in items {
        let mut line = format!("    {:<24} {}", item.name, item.file);
        if let Some(topic) = &item.topic {
            line.push_str(&format!("  topic={topic}"));
        }
        if let Some(target) = &item.target {
            line.push_str(&format!("  target={target}"));
        }
        ctx.output.print(&line)?;
    }
    Ok(())
}
