//! `soliton-gen domain`: generate, list, show, wire and delete domains.

use tracing::instrument;

use soliton_gen_core::application::{Catalog, DomainGenerator};
use soliton_gen_core::domain::DomainConfig;

use super::{Context, fields, finish_delete};
use crate::{
    cli::{DomainArgs, DomainCommands, DomainGenerateArgs},
    error::{CliError, CliResult},
    output::check,
};

pub fn execute(args: DomainArgs, ctx: &Context) -> CliResult<()> {
    match args.action {
        None => generate(args.generate, ctx),
        Some(DomainCommands::List) => list(ctx),
        Some(DomainCommands::Show { name }) => show(&name, ctx),
        Some(DomainCommands::Wire { name, preview }) => wire(name, preview, ctx),
        Some(DomainCommands::Delete(delete)) => {
            ctx.confirm(
                &format!("Delete domain '{}' and unwire it from cmd/main.go?", delete.name),
                delete.yes,
            )?;
            let result = Catalog::new(ctx.ports()?).delete_domain(&ctx.start_dir(), &delete.name)?;
            finish_delete(ctx, &result)
        }
    }
}

#[instrument(
    skip_all,
    fields(domain = args.name.as_deref().or(args.name_flag.as_deref()).unwrap_or_default())
)]
fn generate(mut args: DomainGenerateArgs, ctx: &Context) -> CliResult<()> {
    let name = args.take_name().ok_or_else(|| CliError::InvalidInput {
        message: "a domain name is required".into(),
    })?;
    let cfg = DomainConfig {
        name,
        fields: fields(args.fields.as_deref()),
        table_name: args.table,
        route_base: args.route,
        soft_delete: args.soft_delete,
        wire: args.wire,
        force: args.mode.force,
        remark: args.remark,
    };

    let result = DomainGenerator::new(ctx.ports()?).generate(&ctx.start_dir(), &cfg, args.mode.preview)?;
    ctx.output.generation(&result)?;
    check(&result)
}

fn wire(name: String, preview: bool, ctx: &Context) -> CliResult<()> {
    let result = DomainGenerator::new(ctx.ports()?).wire(&ctx.start_dir(), &DomainConfig::new(name), preview)?;
    ctx.output.generation(&result)?;
    check(&result)
}

fn list(ctx: &Context) -> CliResult<()> {
    let domains = Catalog::new(ctx.ports()?).list_domains(&ctx.start_dir())?;
    if ctx.output.is_json() {
        return ctx.output.json(&domains);
    }
    if domains.is_empty() {
        ctx.output.info("No domains found")?;
        return Ok(());
    }
    ctx.output.header(&format!("{} domain(s)", domains.len()))?;
    for domain in &domains {
        let remark = domain
            .remark
            .as_deref()
            .map(|r| format!("  # {r}"))
            .unwrap_or_default();
        ctx.output.print(&format!(
            "  {:<20} {:<14} {}{remark}",
            domain.name,
            domain.package,
            domain.fields.join(", ")
        ))?;
    }
    Ok(())
}

fn show(name: &str, ctx: &Context) -> CliResult<()> {
    let detail = Catalog::new(ctx.ports()?).domain_detail(&ctx.start_dir(), name)?;
    if ctx.output.is_json() {
        return ctx.output.json(&detail);
    }
    ctx.output.header(&format!("{} ({})", detail.name, detail.package))?;
    if let Some(table) = &detail.table_name {
        ctx.output.print(&format!("  table: {table}"))?;
    }
    if let Some(remark) = &detail.remark {
        ctx.output.print(&format!("  remark: {remark}"))?;
    }
    for field in &detail.fields {
        let values = if field.enum_values.is_empty() {
            String::new()
        } else {
            format!(" ({})", field.enum_values.join("|"))
        };
        ctx.output
            .print(&format!("  {:<20} {}{values}", field.name, field.type_name))?;
    }
    Ok(())
}
