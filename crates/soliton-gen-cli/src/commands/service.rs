//! `soliton-gen service`: application services.

use soliton_gen_core::application::{Catalog, ServiceGenerator};
use soliton_gen_core::domain::{ServiceConfig, ServiceType};

use super::{Context, finish_delete};
use crate::{
    cli::{ServiceArgs, ServiceCommands, ServiceGenerateArgs},
    error::{CliError, CliResult},
    output::check,
};

pub fn execute(args: ServiceArgs, ctx: &Context) -> CliResult<()> {
    match args.action {
        None => generate(args.generate, ctx),
        Some(ServiceCommands::List) => list(ctx),
        Some(ServiceCommands::Detect { name }) => detect(&name, ctx),
        Some(ServiceCommands::Delete(delete)) => {
            ctx.confirm(&format!("Delete service '{}'?", delete.name), delete.yes)?;
            let result = Catalog::new(ctx.ports()?).delete_service(&ctx.start_dir(), &delete.name)?;
            finish_delete(ctx, &result)
        }
    }
}

fn generate(mut args: ServiceGenerateArgs, ctx: &Context) -> CliResult<()> {
    let name = args.take_name().ok_or_else(|| CliError::InvalidInput {
        message: "a service name is required".into(),
    })?;
    let cfg = ServiceConfig {
        name,
        methods: args.methods.into_iter().filter(|m| !m.trim().is_empty()).collect(),
        force: args.mode.force,
        remark: args.remark,
    };
    let result = ServiceGenerator::new(ctx.ports()?).generate(&ctx.start_dir(), &cfg, args.mode.preview)?;
    ctx.output.generation(&result)?;
    check(&result)
}

fn list(ctx: &Context) -> CliResult<()> {
    let services = Catalog::new(ctx.ports()?).list_services(&ctx.start_dir())?;
    if ctx.output.is_json() {
        return ctx.output.json(&services);
    }
    if services.is_empty() {
        ctx.output.info("No services found")?;
        return Ok(());
    }
    ctx.output.header(&format!("{} service(s)", services.len()))?;
    for service in &services {
        let methods: Vec<&str> = service.methods.iter().map(|m| m.name.as_str()).collect();
        ctx.output.print(&format!(
            "  {:<24} {:<8} {}",
            service.name,
            type_label(service.service_type),
            methods.join(", ")
        ))?;
    }
    Ok(())
}

fn detect(name: &str, ctx: &Context) -> CliResult<()> {
    let detection = ServiceGenerator::new(ctx.ports()?).detect(&ctx.start_dir(), name)?;
    if ctx.output.is_json() {
        return ctx.output.json(&detection);
    }
    ctx.output.header(&detection.service_name)?;
    ctx.output
        .print(&format!("  type:       {}", type_label(detection.service_type)))?;
    ctx.output.print(&format!("  target:     {}", detection.target_dir))?;
    if let Some(dto) = &detection.existing_dto_path {
        ctx.output.print(&format!("  reuses DTO: {dto}"))?;
    }
    ctx.output.info(&detection.message)?;
    Ok(())
}

fn type_label(kind: ServiceType) -> &'static str {
    match kind {
        ServiceType::DomainService => "domain",
        ServiceType::CrossDomainService => "cross",
    }
}
