//! Single-file DDD building blocks inside an existing domain.

use std::path::Path;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::application::ApplicationError;
use crate::application::ports::GeneratorPorts;
use crate::application::services::{ModuleSeed, recorder};
use crate::domain::wiring::{event_bus_edits, event_handler_module_edits};
use crate::domain::{
    ArtifactKind, EventConfig, EventData, EventHandlerConfig, EventHandlerData, FieldConfig,
    GenerationResult, ManifestEntry, PolicyConfig, PolicyData, ProjectLayout, SpecificationConfig,
    SpecificationData, TemplateId, ValueObjectConfig, ValueObjectData,
};
use crate::domain::config::require_name;
use crate::domain::naming::package_name;
use crate::error::{GenError, GenResult};

#[derive(Debug, Clone)]
pub struct DddGenerator {
    ports: GeneratorPorts,
}

impl DddGenerator {
    pub fn new(ports: GeneratorPorts) -> Self {
        Self { ports }
    }

    /// Resolves the layout and checks the target domain was generated.
    fn domain_layout(&self, start: &Path, domain: &str) -> GenResult<ProjectLayout> {
        require_name("domain", domain)?;
        let layout = self.ports.layout_resolver().resolve(start)?;
        let package = package_name(domain);
        if !self.ports.filesystem.is_dir(&layout.domain_package_dir(&package)) {
            return Err(GenError::not_found(format!("domain '{package}'")));
        }
        Ok(layout)
    }

    #[allow(clippy::too_many_arguments)]
    fn render_one<T: Serialize>(
        &self,
        layout: &ProjectLayout,
        kind: ArtifactKind,
        domain: &str,
        name: &str,
        template: TemplateId,
        data: &T,
        force: bool,
        preview: bool,
    ) -> GenResult<GenerationResult> {
        let path = kind.file_path(layout, domain, name)?;
        let mut result = GenerationResult::new();
        result.push(self.ports.file_generator().render(&path, template, data, force, preview));
        Ok(result)
    }

    fn finish(result: GenerationResult, label: &str, name: &str, preview: bool) -> GenerationResult {
        let message = if preview {
            format!("Preview of {label} {name}")
        } else {
            format!("{} {name} generated", capitalize(label))
        };
        info!(files = result.files.len(), "{message}");
        result.finish(message)
    }

    #[instrument(skip_all, fields(domain = %cfg.domain, name = %cfg.name, preview))]
    pub fn value_object(&self, start: &Path, cfg: &ValueObjectConfig, preview: bool) -> GenResult<GenerationResult> {
        cfg.validate()?;
        let layout = self.domain_layout(start, &cfg.domain)?;
        let data = ValueObjectData::build(cfg)?;
        let name = &data.value_object_name;

        let mut result = self.render_one(
            &layout,
            ArtifactKind::ValueObject,
            &cfg.domain,
            name,
            TemplateId::ValueObject,
            &data,
            cfg.force,
            preview,
        )?;
        recorder::record(
            &self.ports,
            &layout,
            preview,
            &mut result,
            ManifestEntry::new(ArtifactKind::ValueObject, Some(&cfg.domain), name)
                .with_fields(data.fields.iter().map(FieldConfig::from).collect()),
        );
        Ok(Self::finish(result, "value object", name, preview))
    }

    #[instrument(skip_all, fields(domain = %cfg.domain, name = %cfg.name, preview))]
    pub fn specification(&self, start: &Path, cfg: &SpecificationConfig, preview: bool) -> GenResult<GenerationResult> {
        cfg.validate()?;
        let layout = self.domain_layout(start, &cfg.domain)?;
        let data = SpecificationData::build(cfg);
        let name = &data.specification_name;

        let mut result = self.render_one(
            &layout,
            ArtifactKind::Specification,
            &cfg.domain,
            name,
            TemplateId::Specification,
            &data,
            cfg.force,
            preview,
        )?;
        recorder::record(
            &self.ports,
            &layout,
            preview,
            &mut result,
            ManifestEntry::new(ArtifactKind::Specification, Some(&cfg.domain), name)
                .with_target((!data.target_is_any).then(|| data.target_type.clone())),
        );
        Ok(Self::finish(result, "specification", name, preview))
    }

    #[instrument(skip_all, fields(domain = %cfg.domain, name = %cfg.name, preview))]
    pub fn policy(&self, start: &Path, cfg: &PolicyConfig, preview: bool) -> GenResult<GenerationResult> {
        cfg.validate()?;
        let layout = self.domain_layout(start, &cfg.domain)?;
        let data = PolicyData::build(cfg);
        let name = &data.policy_name;

        let mut result = self.render_one(
            &layout,
            ArtifactKind::Policy,
            &cfg.domain,
            name,
            TemplateId::Policy,
            &data,
            cfg.force,
            preview,
        )?;
        recorder::record(
            &self.ports,
            &layout,
            preview,
            &mut result,
            ManifestEntry::new(ArtifactKind::Policy, Some(&cfg.domain), name)
                .with_target((!data.target_is_any).then(|| data.target_type.clone())),
        );
        Ok(Self::finish(result, "policy", name, preview))
    }

    #[instrument(skip_all, fields(domain = %cfg.domain, name = %cfg.name, preview))]
    pub fn event(&self, start: &Path, cfg: &EventConfig, preview: bool) -> GenResult<GenerationResult> {
        cfg.validate()?;
        let layout = self.domain_layout(start, &cfg.domain)?;
        let data = EventData::build(cfg)?;
        let name = &data.event_struct_name;

        let mut result = self.render_one(
            &layout,
            ArtifactKind::Event,
            &cfg.domain,
            name,
            TemplateId::Event,
            &data,
            cfg.force,
            preview,
        )?;
        recorder::record(
            &self.ports,
            &layout,
            preview,
            &mut result,
            ManifestEntry::new(ArtifactKind::Event, Some(&cfg.domain), name)
                .with_topic(&data.event_topic)
                .with_fields(data.fields.iter().map(FieldConfig::from).collect()),
        );
        Ok(Self::finish(result, "event", name, preview))
    }

    /// Renders the handler, registers it in the application `module.go`
    /// and makes sure `cmd/main.go` provides an event bus.
    #[instrument(skip_all, fields(domain = %cfg.domain, event = %cfg.event_name, preview))]
    pub fn event_handler(&self, start: &Path, cfg: &EventHandlerConfig, preview: bool) -> GenResult<GenerationResult> {
        cfg.validate()?;
        let layout = self.domain_layout(start, &cfg.domain)?;
        let data = EventHandlerData::build(cfg, &layout);
        let name = &data.handler_name;

        let mut result = self.render_one(
            &layout,
            ArtifactKind::EventHandler,
            &cfg.domain,
            &data.event_struct_name,
            TemplateId::EventHandler,
            &data,
            cfg.force,
            preview,
        )?;
        recorder::record(
            &self.ports,
            &layout,
            preview,
            &mut result,
            ManifestEntry::new(ArtifactKind::EventHandler, Some(&cfg.domain), name)
                .with_topic(&data.event_topic),
        );

        self.register_handler(&layout, &data, preview, &mut result);
        Ok(Self::finish(result, "event handler", name, preview))
    }

    fn register_handler(
        &self,
        layout: &ProjectLayout,
        data: &EventHandlerData,
        preview: bool,
        result: &mut GenerationResult,
    ) {
        let mutator = self.ports.source_mutator();
        let module_go = layout.app_package_dir(&data.domain_package).join("module.go");
        let renderer = self.ports.renderer.clone();
        let seed = || -> GenResult<String> {
            let value = serde_json::to_value(ModuleSeed {
                package_name: &data.package_name,
            })
            .map_err(|e| ApplicationError::RenderingFailed {
                template: TemplateId::ServiceModule.to_string(),
                reason: e.to_string(),
            })?;
            renderer.render(TemplateId::ServiceModule, &value)
        };

        match mutator.ensure_file(&module_go, seed, &event_handler_module_edits(&data.handler_name), preview) {
            Ok(report) => {
                result.push(report.file);
                result.warnings.extend(report.warnings);
            }
            Err(err) => {
                warn!(error = %err, "Registering event handler failed");
                result.warn(format!("{}: could not register {}: {err}", module_go.display(), data.handler_name));
            }
        }

        let main_go = layout.main_go();
        if !self.ports.filesystem.is_file(&main_go) {
            return;
        }
        match mutator.patch_file(&main_go, &event_bus_edits(), preview) {
            Ok(report) => {
                result.push(report.file);
                result.warnings.extend(report.warnings);
            }
            Err(err) => {
                warn!(error = %err, "Providing event bus failed");
                result.warn(format!("{}: could not provide the event bus: {err}", main_go.display()));
            }
        }
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{Harness, shop};
    use crate::domain::{DomainError, FileStatus};

    fn with_order() -> Harness {
        let h = shop();
        h.fs.mkdir("/shop/internal/domain/order");
        h
    }

    #[test]
    fn missing_domain_is_not_found() {
        let h = shop();
        let cfg = PolicyConfig {
            domain: "order".into(),
            name: "Refund".into(),
            ..PolicyConfig::default()
        };
        let err = DddGenerator::new(h.ports.clone())
            .policy(Path::new("/shop"), &cfg, false)
            .unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::NotFound);
    }

    #[test]
    fn parent_directory_domain_is_rejected() {
        let h = with_order();
        let cfg = ValueObjectConfig {
            domain: "..".into(),
            name: "Money".into(),
            fields: vec![FieldConfig::new("amount", "int64")],
            force: true,
        };
        let err = DddGenerator::new(h.ports.clone())
            .value_object(Path::new("/shop"), &cfg, false)
            .unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::Validation);
        assert!(!h.fs.has("/shop/internal/domain/value_object_money.go"));
    }

    #[test]
    fn value_object_lands_in_domain_package() {
        let h = with_order();
        let cfg = ValueObjectConfig {
            domain: "order".into(),
            name: "shipping_address".into(),
            fields: vec![FieldConfig::new("street", "string")],
            force: false,
        };
        let result = DddGenerator::new(h.ports.clone())
            .value_object(Path::new("/shop"), &cfg, false)
            .unwrap();
        assert!(result.success);
        assert!(h.fs.has("/shop/internal/domain/order/value_object_shipping_address.go"));
        assert_eq!(result.message, "Value object ShippingAddress generated");
    }

    #[test]
    fn value_object_rejects_reserved_fields() {
        let h = with_order();
        let cfg = ValueObjectConfig {
            domain: "order".into(),
            name: "Money".into(),
            fields: vec![FieldConfig::new("id", "string")],
            force: false,
        };
        let err = DddGenerator::new(h.ports.clone())
            .value_object(Path::new("/shop"), &cfg, false)
            .unwrap_err();
        assert!(matches!(err, GenError::Domain(DomainError::ReservedField { .. })));
    }

    #[test]
    fn event_records_derived_topic() {
        let h = with_order();
        let cfg = EventConfig {
            domain: "order".into(),
            name: "OrderPaid".into(),
            ..EventConfig::default()
        };
        let generator = DddGenerator::new(h.ports.clone());
        generator.event(Path::new("/shop"), &cfg, false).unwrap();
        assert!(h.fs.has("/shop/internal/domain/order/event_order_paid.go"));

        let recorded = h.recorded();
        let entry = recorded
            .find(ArtifactKind::Event, Some("order"), "OrderPaidEvent")
            .unwrap();
        assert_eq!(entry.topic.as_deref(), Some("order.paid"));

        let again = generator.event(Path::new("/shop"), &cfg, false).unwrap();
        assert_eq!(again.files[0].status, FileStatus::Skip);
    }

    #[test]
    fn spec_records_target_only_when_typed() {
        let h = with_order();
        let generator = DddGenerator::new(h.ports.clone());
        let typed = SpecificationConfig {
            domain: "order".into(),
            name: "PaidOrder".into(),
            target: Some("*Order".into()),
            force: false,
        };
        let untyped = SpecificationConfig {
            name: "Anything".into(),
            target: None,
            ..typed.clone()
        };
        generator.specification(Path::new("/shop"), &typed, false).unwrap();
        generator.specification(Path::new("/shop"), &untyped, false).unwrap();

        let recorded = h.recorded();
        let typed = recorded.find(ArtifactKind::Specification, Some("order"), "PaidOrder").unwrap();
        assert_eq!(typed.target.as_deref(), Some("Order"));
        let untyped = recorded.find(ArtifactKind::Specification, Some("order"), "Anything").unwrap();
        assert_eq!(untyped.target, None);
    }

    #[test]
    fn event_handler_registers_in_module_and_main() {
        let h = with_order();
        h.fs.add(
            "/shop/cmd/main.go",
            "import (\n\t// soliton-gen:imports\n)\n\t\t// soliton-gen:providers\n",
        );
        let cfg = EventHandlerConfig {
            domain: "order".into(),
            event_name: "OrderPaid".into(),
            ..EventHandlerConfig::default()
        };
        let generator = DddGenerator::new(h.ports.clone());
        let result = generator.event_handler(Path::new("/shop"), &cfg, false).unwrap();

        let statuses: Vec<_> = result.files.iter().map(|f| f.status).collect();
        assert_eq!(statuses, [FileStatus::New, FileStatus::New, FileStatus::Overwrite]);
        assert!(h.fs.has("/shop/internal/application/order/event_handler_order_paid.go"));
        let module = h.fs.get("/shop/internal/application/order/module.go").unwrap();
        assert!(module.contains("fx.Provide(NewOrderPaidHandler),"));
        assert!(module.contains("fx.Invoke(RegisterOrderPaidHandler),"));
        let main = h.fs.get("/shop/cmd/main.go").unwrap();
        assert!(main.contains("event.NewLocalEventBus()"));

        let again = generator.event_handler(Path::new("/shop"), &cfg, false).unwrap();
        assert_eq!(again.count(FileStatus::Skip), 3);
    }

    #[test]
    fn preview_does_not_touch_disk() {
        let h = with_order();
        let cfg = EventHandlerConfig {
            domain: "order".into(),
            event_name: "Shipped".into(),
            ..EventHandlerConfig::default()
        };
        let result = DddGenerator::new(h.ports.clone())
            .event_handler(Path::new("/shop"), &cfg, true)
            .unwrap();
        assert!(result.files.iter().all(|f| f.content.is_some()));
        assert!(!h.fs.has("/shop/internal/application/order/module.go"));
        assert!(h.recorded().entries.is_empty());
    }
}
