//! Application service generation.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::application::ApplicationError;
use crate::application::ports::GeneratorPorts;
use crate::application::services::{ModuleSeed, recorder};
use crate::domain::wiring::service_module_edits;
use crate::domain::{
    ArtifactKind, GenerationResult, ManifestEntry, ProjectLayout, ServiceConfig, ServiceData,
    ServiceDetection, ServiceType, TemplateId,
};
use crate::error::GenResult;

#[derive(Debug, Clone)]
pub struct ServiceGenerator {
    ports: GeneratorPorts,
}

impl ServiceGenerator {
    pub fn new(ports: GeneratorPorts) -> Self {
        Self { ports }
    }

    /// Writes `service.go` and `service_dto.go` into the application package
    /// named after the service, then registers the constructor in that
    /// package's `module.go`, creating it when missing.
    ///
    /// The domain's own `dto.go` is never touched.
    #[instrument(skip_all, fields(service = %cfg.name, preview))]
    pub fn generate(&self, start: &Path, cfg: &ServiceConfig, preview: bool) -> GenResult<GenerationResult> {
        cfg.validate()?;
        let layout = self.ports.layout_resolver().resolve(start)?;
        let mut data = ServiceData::build(cfg, &layout)?;
        data.domain_exists = self
            .ports
            .filesystem
            .is_dir(&layout.domain_package_dir(&data.domain_package));

        let files = self.ports.file_generator();
        let app_dir = layout.app_package_dir(&data.domain_package);

        let mut result = GenerationResult::new();
        result.push(files.render(&app_dir.join("service.go"), TemplateId::Service, &data, cfg.force, preview));
        result.push(files.render(
            &app_dir.join("service_dto.go"),
            TemplateId::ServiceDto,
            &data,
            cfg.force,
            preview,
        ));

        recorder::record(
            &self.ports,
            &layout,
            preview,
            &mut result,
            ManifestEntry::new(ArtifactKind::Service, None, &data.service_name)
                .with_methods(data.methods.iter().map(|m| m.name.clone()).collect())
                .with_remark(data.remark.clone()),
        );

        self.register(&app_dir.join("module.go"), &data, preview, &mut result);

        let message = if preview {
            format!("Preview of service {}", data.service_name)
        } else {
            format!("Service {} generated", data.service_name)
        };
        info!(files = result.files.len(), "{message}");
        Ok(result.finish(message))
    }

    fn register(&self, module_go: &Path, data: &ServiceData, preview: bool, result: &mut GenerationResult) {
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

        match self.ports.source_mutator().ensure_file(
            module_go,
            seed,
            &service_module_edits(&data.service_name),
            preview,
        ) {
            Ok(report) => {
                result.push(report.file);
                result.warnings.extend(report.warnings);
            }
            Err(err) => {
                warn!(error = %err, "Registering service failed");
                result.warn(format!(
                    "{}: could not register New{}: {err}",
                    module_go.display(),
                    data.service_name
                ));
            }
        }
    }

    /// Reports where `generate` would put a service and whether the
    /// package already has domain DTOs.
    #[instrument(skip_all, fields(service = name))]
    pub fn detect(&self, start: &Path, name: &str) -> GenResult<ServiceDetection> {
        let cfg = ServiceConfig::new(name);
        cfg.validate()?;
        let layout = self.ports.layout_resolver().resolve(start)?;
        let data = ServiceData::build(&cfg, &layout)?;
        Ok(detection(&self.ports, &layout, &data))
    }
}

fn detection(ports: &GeneratorPorts, layout: &ProjectLayout, data: &ServiceData) -> ServiceDetection {
    let domain = &data.domain_package;
    let domain_exists = ports.filesystem.is_dir(&layout.domain_package_dir(domain));
    let dto: PathBuf = layout.app_package_dir(domain).join("dto.go");
    let dto_exists = domain_exists && ports.filesystem.is_file(&dto);
    let target_dir = format!("internal/application/{domain}");

    let (service_type, message) = match (domain_exists, dto_exists) {
        (true, true) => (
            ServiceType::DomainService,
            format!("Domain {domain} exists; generating into {target_dir}/service.go and reusing its DTOs"),
        ),
        (true, false) => (
            ServiceType::DomainService,
            format!("Domain {domain} exists; generating into {target_dir}/service.go"),
        ),
        (false, _) => (
            ServiceType::CrossDomainService,
            format!("No domain {domain}; generating a cross-domain service into {target_dir}/service.go"),
        ),
    };

    ServiceDetection {
        service_name: data.service_name.clone(),
        domain_name: domain.clone(),
        domain_exists,
        service_type,
        target_dir,
        should_reuse_dto: dto_exists,
        existing_dto_path: dto_exists.then(|| layout.relative(&dto).display().to_string()),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::shop;
    use crate::domain::FileStatus;

    #[test]
    fn service_files_and_module_are_created() {
        let h = shop();
        let mut cfg = ServiceConfig::new("Payment");
        cfg.methods = vec!["Authorize,Capture".into()];
        let result = ServiceGenerator::new(h.ports.clone())
            .generate(Path::new("/shop"), &cfg, false)
            .unwrap();

        assert!(result.success, "{result:?}");
        let statuses: Vec<_> = result.files.iter().map(|f| f.status).collect();
        assert_eq!(statuses, [FileStatus::New, FileStatus::New, FileStatus::New]);
        let module = h.fs.get("/shop/internal/application/payment/module.go").unwrap();
        assert!(module.contains("fx.Provide(NewPaymentService),"));
        assert!(module.contains("paymentapp"));
        assert!(!h.fs.has("/shop/internal/application/payment/dto.go"));

        let recorded = h.recorded();
        let entry = recorded.find(ArtifactKind::Service, None, "PaymentService").unwrap();
        assert_eq!(entry.methods, ["Authorize", "Capture"]);
        assert_eq!(entry.files.len(), 2);
    }

    #[test]
    fn existing_module_is_patched_once() {
        let h = shop();
        h.fs.add(
            "/shop/internal/application/order/module.go",
            "var Module = fx.Options(\n\t// soliton-gen:services\n)\n",
        );
        let generator = ServiceGenerator::new(h.ports.clone());
        let cfg = ServiceConfig::new("OrderService");

        let first = generator.generate(Path::new("/shop"), &cfg, false).unwrap();
        assert_eq!(first.files[2].status, FileStatus::Overwrite);
        let second = generator.generate(Path::new("/shop"), &cfg, false).unwrap();
        assert_eq!(second.count(FileStatus::Skip), 3);
        let module = h.fs.get("/shop/internal/application/order/module.go").unwrap();
        assert_eq!(module.matches("NewOrderService").count(), 1);
    }

    #[test]
    fn bare_service_name_is_rejected() {
        let h = shop();
        assert!(
            ServiceGenerator::new(h.ports.clone())
                .generate(Path::new("/shop"), &ServiceConfig::new("Service"), false)
                .is_err()
        );
    }

    #[test]
    fn detection_distinguishes_domain_and_cross_domain() {
        let h = shop();
        let generator = ServiceGenerator::new(h.ports.clone());

        let cross = generator.detect(Path::new("/shop"), "Checkout").unwrap();
        assert_eq!(cross.service_type, ServiceType::CrossDomainService);
        assert!(!cross.should_reuse_dto);
        assert_eq!(cross.target_dir, "internal/application/checkout");

        h.fs.mkdir("/shop/internal/domain/order");
        h.fs.add("/shop/internal/application/order/dto.go", "package orderapp\n");
        let domain = generator.detect(Path::new("/shop"), "OrderService").unwrap();
        assert_eq!(domain.service_type, ServiceType::DomainService);
        assert!(domain.should_reuse_dto);
        assert_eq!(
            domain.existing_dto_path.as_deref(),
            Some("internal/application/order/dto.go")
        );
    }
}
