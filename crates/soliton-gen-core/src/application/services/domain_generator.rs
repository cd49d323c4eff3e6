//! Domain generation: the ten files of one aggregate plus optional wiring.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::application::ports::GeneratorPorts;
use crate::application::services::recorder;
use crate::domain::wiring::{
    detect_wire_mode, legacy_main_go_edits, main_go_edits, migrate_main_edits,
};
use crate::domain::{
    ArtifactKind, DomainConfig, EntityData, FieldConfig, GenerationResult, ManifestEntry, ProjectLayout,
    TemplateId, WireMode,
};
use crate::error::GenResult;

#[derive(Debug, Clone)]
pub struct DomainGenerator {
    ports: GeneratorPorts,
}

impl DomainGenerator {
    pub fn new(ports: GeneratorPorts) -> Self {
        Self { ports }
    }

    /// Renders entity, repository, events, repository implementation,
    /// commands, queries, DTOs, module, HTTP helpers and handler, in that
    /// order. `helpers.go` is shared by all domains and never replaced.
    ///
    /// Validation and layout failures return `Err` before anything is
    /// written; per-file failures are reported in the result.
    #[instrument(skip_all, fields(domain = %cfg.name, preview))]
    pub fn generate(&self, start: &Path, cfg: &DomainConfig, preview: bool) -> GenResult<GenerationResult> {
        cfg.validate()?;
        let layout = self.ports.layout_resolver().resolve(start)?;
        let data = EntityData::build(cfg, &layout)?;
        let files = self.ports.file_generator();

        let mut result = GenerationResult::new();
        for (path, template) in domain_files(&layout, &data.package_name) {
            if template == TemplateId::HttpHelpers {
                result.push(files.render_if_absent(&path, template, &data, preview));
            } else {
                result.push(files.render(&path, template, &data, cfg.force, preview));
            }
        }

        recorder::record(
            &self.ports,
            &layout,
            preview,
            &mut result,
            ManifestEntry::new(ArtifactKind::Domain, None, &data.entity_name)
                .with_fields(data.fields.iter().map(FieldConfig::from).collect())
                .with_remark(data.remark.clone()),
        );

        if cfg.wire {
            self.wire_into(&layout, &data, preview, &mut result);
        }

        let message = if preview {
            format!("Preview of domain {}", data.entity_name)
        } else {
            format!("Domain {} generated", data.entity_name)
        };
        info!(files = result.files.len(), "{message}");
        Ok(result.finish(message))
    }

    /// Registers an already generated domain in `cmd/main.go` and, when
    /// present, `cmd/migrate/main.go`.
    #[instrument(skip_all, fields(domain = %cfg.name, preview))]
    pub fn wire(&self, start: &Path, cfg: &DomainConfig, preview: bool) -> GenResult<GenerationResult> {
        cfg.validate()?;
        let layout = self.ports.layout_resolver().resolve(start)?;
        let data = EntityData::build(cfg, &layout)?;

        let mut result = GenerationResult::new();
        self.wire_into(&layout, &data, preview, &mut result);
        Ok(result.finish(format!("Domain {} wired", data.entity_name)))
    }

    /// Wiring never fails the operation; problems become warnings.
    fn wire_into(&self, layout: &ProjectLayout, data: &EntityData, preview: bool, result: &mut GenerationResult) {
        let mutator = self.ports.source_mutator();
        let main_go = layout.main_go();
        let entity = &data.entity_name;
        let package = &data.package_name;

        match self.ports.filesystem.read_to_string(&main_go) {
            Ok(content) => {
                let edits = match detect_wire_mode(&content) {
                    WireMode::Markers => Some(main_go_edits(entity, package, &layout.module_path)),
                    WireMode::Legacy => Some(legacy_main_go_edits(entity, package, &layout.module_path)),
                    WireMode::Unsupported => None,
                };
                match edits {
                    Some(edits) => match mutator.patch_file(&main_go, &edits, preview) {
                        Ok(report) => {
                            result.push(report.file);
                            result.warnings.extend(report.warnings);
                        }
                        Err(err) => {
                            warn!(error = %err, "Wiring main.go failed");
                            result.warn(format!("{}: wiring failed: {err}", main_go.display()));
                        }
                    },
                    None => result.warn(format!(
                        "{}: no soliton-gen markers or legacy placeholders; register {entity} by hand",
                        main_go.display()
                    )),
                }
            }
            Err(_) => result.warn(format!(
                "{} not found; register {entity} by hand",
                main_go.display()
            )),
        }

        let migrate = layout.migrate_main_go();
        if self.ports.filesystem.is_file(&migrate) {
            match mutator.patch_file(&migrate, &migrate_main_edits(package, &layout.module_path), preview) {
                Ok(report) => {
                    result.push(report.file);
                    result.warnings.extend(report.warnings);
                }
                Err(err) => {
                    warn!(error = %err, "Wiring migrate main failed");
                    result.warn(format!("{}: wiring failed: {err}", migrate.display()));
                }
            }
        }
    }
}

/// The generated files of one domain, in generation order.
pub fn domain_files(layout: &ProjectLayout, package: &str) -> Vec<(PathBuf, TemplateId)> {
    let domain = layout.domain_package_dir(package);
    let app = layout.app_package_dir(package);
    vec![
        (domain.join(format!("{package}.go")), TemplateId::Entity),
        (domain.join("repository.go"), TemplateId::Repository),
        (domain.join("events.go"), TemplateId::Events),
        (layout.infra_dir.join(format!("{package}_repo.go")), TemplateId::RepoImpl),
        (app.join("commands.go"), TemplateId::Commands),
        (app.join("queries.go"), TemplateId::Queries),
        (app.join("dto.go"), TemplateId::Dto),
        (app.join("module.go"), TemplateId::FxModule),
        (layout.interfaces_dir.join("helpers.go"), TemplateId::HttpHelpers),
        (
            layout.interfaces_dir.join(format!("{package}_handler.go")),
            TemplateId::Handler,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTemplateRenderer;
    use crate::application::services::test_support::{FakeFs, harness, shop};
    use crate::domain::{DomainError, FileStatus};
    use crate::error::GenError;
    use std::sync::Arc;

    fn widget() -> DomainConfig {
        DomainConfig {
            fields: vec![FieldConfig::new("Price", "int64")],
            ..DomainConfig::new("Widget")
        }
    }

    #[test]
    fn upper_case_id_field_is_reserved() {
        let h = shop();
        let cfg = DomainConfig {
            fields: vec![FieldConfig::new("ID", "string")],
            ..DomainConfig::new("Widget")
        };
        let err = DomainGenerator::new(h.ports.clone())
            .generate(Path::new("/shop"), &cfg, false)
            .unwrap_err();
        assert!(matches!(err, GenError::Domain(DomainError::ReservedField { .. })));
        assert!(!h.fs.has("/shop/internal/domain/widget/widget.go"));
    }

    #[test]
    fn fresh_domain_writes_ten_new_files() {
        let h = shop();
        let result = DomainGenerator::new(h.ports.clone())
            .generate(Path::new("/shop"), &widget(), false)
            .unwrap();

        assert!(result.success);
        assert_eq!(result.files.len(), 10);
        assert_eq!(result.count(FileStatus::New), 10);
        assert!(result.files.iter().all(|f| f.content.is_none()));
        assert!(h.fs.has("/shop/internal/domain/widget/widget.go"));
        assert!(h.fs.has("/shop/internal/infrastructure/persistence/widget_repo.go"));
        assert!(h.fs.has("/shop/internal/interfaces/http/widget_handler.go"));
        assert_eq!(result.message, "Domain Widget generated");
    }

    #[test]
    fn second_run_skips_everything() {
        let h = shop();
        let generator = DomainGenerator::new(h.ports.clone());
        generator.generate(Path::new("/shop"), &widget(), false).unwrap();
        let before = h.fs.get("/shop/internal/domain/widget/widget.go");

        let again = generator.generate(Path::new("/shop"), &widget(), false).unwrap();
        assert_eq!(again.count(FileStatus::Skip), 10);
        assert_eq!(h.fs.get("/shop/internal/domain/widget/widget.go"), before);
    }

    #[test]
    fn force_overwrites_all_but_helpers() {
        let h = shop();
        let generator = DomainGenerator::new(h.ports.clone());
        generator.generate(Path::new("/shop"), &widget(), false).unwrap();

        let forced = DomainConfig {
            force: true,
            ..widget()
        };
        let result = generator.generate(Path::new("/shop"), &forced, false).unwrap();
        assert_eq!(result.count(FileStatus::Overwrite), 9);
        assert_eq!(result.files[8].status, FileStatus::Skip);
    }

    #[test]
    fn existing_helpers_are_skipped_on_first_run() {
        let h = shop();
        h.fs.add("/shop/internal/interfaces/http/helpers.go", "package http\n");
        let result = DomainGenerator::new(h.ports.clone())
            .generate(Path::new("/shop"), &widget(), false)
            .unwrap();
        assert_eq!(result.count(FileStatus::New), 9);
        assert_eq!(result.files[8].status, FileStatus::Skip);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn preview_writes_nothing_and_returns_content() {
        let h = shop();
        let result = DomainGenerator::new(h.ports.clone())
            .generate(Path::new("/shop"), &widget(), true)
            .unwrap();
        assert!(result.files.iter().all(|f| f.content.is_some()));
        assert!(!h.fs.has("/shop/internal/domain/widget/widget.go"));
        assert!(h.recorded().entries.is_empty());
    }

    #[test]
    fn invalid_config_fails_before_any_write() {
        let h = shop();
        let cfg = DomainConfig {
            fields: vec![FieldConfig::new("Price", "money")],
            ..DomainConfig::new("Widget")
        };
        let err = DomainGenerator::new(h.ports.clone())
            .generate(Path::new("/shop"), &cfg, false)
            .unwrap_err();
        assert!(matches!(
            err,
            GenError::Domain(DomainError::UnsupportedFieldType { .. })
        ));
        assert!(!h.fs.has("/shop/internal/domain/widget"));
    }

    #[test]
    fn missing_layout_is_fatal() {
        let h = harness(Arc::new(FakeFs::default()));
        let err = DomainGenerator::new(h.ports.clone())
            .generate(Path::new("/nowhere"), &widget(), false)
            .unwrap_err();
        assert!(matches!(err, GenError::Domain(DomainError::LayoutNotFound { .. })));
    }

    #[test]
    fn render_failure_marks_file_as_error_and_continues() {
        let h = shop();
        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render().returning(|template, _| {
            if template == TemplateId::Queries {
                Err(crate::application::ApplicationError::RenderingFailed {
                    template: template.to_string(),
                    reason: "boom".into(),
                }
                .into())
            } else {
                Ok("package x\n".into())
            }
        });
        let mut ports = h.ports.clone();
        ports.renderer = Arc::new(renderer);

        let result = DomainGenerator::new(ports)
            .generate(Path::new("/shop"), &widget(), false)
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.count(FileStatus::Error), 1);
        assert_eq!(result.count(FileStatus::New), 9);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn manifest_records_domain_once() {
        let h = shop();
        let generator = DomainGenerator::new(h.ports.clone());
        generator.generate(Path::new("/shop"), &widget(), false).unwrap();
        let recorded = h.recorded();
        let entry = recorded.find(ArtifactKind::Domain, None, "Widget").unwrap();
        assert_eq!(entry.files.len(), 10);
        assert_eq!(entry.files[0], "internal/domain/widget/widget.go");
        assert_eq!(entry.fields[0].name, "Price");
    }

    #[test]
    fn wiring_patches_marker_main_once() {
        let h = shop();
        h.fs.add(
            "/shop/cmd/main.go",
            "import (\n\t// soliton-gen:imports\n)\n\t\t// soliton-gen:modules\n\t\t// soliton-gen:handlers\n\t\t// soliton-gen:routes\n",
        );
        let cfg = DomainConfig {
            wire: true,
            ..widget()
        };
        let generator = DomainGenerator::new(h.ports.clone());
        let first = generator.generate(Path::new("/shop"), &cfg, false).unwrap();
        let main = first.files.last().unwrap();
        assert_eq!(main.path, PathBuf::from("/shop/cmd/main.go"));
        assert_eq!(main.status, FileStatus::Overwrite);
        let wired = h.fs.get("/shop/cmd/main.go").unwrap();
        assert!(wired.contains("widgetapp.Module,"));

        let second = generator.wire(Path::new("/shop"), &cfg, false).unwrap();
        assert_eq!(second.files[0].status, FileStatus::Skip);
        assert_eq!(h.fs.get("/shop/cmd/main.go").unwrap(), wired);
    }

    #[test]
    fn unsupported_main_is_a_warning() {
        let h = shop();
        h.fs.add("/shop/cmd/main.go", "package main\n");
        let cfg = DomainConfig {
            wire: true,
            ..widget()
        };
        let result = DomainGenerator::new(h.ports.clone())
            .generate(Path::new("/shop"), &cfg, false)
            .unwrap();
        assert!(result.success);
        assert_eq!(result.files.len(), 10);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(h.fs.get("/shop/cmd/main.go").unwrap(), "package main\n");
    }
}
