//! Listing, inspecting, deleting and renaming generated artifacts.
//!
//! Names, remarks, targets and topics come from the manifest when it has
//! an entry for the file; everything else, and every artifact generated
//! before the manifest existed, is read back from the Go source.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::application::ApplicationError;
use crate::application::ports::GeneratorPorts;
use crate::application::services::domain_generator::domain_files;
use crate::application::services::recorder;
use crate::domain::config::require_name;
use crate::domain::naming::{
    event_base_name, event_handler_name, normalize_event_struct_name, normalize_service_name,
    package_name, to_pascal_case,
};
use crate::domain::readback::{
    parse_domain_remark, parse_entity_fields, parse_entity_name, parse_event_handler_summary,
    parse_event_struct_name, parse_event_topic, parse_service_methods, parse_service_remark,
    parse_service_struct_name, parse_struct_fields, parse_table_name, parse_target_type,
};
use crate::domain::wiring::{
    remove_event_handler_edits, remove_service_edits, rename_event_handler_edits,
    unwire_main_go_edits, unwire_migrate_main_edits,
};
use crate::domain::{
    ArtifactDetail, ArtifactItem, ArtifactKind, ArtifactListing, ArtifactSource, DeleteResult,
    DomainDetail, DomainFiles, DomainSummary, Edit, FileStatus, GeneratedFile, GenerationResult,
    Manifest, ManifestEntry, ProjectLayout, ServiceInfo, ServiceType, TemplateId,
};
use crate::error::{GenError, GenResult};

#[derive(Debug, Clone)]
pub struct Catalog {
    ports: GeneratorPorts,
}

impl Catalog {
    pub fn new(ports: GeneratorPorts) -> Self {
        Self { ports }
    }

    fn read(&self, path: &Path) -> Option<String> {
        self.ports
            .filesystem
            .is_file(path)
            .then(|| self.ports.filesystem.read_to_string(path).ok())
            .flatten()
    }

    /// Sub-directories of `dir`, hidden ones excluded.
    fn subdirs(&self, dir: &Path) -> Vec<String> {
        self.ports
            .filesystem
            .read_dir(dir)
            .unwrap_or_default()
            .into_iter()
            .filter(|e| e.is_dir && !e.name.starts_with('.'))
            .map(|e| e.name)
            .collect()
    }

    /// `.go` files in `dir` starting with `prefix`.
    fn go_files(&self, dir: &Path, prefix: &str) -> Vec<String> {
        self.ports
            .filesystem
            .read_dir(dir)
            .unwrap_or_default()
            .into_iter()
            .filter(|e| !e.is_dir && e.name.starts_with(prefix) && e.name.ends_with(".go"))
            .map(|e| e.name)
            .collect()
    }

    fn existing_domain(&self, layout: &ProjectLayout, domain: &str) -> GenResult<String> {
        require_name("domain", domain)?;
        let package = package_name(domain);
        if !self.ports.filesystem.is_dir(&layout.domain_package_dir(&package)) {
            return Err(GenError::not_found(format!("domain '{package}'")));
        }
        Ok(package)
    }

    // ── Domains ──────────────────────────────────────────────────────────

    #[instrument(skip_all)]
    pub fn list_domains(&self, start: &Path) -> GenResult<Vec<DomainSummary>> {
        let layout = self.ports.layout_resolver().resolve(start)?;
        let manifest = recorder::load_or_default(&self.ports, &layout);

        let domains = self
            .subdirs(&layout.domain_dir)
            .into_iter()
            .map(|package| {
                let dir = layout.domain_package_dir(&package);
                let content = self.read(&dir.join(format!("{package}.go"))).unwrap_or_default();
                let entry = domain_entry(&manifest, &package);
                let name = entry
                    .map(|e| e.name.clone())
                    .or_else(|| parse_entity_name(&content, &package))
                    .unwrap_or_else(|| to_pascal_case(&package));
                let fields = match entry {
                    Some(e) if !e.fields.is_empty() => e.fields.iter().map(|f| f.name.clone()).collect(),
                    _ => parse_entity_fields(&content, &name)
                        .into_iter()
                        .map(|f| f.name)
                        .collect(),
                };
                DomainSummary {
                    has_repository: self.ports.filesystem.is_file(&dir.join("repository.go")),
                    remark: entry
                        .and_then(|e| e.remark.clone())
                        .or_else(|| parse_domain_remark(&content)),
                    module_path: layout.module_path.clone(),
                    name,
                    package,
                    fields,
                }
            })
            .collect();
        Ok(domains)
    }

    #[instrument(skip_all, fields(domain = name))]
    pub fn domain_detail(&self, start: &Path, name: &str) -> GenResult<DomainDetail> {
        let layout = self.ports.layout_resolver().resolve(start)?;
        let package = self.existing_domain(&layout, name)?;
        let manifest = recorder::load_or_default(&self.ports, &layout);
        let entry = domain_entry(&manifest, &package);

        let paths = domain_files(&layout, &package);
        let content = self.read(&paths[0].0).unwrap_or_default();
        let entity = entry
            .map(|e| e.name.clone())
            .or_else(|| parse_entity_name(&content, &package))
            .unwrap_or_else(|| to_pascal_case(&package));

        let exists = |template: TemplateId| {
            paths
                .iter()
                .find(|(_, t)| *t == template)
                .is_some_and(|(path, _)| self.ports.filesystem.is_file(path))
        };

        Ok(DomainDetail {
            fields: parse_entity_fields(&content, &entity),
            table_name: parse_table_name(&content),
            remark: entry
                .and_then(|e| e.remark.clone())
                .or_else(|| parse_domain_remark(&content)),
            files: DomainFiles {
                entity: exists(TemplateId::Entity),
                repository: exists(TemplateId::Repository),
                events: exists(TemplateId::Events),
                repo_impl: exists(TemplateId::RepoImpl),
                commands: exists(TemplateId::Commands),
                queries: exists(TemplateId::Queries),
                dto: exists(TemplateId::Dto),
                module: exists(TemplateId::FxModule),
                handler: exists(TemplateId::Handler),
            },
            name: entity,
            package,
        })
    }

    /// Removes the domain and application packages, the repository
    /// implementation and HTTP handler, then unwires the entry points.
    /// The shared `helpers.go` stays.
    #[instrument(skip_all, fields(domain = name))]
    pub fn delete_domain(&self, start: &Path, name: &str) -> GenResult<DeleteResult> {
        let layout = self.ports.layout_resolver().resolve(start)?;
        let package = self.existing_domain(&layout, name)?;
        let manifest = recorder::load_or_default(&self.ports, &layout);
        let entity_file = layout.domain_package_dir(&package).join(format!("{package}.go"));
        let entity = domain_entry(&manifest, &package)
            .map(|e| e.name.clone())
            .or_else(|| self.read(&entity_file).and_then(|c| parse_entity_name(&c, &package)))
            .unwrap_or_else(|| to_pascal_case(&package));

        let mut result = DeleteResult::default();
        self.remove_dir(&layout, &layout.domain_package_dir(&package), &mut result);
        self.remove_dir(&layout, &layout.app_package_dir(&package), &mut result);
        self.remove_file(&layout, &layout.infra_dir.join(format!("{package}_repo.go")), &mut result);
        self.remove_file(
            &layout,
            &layout.interfaces_dir.join(format!("{package}_handler.go")),
            &mut result,
        );

        self.unwire(&layout, &layout.main_go(), &unwire_main_go_edits(&entity, &package), &mut result);
        self.unwire(&layout, &layout.migrate_main_go(), &unwire_migrate_main_edits(&package), &mut result);

        if let Err(err) = recorder::update(&self.ports, &layout, |m| {
            m.entries.retain(|e| !(e.kind == ArtifactKind::Service && service_package(&e.name) == package));
            m.remove_domain(&package)
        }) {
            warn!(error = %err, "Could not update manifest");
        }

        let message = if result.errors.is_empty() {
            format!("Domain {entity} deleted")
        } else {
            format!("Domain {entity} partially deleted")
        };
        info!(items = result.deleted_items.len(), "{message}");
        Ok(result.finish(message))
    }

    fn remove_dir(&self, layout: &ProjectLayout, path: &Path, result: &mut DeleteResult) {
        if !self.ports.filesystem.is_dir(path) {
            return;
        }
        match self.ports.filesystem.remove_dir_all(path) {
            Ok(()) => result.deleted_items.push(layout.relative(path).display().to_string()),
            Err(err) => result.errors.push(err.to_string()),
        }
    }

    fn remove_file(&self, layout: &ProjectLayout, path: &Path, result: &mut DeleteResult) {
        if !self.ports.filesystem.is_file(path) {
            return;
        }
        match self.ports.filesystem.remove_file(path) {
            Ok(()) => result.deleted_items.push(layout.relative(path).display().to_string()),
            Err(err) => result.errors.push(err.to_string()),
        }
    }

    /// Applies a removal plan when the file exists. Failures are errors of
    /// the delete, missing lines are not.
    fn unwire(&self, layout: &ProjectLayout, path: &Path, edits: &[Edit], result: &mut DeleteResult) {
        if !self.ports.filesystem.is_file(path) {
            return;
        }
        match self.ports.source_mutator().patch_file(path, edits, false) {
            Ok(report) if report.file.status == FileStatus::Overwrite => result
                .deleted_items
                .push(format!("{} wiring", layout.relative(path).display())),
            Ok(_) => {}
            Err(err) => result.errors.push(err.to_string()),
        }
    }

    // ── Services ─────────────────────────────────────────────────────────

    fn service_info(&self, layout: &ProjectLayout, package: &str, content: &str, manifest: &Manifest) -> ServiceInfo {
        let name = parse_service_struct_name(content)
            .unwrap_or_else(|| normalize_service_name(package));
        let remark = parse_service_remark(content).or_else(|| {
            manifest
                .find(ArtifactKind::Service, None, &name)
                .and_then(|e| e.remark.clone())
        });
        let service_type = if self.ports.filesystem.is_dir(&layout.domain_package_dir(package)) {
            ServiceType::DomainService
        } else {
            ServiceType::CrossDomainService
        };
        ServiceInfo {
            methods: parse_service_methods(content),
            name,
            remark,
            service_type,
        }
    }

    #[instrument(skip_all)]
    pub fn list_services(&self, start: &Path) -> GenResult<Vec<ServiceInfo>> {
        let layout = self.ports.layout_resolver().resolve(start)?;
        let manifest = recorder::load_or_default(&self.ports, &layout);
        Ok(self
            .subdirs(&layout.app_dir)
            .into_iter()
            .filter_map(|package| {
                let content = self.read(&layout.app_package_dir(&package).join("service.go"))?;
                Some(self.service_info(&layout, &package, &content, &manifest))
            })
            .collect())
    }

    #[instrument(skip_all, fields(service = name))]
    pub fn service_detail(&self, start: &Path, name: &str) -> GenResult<ServiceInfo> {
        require_name("service name", name)?;
        let layout = self.ports.layout_resolver().resolve(start)?;
        let package = service_package(name);
        let path = layout.app_package_dir(&package).join("service.go");
        let content = self
            .read(&path)
            .ok_or_else(|| GenError::not_found(format!("service '{}'", normalize_service_name(name))))?;
        let manifest = recorder::load_or_default(&self.ports, &layout);
        Ok(self.service_info(&layout, &package, &content, &manifest))
    }

    /// Deletes a service. When the package also holds a domain's commands
    /// or queries only the service files go and the provider is removed
    /// from `module.go`; otherwise the whole package is removed.
    #[instrument(skip_all, fields(service = name))]
    pub fn delete_service(&self, start: &Path, name: &str) -> GenResult<DeleteResult> {
        require_name("service name", name)?;
        let layout = self.ports.layout_resolver().resolve(start)?;
        let service = normalize_service_name(name);
        let package = service_package(name);
        let dir = layout.app_package_dir(&package);
        if !self.ports.filesystem.is_file(&dir.join("service.go")) {
            return Err(GenError::not_found(format!("service '{service}'")));
        }

        let fs = &self.ports.filesystem;
        let shared = fs.is_file(&dir.join("commands.go")) || fs.is_file(&dir.join("queries.go"));
        let mut result = DeleteResult::default();
        if shared {
            self.remove_file(&layout, &dir.join("service.go"), &mut result);
            self.remove_file(&layout, &dir.join("service_dto.go"), &mut result);
            self.unwire(&layout, &dir.join("module.go"), &remove_service_edits(&service), &mut result);
        } else {
            self.remove_dir(&layout, &dir, &mut result);
        }

        if let Err(err) = recorder::update(&self.ports, &layout, |m| {
            m.remove(ArtifactKind::Service, None, &service)
        }) {
            warn!(error = %err, "Could not update manifest");
        }

        let message = format!("Service {service} deleted");
        info!(items = result.deleted_items.len(), "{message}");
        Ok(result.finish(message))
    }

    // ── DDD artifacts ────────────────────────────────────────────────────

    /// Every value object, specification, policy, event and event handler
    /// found in the domain.
    #[instrument(skip_all, fields(domain = domain))]
    pub fn list_artifacts(&self, start: &Path, domain: &str) -> GenResult<ArtifactListing> {
        let layout = self.ports.layout_resolver().resolve(start)?;
        let package = self.existing_domain(&layout, domain)?;
        let manifest = recorder::load_or_default(&self.ports, &layout);
        let domain_dir = layout.domain_package_dir(&package);
        let app_dir = layout.app_package_dir(&package);

        let mut listing = ArtifactListing::default();
        for kind in ArtifactKind::DDD {
            let Some(prefix) = kind.file_prefix() else {
                continue;
            };
            let dir = if kind == ArtifactKind::EventHandler {
                &app_dir
            } else {
                &domain_dir
            };
            for file in self.go_files(dir, prefix) {
                // `event_` matches hand-copied handler files too.
                if kind == ArtifactKind::Event && file.starts_with("event_handler_") {
                    continue;
                }
                let path = dir.join(&file);
                let relative = layout.relative(&path).display().to_string();
                let entry = manifest
                    .of_kind(kind, Some(package.as_str()))
                    .find(|e| e.files.iter().any(|f| *f == relative));
                let content = self.read(&path).unwrap_or_default();
                if let Some(item) = list_item(kind, file, &content, entry) {
                    match kind {
                        ArtifactKind::ValueObject => listing.value_objects.push(item),
                        ArtifactKind::Specification => listing.specs.push(item),
                        ArtifactKind::Policy => listing.policies.push(item),
                        ArtifactKind::Event => listing.events.push(item),
                        ArtifactKind::EventHandler => listing.event_handlers.push(item),
                        ArtifactKind::Domain | ArtifactKind::Service => {}
                    }
                }
            }
        }
        Ok(listing)
    }

    fn artifact_path(&self, layout: &ProjectLayout, domain: &str, kind: ArtifactKind, name: &str) -> GenResult<(String, PathBuf)> {
        let package = self.existing_domain(layout, domain)?;
        require_name("name", name)?;
        let path = kind.file_path(layout, &package, name)?;
        Ok((package, path))
    }

    fn artifact_content(&self, path: &Path, kind: ArtifactKind, name: &str) -> GenResult<String> {
        self.read(path)
            .ok_or_else(|| GenError::not_found(format!("{kind} '{name}'")))
    }

    #[instrument(skip_all, fields(domain = domain, kind = %kind, name = name))]
    pub fn artifact_detail(&self, start: &Path, domain: &str, kind: ArtifactKind, name: &str) -> GenResult<ArtifactDetail> {
        let layout = self.ports.layout_resolver().resolve(start)?;
        let (package, path) = self.artifact_path(&layout, domain, kind, name)?;
        let content = self.artifact_content(&path, kind, name)?;
        let manifest = recorder::load_or_default(&self.ports, &layout);
        let entry = manifest.find(kind, Some(package.as_str()), &kind.type_name(name));

        let mut detail = scan_detail(kind, name, &content);
        if let Some(entry) = entry {
            if !entry.fields.is_empty() {
                detail.fields = entry.fields.clone();
            }
            detail.target = entry.target.clone().or(detail.target);
            detail.topic = entry.topic.clone().or(detail.topic);
        }
        Ok(detail)
    }

    #[instrument(skip_all, fields(domain = domain, kind = %kind, name = name))]
    pub fn artifact_source(&self, start: &Path, domain: &str, kind: ArtifactKind, name: &str) -> GenResult<ArtifactSource> {
        let layout = self.ports.layout_resolver().resolve(start)?;
        let (_, path) = self.artifact_path(&layout, domain, kind, name)?;
        let content = self.artifact_content(&path, kind, name)?;
        Ok(ArtifactSource {
            file: file_name(&path),
            content,
        })
    }

    /// Deletes one artifact file. Event handlers are also removed from
    /// the application `module.go`.
    #[instrument(skip_all, fields(domain = domain, kind = %kind, name = name))]
    pub fn delete_artifact(&self, start: &Path, domain: &str, kind: ArtifactKind, name: &str) -> GenResult<DeleteResult> {
        let layout = self.ports.layout_resolver().resolve(start)?;
        let (package, path) = self.artifact_path(&layout, domain, kind, name)?;
        if !self.ports.filesystem.is_file(&path) {
            return Err(GenError::not_found(format!("{kind} '{name}'")));
        }

        let mut result = DeleteResult::default();
        self.remove_file(&layout, &path, &mut result);
        if kind == ArtifactKind::EventHandler {
            let handler = handler_name(name);
            let module_go = layout.app_package_dir(&package).join("module.go");
            self.unwire(&layout, &module_go, &remove_event_handler_edits(&handler), &mut result);
        }

        if let Err(err) = recorder::update(&self.ports, &layout, |m| {
            m.remove(kind, Some(package.as_str()), &kind.type_name(name))
        }) {
            warn!(error = %err, "Could not update manifest");
        }

        let message = format!("{kind} {} deleted", kind.type_name(name));
        info!("{message}");
        Ok(result.finish(message))
    }

    /// Renames an artifact by rewriting its type names and moving the file.
    ///
    /// The new name must differ from the old one; an existing target file
    /// is replaced only with `force`.
    #[instrument(skip_all, fields(domain = domain, kind = %kind, name = name, new_name = new_name))]
    pub fn rename_artifact(
        &self,
        start: &Path,
        domain: &str,
        kind: ArtifactKind,
        name: &str,
        new_name: &str,
        force: bool,
    ) -> GenResult<GenerationResult> {
        let layout = self.ports.layout_resolver().resolve(start)?;
        let (package, old_path) = self.artifact_path(&layout, domain, kind, name)?;
        let (_, new_path) = self.artifact_path(&layout, domain, kind, new_name)?;
        if old_path == new_path {
            return Err(ApplicationError::ValidationFailed(
                "new name is the same as the old name".into(),
            )
            .into());
        }
        let content = self.artifact_content(&old_path, kind, name)?;
        let target_exists = self.ports.filesystem.is_file(&new_path);
        if target_exists && !force {
            return Err(ApplicationError::AlreadyExists {
                what: layout.relative(&new_path).display().to_string(),
            }
            .into());
        }

        let old_type = kind.type_name(name);
        let new_type = kind.type_name(new_name);
        let mut updated = content.replace(&old_type, &new_type);
        if kind == ArtifactKind::EventHandler {
            updated = updated.replace(
                &normalize_event_struct_name(name),
                &normalize_event_struct_name(new_name),
            );
        }

        let fs = &self.ports.filesystem;
        fs.write_file(&new_path, &updated)?;
        fs.remove_file(&old_path)?;

        let status = if target_exists {
            FileStatus::Overwrite
        } else {
            FileStatus::New
        };
        let mut result = GenerationResult::new();
        result.push(GeneratedFile::new(&new_path, status));

        if kind == ArtifactKind::EventHandler {
            let module_go = layout.app_package_dir(&package).join("module.go");
            if fs.is_file(&module_go) {
                let edits = rename_event_handler_edits(&old_type, &new_type);
                match self.ports.source_mutator().patch_file(&module_go, &edits, false) {
                    Ok(report) => {
                        result.push(report.file);
                        result.warnings.extend(report.warnings);
                    }
                    Err(err) => result.warn(format!("{}: {err}", module_go.display())),
                }
            }
        }

        let relative = layout.relative(&new_path).display().to_string();
        if let Err(err) = recorder::update(&self.ports, &layout, |m| {
            m.remove(kind, Some(package.as_str()), &new_type);
            m.rename(kind, Some(package.as_str()), &old_type, &new_type, vec![relative])
        }) {
            warn!(error = %err, "Could not update manifest");
            result.warn(format!("manifest not updated: {err}"));
        }

        let message = format!("Renamed {kind} {old_type} to {new_type}");
        info!("{message}");
        Ok(result.finish(message))
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn domain_entry<'a>(manifest: &'a Manifest, package: &str) -> Option<&'a ManifestEntry> {
    manifest
        .of_kind(ArtifactKind::Domain, None)
        .find(|e| package_name(&e.name) == package)
}

/// Application package a service lives in: `OrderService` → `order`.
fn service_package(name: &str) -> String {
    let service = normalize_service_name(name);
    package_name(service.strip_suffix("Service").unwrap_or(&service))
}

fn handler_name(name: &str) -> String {
    event_handler_name(&normalize_event_struct_name(name))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn list_item(kind: ArtifactKind, file: String, content: &str, entry: Option<&ManifestEntry>) -> Option<ArtifactItem> {
    let item = match kind {
        ArtifactKind::ValueObject => ArtifactItem {
            name: entry
                .map(|e| e.name.clone())
                .or_else(|| kind.name_from_file(&file))?,
            ..ArtifactItem::default()
        },
        ArtifactKind::Specification | ArtifactKind::Policy => {
            let method = if kind == ArtifactKind::Policy {
                "Validate"
            } else {
                "IsSatisfiedBy"
            };
            ArtifactItem {
                name: entry
                    .map(|e| e.name.clone())
                    .or_else(|| kind.name_from_file(&file))?,
                target: entry
                    .and_then(|e| e.target.clone())
                    .or_else(|| parse_target_type(content, method)),
                ..ArtifactItem::default()
            }
        }
        ArtifactKind::Event => {
            let event = entry
                .map(|e| e.name.clone())
                .or_else(|| parse_event_struct_name(content))?;
            ArtifactItem {
                name: event_base_name(&event).to_string(),
                topic: entry
                    .and_then(|e| e.topic.clone())
                    .or_else(|| parse_event_topic(content)),
                ..ArtifactItem::default()
            }
        }
        ArtifactKind::EventHandler => {
            let summary = parse_event_handler_summary(content)?;
            ArtifactItem {
                name: summary.event_name.clone(),
                event_name: Some(summary.event_name),
                topic: entry.and_then(|e| e.topic.clone()).or(summary.topic),
                ..ArtifactItem::default()
            }
        }
        ArtifactKind::Domain | ArtifactKind::Service => return None,
    };
    Some(ArtifactItem { file, ..item })
}

fn scan_detail(kind: ArtifactKind, name: &str, content: &str) -> ArtifactDetail {
    match kind {
        ArtifactKind::ValueObject => {
            let name = to_pascal_case(name);
            ArtifactDetail {
                fields: parse_struct_fields(content, &name),
                name: Some(name),
                ..ArtifactDetail::default()
            }
        }
        ArtifactKind::Specification => ArtifactDetail {
            name: Some(to_pascal_case(name)),
            target: parse_target_type(content, "IsSatisfiedBy"),
            ..ArtifactDetail::default()
        },
        ArtifactKind::Policy => ArtifactDetail {
            name: Some(to_pascal_case(name)),
            target: parse_target_type(content, "Validate"),
            ..ArtifactDetail::default()
        },
        ArtifactKind::Event => {
            let event = parse_event_struct_name(content)
                .unwrap_or_else(|| normalize_event_struct_name(name));
            ArtifactDetail {
                fields: parse_struct_fields(content, &event),
                name: Some(event_base_name(&event).to_string()),
                topic: parse_event_topic(content),
                ..ArtifactDetail::default()
            }
        }
        ArtifactKind::EventHandler => {
            let summary = parse_event_handler_summary(content);
            ArtifactDetail {
                event_name: summary.as_ref().map(|s| s.event_name.clone()),
                topic: summary.and_then(|s| s.topic),
                ..ArtifactDetail::default()
            }
        }
        ArtifactKind::Domain | ArtifactKind::Service => ArtifactDetail::default(),
    }
}
