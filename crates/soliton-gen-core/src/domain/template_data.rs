//! Render data for every artifact.
//!
//! Each `*Data` struct is flat and fully precomputed: names are normalised,
//! fields resolved, and the `has_time` / `has_enums` flags derived once here
//! so templates only branch on them. Builders fail on the first invalid
//! field and never return partially valid data.

use serde::Serialize;

use crate::domain::config::{
    DomainConfig, EventConfig, EventHandlerConfig, PolicyConfig, ProjectConfig, ServiceConfig,
    SpecificationConfig, ValueObjectConfig,
};
use crate::domain::error::DomainError;
use crate::domain::field::{Field, FieldConfig, ReservedNames, field_flags, resolve_fields};
use crate::domain::layout::ProjectLayout;
use crate::domain::naming::{
    event_base_name, event_handler_name, lower_first, normalize_event_struct_name,
    normalize_event_topic, normalize_service_name, normalize_target_type, package_name, pluralize,
    to_pascal_case, upper_first,
};

/// Framework version used when the framework is fetched from a registry.
pub const DEFAULT_FRAMEWORK_VERSION: &str = "v0.1.0";
/// Pseudo-version used together with a local `replace` directive.
pub const LOCAL_FRAMEWORK_VERSION: &str = "v0.0.0-00010101000000-000000000000";
pub const DEFAULT_GO_VERSION: &str = "1.22";
pub const DEFAULT_MODULE_PREFIX: &str = "github.com/soliton-go";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ── Domain ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityData {
    pub package_name: String,
    pub entity_name: String,
    pub fields: Vec<Field>,
    pub has_time: bool,
    pub has_enums: bool,
    pub module_path: String,
    pub table_name: String,
    pub route_base: String,
    pub soft_delete: bool,
    pub remark: Option<String>,
}

impl EntityData {
    pub fn build(cfg: &DomainConfig, layout: &ProjectLayout) -> Result<Self, DomainError> {
        let entity_name = to_pascal_case(&cfg.name);
        let package = package_name(&cfg.name);

        let configs = if cfg.fields.is_empty() {
            vec![FieldConfig::new("Name", "string")]
        } else {
            cfg.fields.clone()
        };
        let fields = resolve_fields(&configs, &entity_name, &package, ReservedNames::Reject)?;
        let (has_time, has_enums) = field_flags(&fields);

        Ok(Self {
            table_name: non_blank(cfg.table_name.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| pluralize(&package)),
            route_base: non_blank(cfg.route_base.as_deref())
                .map(|r| r.trim_matches('/').to_string())
                .unwrap_or_else(|| pluralize(&package)),
            module_path: layout.module_path.clone(),
            soft_delete: cfg.soft_delete,
            remark: non_blank(cfg.remark.as_deref()).map(str::to_string),
            package_name: package,
            entity_name,
            fields,
            has_time,
            has_enums,
        })
    }
}

// ── Services ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceMethod {
    pub name: String,
    pub camel_name: String,
    pub remark: Option<String>,
}

/// Methods from `Name` or `Name:remark` entries, which may themselves be
/// comma separated. Without any, `Create<Base>`, `Get<Base>` and
/// `List<Base>s` are generated.
pub fn service_methods(methods: &[String], base: &str) -> Vec<ServiceMethod> {
    let explicit: Vec<(String, Option<String>)> = methods
        .iter()
        .flat_map(|m| m.split(','))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| match m.split_once(':') {
            Some((name, remark)) => (upper_first(name.trim()), non_blank(Some(remark)).map(str::to_string)),
            None => (upper_first(m), None),
        })
        .filter(|(name, _)| !name.is_empty())
        .collect();

    let entries = if explicit.is_empty() {
        vec![
            (format!("Create{base}"), None),
            (format!("Get{base}"), None),
            (format!("List{base}s"), None),
        ]
    } else {
        explicit
    };

    entries
        .into_iter()
        .map(|(name, remark)| ServiceMethod {
            camel_name: lower_first(&name),
            name,
            remark,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceData {
    pub service_name: String,
    pub base_name: String,
    /// Directory / domain package, e.g. `order`.
    pub domain_package: String,
    /// Go package of the generated files, e.g. `orderapp`.
    pub package_name: String,
    pub methods: Vec<ServiceMethod>,
    pub module_path: String,
    pub remark: Option<String>,
    /// Whether `internal/domain/<domain_package>` exists; set by the caller.
    pub domain_exists: bool,
}

impl ServiceData {
    pub fn build(cfg: &ServiceConfig, layout: &ProjectLayout) -> Result<Self, DomainError> {
        let service_name = normalize_service_name(&cfg.name);
        let base_name = service_name
            .strip_suffix("Service")
            .unwrap_or(&service_name)
            .to_string();
        if base_name.is_empty() {
            return Err(DomainError::InvalidName {
                what: "service name",
                value: cfg.name.clone(),
            });
        }
        let domain_package = package_name(&base_name);

        Ok(Self {
            methods: service_methods(&cfg.methods, &base_name),
            package_name: format!("{domain_package}app"),
            module_path: layout.module_path.clone(),
            remark: non_blank(cfg.remark.as_deref()).map(str::to_string),
            domain_exists: false,
            service_name,
            base_name,
            domain_package,
        })
    }
}

// ── DDD artifacts ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueObjectData {
    pub package_name: String,
    pub value_object_name: String,
    pub fields: Vec<Field>,
    pub has_time: bool,
    pub has_enums: bool,
}

impl ValueObjectData {
    pub fn build(cfg: &ValueObjectConfig) -> Result<Self, DomainError> {
        let package = package_name(&cfg.domain);
        let value_object_name = to_pascal_case(&cfg.name);
        let configs = if cfg.fields.is_empty() {
            vec![FieldConfig::new("Value", "string")]
        } else {
            cfg.fields.clone()
        };
        let fields = resolve_fields(&configs, &value_object_name, &package, ReservedNames::Reject)?;
        let (has_time, has_enums) = field_flags(&fields);

        Ok(Self {
            package_name: package,
            value_object_name,
            fields,
            has_time,
            has_enums,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecificationData {
    pub package_name: String,
    pub specification_name: String,
    pub target_type: String,
    pub target_is_any: bool,
}

impl SpecificationData {
    pub fn build(cfg: &SpecificationConfig) -> Self {
        let (target_type, target_is_any) = normalize_target_type(cfg.target.as_deref());
        Self {
            package_name: package_name(&cfg.domain),
            specification_name: to_pascal_case(&cfg.name),
            target_type,
            target_is_any,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyData {
    pub package_name: String,
    pub policy_name: String,
    pub target_type: String,
    pub target_is_any: bool,
}

impl PolicyData {
    pub fn build(cfg: &PolicyConfig) -> Self {
        let (target_type, target_is_any) = normalize_target_type(cfg.target.as_deref());
        Self {
            package_name: package_name(&cfg.domain),
            policy_name: to_pascal_case(&cfg.name),
            target_type,
            target_is_any,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventData {
    pub package_name: String,
    pub event_struct_name: String,
    pub event_topic: String,
    pub fields: Vec<Field>,
    pub has_time: bool,
    pub has_enums: bool,
}

impl EventData {
    pub fn build(cfg: &EventConfig) -> Result<Self, DomainError> {
        let package = package_name(&cfg.domain);
        let event_struct_name = normalize_event_struct_name(&cfg.name);
        let event_topic = normalize_event_topic(cfg.topic.as_deref(), &package, &event_struct_name);
        let fields = resolve_fields(&cfg.fields, &event_struct_name, &package, ReservedNames::Allow)?;
        let (has_time, has_enums) = field_flags(&fields);

        Ok(Self {
            package_name: package,
            event_struct_name,
            event_topic,
            fields,
            has_time,
            has_enums,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventHandlerData {
    pub package_name: String,
    pub domain_package: String,
    pub event_struct_name: String,
    pub handler_name: String,
    pub event_topic: String,
    pub module_path: String,
}

impl EventHandlerData {
    pub fn build(cfg: &EventHandlerConfig, layout: &ProjectLayout) -> Self {
        let domain_package = package_name(&cfg.domain);
        let event_struct_name = normalize_event_struct_name(&cfg.event_name);
        Self {
            package_name: format!("{domain_package}app"),
            event_topic: normalize_event_topic(
                cfg.topic.as_deref(),
                &domain_package,
                &event_struct_name,
            ),
            handler_name: event_handler_name(&event_struct_name),
            module_path: layout.module_path.clone(),
            domain_package,
            event_struct_name,
        }
    }

    pub fn event_base(&self) -> &str {
        event_base_name(&self.event_struct_name)
    }
}

// ── Project ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectData {
    pub project_name: String,
    pub module_name: String,
    pub framework_version: String,
    pub framework_replace: Option<String>,
    pub go_version: String,
}

impl ProjectData {
    /// `sibling_framework` is the replace path to use when a local framework
    /// checkout was detected next to the new project.
    pub fn build(
        cfg: &ProjectConfig,
        module_prefix: &str,
        sibling_framework: Option<&str>,
        detected_go_version: Option<&str>,
    ) -> Self {
        let module_name = non_blank(cfg.module_name.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}/{}", module_prefix.trim_end_matches('/'), cfg.name));
        let framework_replace = non_blank(cfg.framework_replace.as_deref())
            .or(sibling_framework)
            .map(str::to_string);
        let framework_version = non_blank(cfg.framework_version.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| {
                if framework_replace.is_some() {
                    LOCAL_FRAMEWORK_VERSION.to_string()
                } else {
                    DEFAULT_FRAMEWORK_VERSION.to_string()
                }
            });
        let go_version = non_blank(cfg.go_version.as_deref())
            .or(non_blank(detected_go_version))
            .filter(|v| !v.contains("devel"))
            .unwrap_or(DEFAULT_GO_VERSION)
            .to_string();

        Self {
            project_name: cfg.name.clone(),
            module_name,
            framework_version,
            framework_replace,
            go_version,
        }
    }
}
