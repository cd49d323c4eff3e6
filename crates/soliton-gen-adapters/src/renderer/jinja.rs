//! Go templates rendered with minijinja.
//!
//! The built-in set is compiled into the binary. A directory of
//! `<template-name>.j2` files can replace individual templates; it is taken
//! from [`JinjaRenderer::with_override_dir`] or, failing that, from
//! `$SOLITON_GEN_TEMPLATES_DIR`.
//!
//! ```env
//! SOLITON_GEN_TEMPLATES_DIR=./my-templates
//! ```

use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use soliton_gen_core::application::ApplicationError;
use soliton_gen_core::application::ports::TemplateRenderer;
use soliton_gen_core::domain::TemplateId;
use soliton_gen_core::error::GenResult;

pub const TEMPLATES_DIR_ENV: &str = "SOLITON_GEN_TEMPLATES_DIR";

const TEMPLATE_SUFFIX: &str = ".j2";

macro_rules! builtin {
    ($($id:ident => $file:literal),+ $(,)?) => {
        const BUILTIN: &[(TemplateId, &str)] = &[
            $((TemplateId::$id, include_str!(concat!("../../templates/", $file)))),+
        ];
    };
}

builtin! {
    Entity => "entity.go.j2",
    Repository => "repository.go.j2",
    Events => "events.go.j2",
    RepoImpl => "repo_impl.go.j2",
    Commands => "commands.go.j2",
    Queries => "queries.go.j2",
    Dto => "dto.go.j2",
    FxModule => "module.go.j2",
    HttpHelpers => "helpers.go.j2",
    Handler => "handler.go.j2",
    ValueObject => "value_object.go.j2",
    Specification => "spec.go.j2",
    Policy => "policy.go.j2",
    Event => "event.go.j2",
    EventHandler => "event_handler.go.j2",
    Service => "service.go.j2",
    ServiceDto => "service_dto.go.j2",
    ServiceModule => "service_module.go.j2",
    GoMod => "go.mod.j2",
    MainGo => "main.go.j2",
    MigrateMain => "migrate_main.go.j2",
    Config => "config.yaml.j2",
    ConfigExample => "config.example.yaml.j2",
    Response => "response.go.j2",
    Gitignore => "gitignore.j2",
    Readme => "README.md.j2",
    Makefile => "Makefile.j2",
}

/// Renders [`TemplateId`]s from the built-in set plus optional overrides.
#[derive(Debug)]
pub struct JinjaRenderer {
    env: Environment<'static>,
    overridden: Vec<TemplateId>,
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::SemiStrict);
    // Go, YAML and Markdown output must never be HTML-escaped.
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env
}

fn rendering_failed(template: &str, err: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::RenderingFailed {
        template: template.to_string(),
        reason: err.to_string(),
    }
}

impl JinjaRenderer {
    /// Built-in templates only.
    pub fn builtin() -> GenResult<Self> {
        let mut env = environment();
        for &(id, source) in BUILTIN {
            env.add_template(id.name(), source)
                .map_err(|e| rendering_failed(id.name(), e))?;
        }
        Ok(Self {
            env,
            overridden: Vec::new(),
        })
    }

    /// Built-in templates with overrides from `$SOLITON_GEN_TEMPLATES_DIR`
    /// when it is set.
    pub fn new() -> GenResult<Self> {
        match std::env::var_os(TEMPLATES_DIR_ENV) {
            Some(dir) => {
                debug!(path = ?dir, "Template overrides from ${}", TEMPLATES_DIR_ENV);
                Self::builtin()?.with_override_dir(PathBuf::from(dir))
            }
            None => Self::builtin(),
        }
    }

    /// Replaces built-in templates with `<name>.j2` files found under `dir`.
    /// Files that match no template are ignored with a warning.
    #[instrument(skip(self), fields(dir = %dir.as_ref().display()))]
    pub fn with_override_dir(mut self, dir: impl AsRef<Path>) -> GenResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            warn!("Template override directory does not exist, using built-in templates");
            return Ok(self);
        }

        for entry in WalkDir::new(dir).min_depth(1).follow_links(true) {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            let Some(name) = file_name.strip_suffix(TEMPLATE_SUFFIX) else {
                continue;
            };
            let Some(id) = TemplateId::ALL.into_iter().find(|id| id.name() == name) else {
                warn!(file = %entry.path().display(), "Unknown template override, skipping");
                continue;
            };

            let source = std::fs::read_to_string(entry.path()).map_err(|e| {
                ApplicationError::FilesystemError {
                    path: entry.path().to_path_buf(),
                    reason: e.to_string(),
                }
            })?;
            self.env
                .add_template_owned(id.name().to_string(), source)
                .map_err(|e| rendering_failed(id.name(), e))?;
            self.overridden.push(id);
        }

        info!(count = self.overridden.len(), "Template overrides loaded");
        Ok(self)
    }

    /// Templates replaced by an override directory.
    pub fn overridden(&self) -> &[TemplateId] {
        &self.overridden
    }
}

impl TemplateRenderer for JinjaRenderer {
    #[instrument(skip(self, data), fields(template = %template))]
    fn render(&self, template: TemplateId, data: &serde_json::Value) -> GenResult<String> {
        let tmpl = self
            .env
            .get_template(template.name())
            .map_err(|e| rendering_failed(template.name(), e))?;
        let rendered = tmpl
            .render(data)
            .map_err(|e| rendering_failed(template.name(), e))?;
        debug!(bytes = rendered.len(), "Rendered");
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use soliton_gen_core::domain::{
        DomainConfig, EntityData, EventConfig, EventData, EventHandlerConfig, EventHandlerData,
        PolicyConfig, PolicyData, ProjectConfig, ProjectData, ProjectLayout, ServiceConfig,
        ServiceData, SpecificationConfig, SpecificationData, ValueObjectConfig, ValueObjectData,
        parse_fields,
    };
    use tempfile::TempDir;

    fn layout() -> ProjectLayout {
        ProjectLayout::new("/shop", "github.com/acme/shop")
    }

    fn render<T: serde::Serialize>(id: TemplateId, data: &T) -> String {
        JinjaRenderer::builtin()
            .unwrap()
            .render(id, &serde_json::to_value(data).unwrap())
            .unwrap()
    }

    fn order() -> EntityData {
        let mut cfg = DomainConfig::new("Order");
        cfg.fields = parse_fields("customer_id,status:enum(pending|paid),total:int64,paid_at:time?");
        cfg.remark = Some("Customer orders".into());
        EntityData::build(&cfg, &layout()).unwrap()
    }

    #[test]
    fn every_template_is_registered() {
        let renderer = JinjaRenderer::builtin().unwrap();
        for id in TemplateId::ALL {
            assert!(renderer.env.get_template(id.name()).is_ok(), "{id}");
        }
    }

    #[test]
    fn entity_renders_enums_fields_and_remark() {
        let out = render(TemplateId::Entity, &order());
        assert!(out.starts_with("package order\n"));
        assert!(out.contains("// DomainRemark: Customer orders\n"));
        assert!(out.contains("type OrderStatus string"));
        assert!(out.contains("OrderStatusPending OrderStatus = \"pending\""));
        assert!(out.contains("type Order struct {\n\tddd.BaseAggregateRoot\n"));
        assert!(out.contains("func (Order) TableName() string"));
        assert!(!out.contains("&#"), "output must not be escaped");
    }

    #[test]
    fn entity_field_lines_keep_their_newlines() {
        let out = render(TemplateId::Entity, &order());
        let struct_body: Vec<&str> = out
            .split("type Order struct {")
            .nth(1)
            .unwrap()
            .lines()
            .take_while(|l| *l != "}")
            .collect();
        assert!(struct_body.iter().any(|l| l.trim_start().starts_with("Total ")));
        assert!(struct_body.iter().any(|l| l.trim_start().starts_with("Status ")));
    }

    #[test]
    fn json_fields_import_datatypes() {
        assert!(!render(TemplateId::Entity, &order()).contains("gorm.io/datatypes"));

        let mut cfg = DomainConfig::new("Order");
        cfg.fields = parse_fields("meta:json,extra:jsonb");
        let data = EntityData::build(&cfg, &layout()).unwrap();
        let out = render(TemplateId::Entity, &data);
        assert_eq!(out.matches("\t\"gorm.io/datatypes\"\n").count(), 1);
        assert!(render(TemplateId::Commands, &data).contains("\"gorm.io/datatypes\""));
    }

    #[test]
    fn soft_delete_adds_gorm_deleted_at() {
        let mut cfg = DomainConfig::new("Order");
        cfg.soft_delete = true;
        let data = EntityData::build(&cfg, &layout()).unwrap();
        let out = render(TemplateId::Entity, &data);
        assert!(out.contains("\"gorm.io/gorm\""));
        assert!(out.contains("gorm.DeletedAt"));
    }

    #[test]
    fn module_carries_service_and_handler_markers() {
        let out = render(TemplateId::FxModule, &order());
        assert!(out.contains("package orderapp"));
        assert!(out.contains("\t// soliton-gen:services\n"));
        assert!(out.contains("\t// soliton-gen:event-handlers\n"));
        assert!(out.contains("func RegisterMigration(db *gorm.DB) error"));
    }

    #[test]
    fn handler_converts_enums() {
        let out = render(TemplateId::Handler, &order());
        assert!(out.contains("\"github.com/acme/shop/internal/domain/order\""));
        assert!(out.contains("Status: order.OrderStatus(req.Status),"));
        assert!(out.contains("api := r.Group(\"/api/orders\")"));
    }

    #[test]
    fn service_writes_remarks_and_repository() {
        let mut cfg = ServiceConfig::new("OrderService");
        cfg.methods = vec!["Checkout:pay and ship".into(), "Cancel".into()];
        cfg.remark = Some("Order workflows".into());
        let mut data = ServiceData::build(&cfg, &layout()).unwrap();
        data.domain_exists = true;

        let out = render(TemplateId::Service, &data);
        assert!(out.starts_with("package orderapp\n"));
        assert!(out.contains("// ServiceRemark: Order workflows\n"));
        assert!(out.contains("// MethodRemark: Checkout::pay and ship\n"));
        assert!(!out.contains("MethodRemark: Cancel"));
        assert!(out.contains("repo order.OrderRepository"));
        assert!(out.contains("return &OrderService{repo: repo}\n"));
        assert!(out.contains(
            "func (s *OrderService) Cancel(ctx context.Context, req CancelServiceRequest) (*CancelServiceResponse, error) {"
        ));

        let dto = render(TemplateId::ServiceDto, &data);
        assert!(dto.contains("type CheckoutServiceRequest struct"));
    }

    #[test]
    fn cross_domain_service_has_no_repository() {
        let data = ServiceData::build(&ServiceConfig::new("Checkout"), &layout()).unwrap();
        let out = render(TemplateId::Service, &data);
        assert!(!out.contains("internal/domain"));
        assert!(out.contains("return &CheckoutService{}\n"));
    }

    #[test]
    fn ddd_artifacts_render() {
        let vo = ValueObjectData::build(&ValueObjectConfig {
            domain: "order".into(),
            name: "Money".into(),
            fields: parse_fields("amount:int64,currency"),
            force: false,
        })
        .unwrap();
        let out = render(TemplateId::ValueObject, &vo);
        assert!(out.contains("func NewMoney(amount int64, currency string) (Money, error) {"));

        let spec = SpecificationData::build(&SpecificationConfig {
            domain: "order".into(),
            name: "PaidOrder".into(),
            target: Some("Order".into()),
            force: false,
        });
        let out = render(TemplateId::Specification, &spec);
        assert!(out.contains("IsSatisfiedBy(target *Order) bool"));

        let policy = PolicyData::build(&PolicyConfig {
            domain: "order".into(),
            name: "Refund".into(),
            target: None,
            force: false,
        });
        let out = render(TemplateId::Policy, &policy);
        assert!(out.contains("Validate(target any) error"));
    }

    #[test]
    fn event_and_handler_share_topic() {
        let event = EventData::build(&EventConfig {
            domain: "order".into(),
            name: "OrderPaid".into(),
            fields: parse_fields("amount:int64"),
            topic: None,
            force: false,
        })
        .unwrap();
        let out = render(TemplateId::Event, &event);
        assert!(out.contains("\tddd.BaseDomainEvent\n"));
        assert!(out.contains(&format!("return \"{}\"", event.event_topic)));

        let handler = EventHandlerData::build(
            &EventHandlerConfig {
                domain: "order".into(),
                event_name: "OrderPaid".into(),
                topic: None,
                force: false,
            },
            &layout(),
        );
        let out = render(TemplateId::EventHandler, &handler);
        assert!(out.contains("evt.(*order.OrderPaidEvent)"));
        assert!(out.contains(&format!("bus.Subscribe(ctx, \"{}\"", handler.event_topic)));
    }

    #[test]
    fn project_files_carry_wiring_markers() {
        let data = ProjectData::build(&ProjectConfig::new("shop"), "github.com/acme", Some("../framework"), None);
        let go_mod = render(TemplateId::GoMod, &data);
        assert!(go_mod.starts_with("module github.com/acme/shop\n"));
        assert!(go_mod.contains("replace github.com/soliton-go/framework => ../framework"));

        let main = render(TemplateId::MainGo, &data);
        for marker in ["imports", "providers", "modules", "handlers", "routes"] {
            assert!(main.contains(&format!("// soliton-gen:{marker}")), "{marker}");
        }
        assert!(main.contains("_ \"gorm.io/gorm\""));
        assert!(render(TemplateId::MigrateMain, &data).contains("\t// soliton-gen:migrations\n"));
        assert!(render(TemplateId::Makefile, &data).contains("\n\tGOWORK=$(GOWORK) go mod tidy\n"));
    }

    #[test]
    fn override_directory_replaces_one_template() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("spec.go.j2"), "// custom {{ specification_name }}\n").unwrap();
        std::fs::write(tmp.path().join("unknown.j2"), "x").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "x").unwrap();

        let renderer = JinjaRenderer::builtin().unwrap().with_override_dir(tmp.path()).unwrap();
        assert_eq!(renderer.overridden(), [TemplateId::Specification]);
        let out = renderer
            .render(TemplateId::Specification, &json!({ "specification_name": "Paid" }))
            .unwrap();
        assert_eq!(out, "// custom Paid\n");
        assert!(
            renderer
                .render(TemplateId::Policy, &json!({ "policy_name": "P", "package_name": "p", "target_is_any": true }))
                .unwrap()
                .contains("type P struct{}")
        );
    }

    #[test]
    fn misspelled_variable_fails_the_render() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("spec.go.j2"),
            "{% if remark %}// {{ remark }}\n{% endif %}type {{ specifcation_name }} struct{}\n",
        )
        .unwrap();
        let renderer = JinjaRenderer::builtin().unwrap().with_override_dir(tmp.path()).unwrap();

        let err = renderer
            .render(TemplateId::Specification, &json!({ "specification_name": "Paid" }))
            .unwrap_err();
        assert!(err.to_string().contains("spec.go"), "{err}");
    }

    #[test]
    fn broken_override_is_a_rendering_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("go.mod.j2"), "{% if %}").unwrap();
        let err = JinjaRenderer::builtin()
            .unwrap()
            .with_override_dir(tmp.path())
            .unwrap_err();
        assert!(err.to_string().contains("go.mod"));
    }
}
