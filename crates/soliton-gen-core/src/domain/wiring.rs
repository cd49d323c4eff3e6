//! Edit plans that register (and unregister) generated code inside the
//! entry point, the migration entry point and per-domain `module.go` files.
//!
//! Plans are pure data; a [`SourcePatcher`](crate::application::ports::SourcePatcher)
//! applies them.

use crate::domain::patch::{Anchor, Edit};

pub const MARKER_IMPORTS: &str = "// soliton-gen:imports";
pub const MARKER_PROVIDERS: &str = "// soliton-gen:providers";
pub const MARKER_MODULES: &str = "// soliton-gen:modules";
pub const MARKER_HANDLERS: &str = "// soliton-gen:handlers";
pub const MARKER_ROUTES: &str = "// soliton-gen:routes";
pub const MARKER_SERVICES: &str = "// soliton-gen:services";
pub const MARKER_EVENT_HANDLERS: &str = "// soliton-gen:event-handlers";
pub const MARKER_MIGRATIONS: &str = "// soliton-gen:migrations";

/// Comment that identifies the older entry-point shape with commented-out
/// placeholder lines.
pub const LEGACY_MAIN_HINT: &str = "// Uncomment these imports after generating domains:";

pub const EVENT_IMPORT: &str = "\"github.com/soliton-go/framework/event\"";
pub const EVENT_BUS_PROVIDER: &str = "func() event.EventBus { return event.NewLocalEventBus() },";
pub const LEGACY_EVENT_BUS_PROVIDER: &str = "event.NewLocalEventBus,";

const START_SERVER: &str = "fx.Invoke(StartServer),";
const FX_OPTIONS: &str = "fx.Options(";

/// How an entry point can be wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireMode {
    Markers,
    Legacy,
    Unsupported,
}

pub fn detect_wire_mode(main_go: &str) -> WireMode {
    if main_go.contains(MARKER_IMPORTS) {
        WireMode::Markers
    } else if main_go.contains(LEGACY_MAIN_HINT) {
        WireMode::Legacy
    } else {
        WireMode::Unsupported
    }
}

fn marker(text: &str) -> Anchor {
    Anchor::Marker(text.to_string())
}

fn app_import(package: &str, module_path: &str) -> String {
    format!("{package}app \"{module_path}/internal/application/{package}\"")
}

fn http_import(module_path: &str) -> String {
    format!("interfaceshttp \"{module_path}/internal/interfaces/http\"")
}

fn route_block(entity: &str, package: &str) -> String {
    format!(
        "fx.Invoke(func(db *gorm.DB, r *gin.Engine, h *interfaceshttp.{entity}Handler) error {{\n\
         \tif err := {package}app.RegisterMigration(db); err != nil {{\n\
         \t\treturn err\n\
         \t}}\n\
         \th.RegisterRoutes(r)\n\
         \treturn nil\n\
         }}),"
    )
}

fn route_guard(entity: &str) -> String {
    format!("h *interfaceshttp.{entity}Handler)")
}

/// Registers a domain in a marker-style entry point.
pub fn main_go_edits(entity: &str, package: &str, module_path: &str) -> Vec<Edit> {
    let before_start = || Anchor::BeforeLine(START_SERVER.to_string());
    vec![
        Edit::replace(
            "gorm import",
            vec!["_ \"gorm.io/gorm\"".to_string()],
            "\"gorm.io/gorm\"",
            Some("\t\"gorm.io/gorm\"".to_string()),
        ),
        Edit::insert(
            format!("import {package}app"),
            app_import(package, module_path),
            vec![marker(MARKER_IMPORTS), Anchor::AfterLine("import (".into())],
        ),
        Edit::insert(
            "import interfaceshttp",
            http_import(module_path),
            vec![marker(MARKER_IMPORTS), Anchor::AfterLine("import (".into())],
        ),
        Edit::insert_guarded(
            format!("module {package}app"),
            format!("{package}app.Module,"),
            format!("\t{package}app.Module,"),
            vec![marker(MARKER_MODULES), before_start()],
        ),
        Edit::insert(
            format!("handler {entity}Handler"),
            format!("fx.Provide(interfaceshttp.New{entity}Handler),"),
            vec![marker(MARKER_HANDLERS), before_start()],
        ),
        Edit::insert_guarded(
            format!("routes {entity}Handler"),
            route_block(entity, package),
            route_guard(entity),
            vec![marker(MARKER_ROUTES), before_start()],
        ),
    ]
}

fn commented(block: &str, indent: &str) -> String {
    block
        .lines()
        .map(|line| format!("{indent}// {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn indented(block: &str, indent: &str) -> String {
    block
        .lines()
        .map(|line| format!("{indent}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Uncomments the placeholder lines of a legacy entry point.
///
/// Each replacement is skipped once the live line is present.
pub fn legacy_main_go_edits(entity: &str, package: &str, module_path: &str) -> Vec<Edit> {
    let uncomment = |label: String, line: String, indent: &str| {
        Edit::replace(
            label,
            vec![format!("{indent}// {line}")],
            format!("{indent}{line}"),
            Some(format!("{indent}{line}")),
        )
    };

    let old_invoke = format!(
        "fx.Invoke(func(db *gorm.DB, r *gin.Engine, h *interfaceshttp.{entity}Handler) {{\n\
         \t{package}app.RegisterMigration(db)\n\
         \th.RegisterRoutes(r)\n\
         }}),"
    );
    let new_invoke = route_block(entity, package);

    vec![
        uncomment("gorm import".into(), "\"gorm.io/gorm\"".into(), "\t"),
        uncomment(format!("import {package}app"), app_import(package, module_path), "\t"),
        uncomment("import interfaceshttp".into(), http_import(module_path), "\t"),
        uncomment(format!("module {package}app"), format!("{package}app.Module,"), "\t\t"),
        uncomment(
            format!("handler {entity}Handler"),
            format!("fx.Provide(interfaceshttp.New{entity}Handler),"),
            "\t\t",
        ),
        Edit::replace(
            format!("routes {entity}Handler"),
            vec![
                commented(&old_invoke, "\t\t"),
                commented(&new_invoke, "\t\t"),
            ],
            indented(&new_invoke, "\t\t"),
            new_invoke.lines().next().map(|first| format!("\t\t{first}")),
        ),
    ]
}

/// Registers a domain's migration in `cmd/migrate/main.go`.
pub fn migrate_main_edits(package: &str, module_path: &str) -> Vec<Edit> {
    vec![
        Edit::insert(
            format!("import {package}app"),
            app_import(package, module_path),
            vec![marker(MARKER_IMPORTS), Anchor::AfterLine("import (".into())],
        ),
        Edit::insert_guarded(
            format!("migration {package}app"),
            format!(
                "if err := {package}app.RegisterMigration(db); err != nil {{\n\treturn err\n}}"
            ),
            format!(" {package}app.RegisterMigration(db)"),
            vec![
                marker(MARKER_MIGRATIONS),
                Anchor::BeforeLine("return nil".into()),
            ],
        ),
    ]
}

/// Registers an application service provider in a `module.go`.
pub fn service_module_edits(service_name: &str) -> Vec<Edit> {
    vec![Edit::insert(
        format!("provide {service_name}"),
        format!("fx.Provide(New{service_name}),"),
        vec![marker(MARKER_SERVICES), Anchor::BlockEnd(FX_OPTIONS.into())],
    )]
}

/// Registers an event handler's provider and subscription in a `module.go`.
pub fn event_handler_module_edits(handler_name: &str) -> Vec<Edit> {
    let anchors = || vec![marker(MARKER_EVENT_HANDLERS), Anchor::BlockEnd(FX_OPTIONS.into())];
    vec![
        Edit::insert(
            format!("provide {handler_name}"),
            format!("fx.Provide(New{handler_name}),"),
            anchors(),
        ),
        Edit::insert(
            format!("invoke Register{handler_name}"),
            format!("fx.Invoke(Register{handler_name}),"),
            anchors(),
        ),
    ]
}

/// Ensures the entry point provides an event bus and imports its package.
///
/// A legacy bare `event.NewLocalEventBus,` provider is upgraded in place.
pub fn event_bus_edits() -> Vec<Edit> {
    vec![
        Edit::insert(
            "import event",
            EVENT_IMPORT,
            vec![marker(MARKER_IMPORTS), Anchor::AfterLine("import (".into())],
        ),
        Edit::insert_guarded(
            "event bus provider",
            EVENT_BUS_PROVIDER,
            "event.NewLocalEventBus",
            vec![
                marker(MARKER_PROVIDERS),
                Anchor::BeforeLine("NewRouter,".into()),
            ],
        ),
        Edit::replace(
            "event bus provider upgrade",
            vec![LEGACY_EVENT_BUS_PROVIDER.to_string()],
            EVENT_BUS_PROVIDER,
            Some(EVENT_BUS_PROVIDER.to_string()),
        ),
    ]
}

/// Removes everything [`main_go_edits`] added for a domain.
pub fn unwire_main_go_edits(entity: &str, package: &str) -> Vec<Edit> {
    vec![
        Edit::remove_lines(
            format!("import {package}app"),
            format!("/internal/application/{package}\""),
        ),
        Edit::remove_lines(format!("module {package}app"), format!("\t{package}app.Module,")),
        Edit::remove_lines(
            format!("handler {entity}Handler"),
            format!("(interfaceshttp.New{entity}Handler)"),
        ),
        Edit::remove_block(format!("routes {entity}Handler"), route_guard(entity), "}),"),
    ]
}

/// Removes everything [`migrate_main_edits`] added for a domain.
pub fn unwire_migrate_main_edits(package: &str) -> Vec<Edit> {
    vec![
        Edit::remove_lines(
            format!("import {package}app"),
            format!("/internal/application/{package}\""),
        ),
        Edit::remove_block(
            format!("migration {package}app"),
            format!(" {package}app.RegisterMigration(db)"),
            "}",
        ),
    ]
}

pub fn remove_service_edits(service_name: &str) -> Vec<Edit> {
    vec![Edit::remove_lines(
        format!("provide {service_name}"),
        format!("(New{service_name})"),
    )]
}

pub fn remove_event_handler_edits(handler_name: &str) -> Vec<Edit> {
    vec![
        Edit::remove_lines(format!("provide {handler_name}"), format!("(New{handler_name})")),
        Edit::remove_lines(
            format!("invoke Register{handler_name}"),
            format!("(Register{handler_name})"),
        ),
    ]
}

pub fn rename_event_handler_edits(old_handler: &str, new_handler: &str) -> Vec<Edit> {
    vec![
        Edit::replace_all(
            format!("provide {new_handler}"),
            format!("New{old_handler}"),
            format!("New{new_handler}"),
        ),
        Edit::replace_all(
            format!("invoke Register{new_handler}"),
            format!("Register{old_handler}"),
            format!("Register{new_handler}"),
        ),
    ]
}
