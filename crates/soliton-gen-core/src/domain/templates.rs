//! Identifiers of the built-in template set.

use std::fmt;

use serde::Serialize;

/// Every template the generator can render.
///
/// The renderer port maps each id to a concrete template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    // Domain module
    Entity,
    Repository,
    Events,
    RepoImpl,
    Commands,
    Queries,
    Dto,
    FxModule,
    HttpHelpers,
    Handler,
    // DDD artifacts
    ValueObject,
    Specification,
    Policy,
    Event,
    EventHandler,
    // Application services
    Service,
    ServiceDto,
    ServiceModule,
    // Project skeleton
    GoMod,
    MainGo,
    MigrateMain,
    Config,
    ConfigExample,
    Response,
    Gitignore,
    Readme,
    Makefile,
}

impl TemplateId {
    pub const ALL: [TemplateId; 27] = [
        Self::Entity,
        Self::Repository,
        Self::Events,
        Self::RepoImpl,
        Self::Commands,
        Self::Queries,
        Self::Dto,
        Self::FxModule,
        Self::HttpHelpers,
        Self::Handler,
        Self::ValueObject,
        Self::Specification,
        Self::Policy,
        Self::Event,
        Self::EventHandler,
        Self::Service,
        Self::ServiceDto,
        Self::ServiceModule,
        Self::GoMod,
        Self::MainGo,
        Self::MigrateMain,
        Self::Config,
        Self::ConfigExample,
        Self::Response,
        Self::Gitignore,
        Self::Readme,
        Self::Makefile,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Entity => "entity.go",
            Self::Repository => "repository.go",
            Self::Events => "events.go",
            Self::RepoImpl => "repo_impl.go",
            Self::Commands => "commands.go",
            Self::Queries => "queries.go",
            Self::Dto => "dto.go",
            Self::FxModule => "module.go",
            Self::HttpHelpers => "helpers.go",
            Self::Handler => "handler.go",
            Self::ValueObject => "value_object.go",
            Self::Specification => "spec.go",
            Self::Policy => "policy.go",
            Self::Event => "event.go",
            Self::EventHandler => "event_handler.go",
            Self::Service => "service.go",
            Self::ServiceDto => "service_dto.go",
            Self::ServiceModule => "service_module.go",
            Self::GoMod => "go.mod",
            Self::MainGo => "main.go",
            Self::MigrateMain => "migrate_main.go",
            Self::Config => "config.yaml",
            Self::ConfigExample => "config.example.yaml",
            Self::Response => "response.go",
            Self::Gitignore => "gitignore",
            Self::Readme => "README.md",
            Self::Makefile => "Makefile",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
