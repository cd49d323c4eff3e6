//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, LogFormat, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "soliton-gen",
    bin_name = "soliton-gen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "DDD scaffolding for Soliton-Go projects",
    long_about = "soliton-gen creates Soliton-Go projects and generates domains, \
                  services and DDD building blocks into them, keeping the \
                  dependency-injection wiring up to date.",
    after_help = "EXAMPLES:\n\
        \x20 soliton-gen init shop\n\
        \x20 soliton-gen domain Order -f \"status:enum(pending|paid),total:int64\" --wire\n\
        \x20 soliton-gen service Payment --methods Authorize,Capture\n\
        \x20 soliton-gen event order OrderPaid -f amount:int64\n\
        \x20 soliton-gen completions bash > /usr/share/bash-completion/completions/soliton-gen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project skeleton.
    #[command(after_help = "EXAMPLES:\n\
        \x20 soliton-gen init shop\n\
        \x20 soliton-gen init shop --module example.com/acme/shop --preview")]
    Init(InitArgs),

    /// Generate a domain, or list and delete existing ones.
    #[command(
        visible_alias = "d",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen domain Order -f \"customer_id:uuid,total:int64:in cents\" --wire\n\
            \x20 soliton-gen domain list\n\
            \x20 soliton-gen domain delete order -y\n\
            \x20 soliton-gen domain --name show\n\n\
            A name spelled like a subcommand (list, ls, show, wire, delete, rm)\n\
            must be passed with --name."
    )]
    Domain(DomainArgs),

    /// Generate an application service, or list and delete existing ones.
    #[command(
        visible_alias = "s",
        after_help = "EXAMPLES:\n\
            \x20 soliton-gen service Payment --methods Authorize,Capture\n\
            \x20 soliton-gen service detect OrderService\n\
            \x20 soliton-gen service list\n\n\
            A name spelled like a subcommand (list, ls, detect, delete, rm)\n\
            must be passed with --name."
    )]
    Service(ServiceArgs),

    /// Generate a domain event.
    Event(EventArgs),

    /// Generate an event handler and register it on the event bus.
    #[command(name = "event-handler")]
    EventHandler(EventHandlerArgs),

    /// Generate a domain policy.
    Policy(TargetedArgs),

    /// Generate a domain specification.
    Spec(TargetedArgs),

    /// Generate a value object.
    #[command(name = "valueobject", visible_alias = "vo")]
    ValueObject(ValueObjectArgs),

    /// List, rename or delete value objects, specs, policies and events.
    #[command(subcommand)]
    Ddd(DddCommands),

    /// Run `go mod tidy` in the project.
    Tidy,

    /// Start the HTTP API.
    Serve(ServeArgs),

    /// Generate shell completion scripts.
    #[command(after_help = "EXAMPLES:\n\
        \x20 soliton-gen completions bash > ~/.local/share/bash-completion/completions/soliton-gen\n\
        \x20 soliton-gen completions zsh  > ~/.zfunc/_soliton-gen\n\
        \x20 soliton-gen completions fish > ~/.config/fish/completions/soliton-gen.fish")]
    Completions(CompletionsArgs),

    /// Inspect or create the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// `--force` and `--preview`, shared by every generator.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct WriteMode {
    /// Replace files that already exist.
    #[arg(long = "force", help = "Overwrite existing files")]
    pub force: bool,

    /// Render everything but write nothing.
    #[arg(long = "preview", help = "Print generated content without writing")]
    pub preview: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    #[arg(long = "module", value_name = "PATH", help = "Go module path (default: <prefix>/<name>)")]
    pub module: Option<String>,

    #[arg(long = "framework-version", value_name = "VERSION", help = "Framework version to require")]
    pub framework_version: Option<String>,

    #[arg(
        long = "framework-replace",
        value_name = "PATH",
        help = "Local framework checkout for a replace directive"
    )]
    pub framework_replace: Option<String>,

    #[arg(long = "preview", help = "Print generated content without writing")]
    pub preview: bool,
}

// ── domain ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct DomainArgs {
    #[command(subcommand)]
    pub action: Option<DomainCommands>,

    #[command(flatten)]
    pub generate: DomainGenerateArgs,
}

#[derive(Debug, Args)]
pub struct DomainGenerateArgs {
    #[arg(
        value_name = "NAME",
        required_unless_present = "name_flag",
        help = "Domain (entity) name"
    )]
    pub name: Option<String>,

    #[arg(
        long = "name",
        value_name = "NAME",
        conflicts_with = "name",
        help = "Domain name, for names that match a subcommand"
    )]
    pub name_flag: Option<String>,

    /// Comma-separated `name[:type[:comment]]`; `type` may be
    /// `enum(a|b|c)`.
    #[arg(short = 'f', long = "fields", value_name = "FIELDS", help = "Field list")]
    pub fields: Option<String>,

    #[arg(long = "table", value_name = "TABLE", help = "Table name (default: plural snake case)")]
    pub table: Option<String>,

    #[arg(long = "route", value_name = "ROUTE", help = "Route base (default: plural kebab case)")]
    pub route: Option<String>,

    #[arg(long = "soft-delete", help = "Add a DeletedAt column")]
    pub soft_delete: bool,

    #[arg(long = "wire", help = "Register the domain in cmd/main.go")]
    pub wire: bool,

    #[arg(long = "remark", value_name = "TEXT", help = "Description stored in the entity file")]
    pub remark: Option<String>,

    #[command(flatten)]
    pub mode: WriteMode,
}

impl DomainGenerateArgs {
    /// The positional name or, failing that, `--name`.
    pub fn take_name(&mut self) -> Option<String> {
        self.name.take().or_else(|| self.name_flag.take())
    }
}

#[derive(Debug, Subcommand)]
pub enum DomainCommands {
    /// List generated domains.
    #[command(visible_alias = "ls")]
    List,
    /// Show the fields and files of one domain.
    Show { name: String },
    /// Register an existing domain in cmd/main.go.
    Wire {
        name: String,
        #[arg(long = "preview")]
        preview: bool,
    },
    /// Delete a domain and unwire it.
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub name: String,

    #[arg(short = 'y', long = "yes", help = "Skip the confirmation prompt")]
    pub yes: bool,
}

// ── service ───────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct ServiceArgs {
    #[command(subcommand)]
    pub action: Option<ServiceCommands>,

    #[command(flatten)]
    pub generate: ServiceGenerateArgs,
}

#[derive(Debug, Args)]
pub struct ServiceGenerateArgs {
    #[arg(
        value_name = "NAME",
        required_unless_present = "name_flag",
        help = "Service name (`Service` suffix optional)"
    )]
    pub name: Option<String>,

    #[arg(
        long = "name",
        value_name = "NAME",
        conflicts_with = "name",
        help = "Service name, for names that match a subcommand"
    )]
    pub name_flag: Option<String>,

    #[arg(
        long = "methods",
        value_name = "METHODS",
        value_delimiter = ',',
        help = "Comma-separated method names"
    )]
    pub methods: Vec<String>,

    #[arg(long = "remark", value_name = "TEXT", help = "Service description")]
    pub remark: Option<String>,

    #[command(flatten)]
    pub mode: WriteMode,
}

impl ServiceGenerateArgs {
    pub fn take_name(&mut self) -> Option<String> {
        self.name.take().or_else(|| self.name_flag.take())
    }
}

#[derive(Debug, Subcommand)]
pub enum ServiceCommands {
    /// List generated services.
    #[command(visible_alias = "ls")]
    List,
    /// Show where a service would be generated.
    Detect { name: String },
    /// Delete a service.
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),
}

// ── DDD building blocks ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EventArgs {
    #[arg(value_name = "DOMAIN")]
    pub domain: String,

    #[arg(value_name = "NAME", help = "Event name, e.g. OrderPaid")]
    pub name: String,

    #[arg(short = 'f', long = "fields", value_name = "FIELDS", help = "Payload fields")]
    pub fields: Option<String>,

    #[arg(long = "topic", value_name = "TOPIC", help = "Topic (default: <domain>.<action>)")]
    pub topic: Option<String>,

    #[command(flatten)]
    pub mode: WriteMode,
}

#[derive(Debug, Args)]
pub struct EventHandlerArgs {
    #[arg(value_name = "DOMAIN")]
    pub domain: String,

    #[arg(value_name = "EVENT", help = "Event the handler subscribes to")]
    pub event: String,

    #[arg(long = "topic", value_name = "TOPIC", help = "Topic (default: the event's)")]
    pub topic: Option<String>,

    #[command(flatten)]
    pub mode: WriteMode,
}

/// Policies and specifications.
#[derive(Debug, Args)]
pub struct TargetedArgs {
    #[arg(value_name = "DOMAIN")]
    pub domain: String,

    #[arg(value_name = "NAME")]
    pub name: String,

    #[arg(long = "target", value_name = "TYPE", help = "Type the rule applies to (default: any)")]
    pub target: Option<String>,

    #[command(flatten)]
    pub mode: WriteMode,
}

#[derive(Debug, Args)]
pub struct ValueObjectArgs {
    #[arg(value_name = "DOMAIN")]
    pub domain: String,

    #[arg(value_name = "NAME")]
    pub name: String,

    #[arg(short = 'f', long = "fields", value_name = "FIELDS", help = "Field list")]
    pub fields: Option<String>,

    #[command(flatten)]
    pub mode: WriteMode,
}

#[derive(Debug, Subcommand)]
pub enum DddCommands {
    /// List the building blocks of a domain.
    #[command(visible_alias = "ls")]
    List { domain: String },
    /// Rename a building block.
    Rename {
        domain: String,
        #[arg(value_enum)]
        kind: ArtifactArg,
        name: String,
        new_name: String,
        #[arg(long = "force", help = "Replace an existing file with the new name")]
        force: bool,
    },
    /// Delete a building block.
    #[command(visible_alias = "rm")]
    Delete {
        domain: String,
        #[arg(value_enum)]
        kind: ArtifactArg,
        name: String,
        #[arg(short = 'y', long = "yes", help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArtifactArg {
    #[value(name = "valueobject", alias = "vo")]
    ValueObject,
    Spec,
    Policy,
    Event,
    #[value(name = "event-handler")]
    EventHandler,
}

// ── serve ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long = "host", value_name = "HOST", help = "Bind address (default: server.host)")]
    pub host: Option<String>,

    #[arg(short = 'p', long = "port", value_name = "PORT", help = "Port (default: server.port)")]
    pub port: Option<u16>,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print all configuration values.
    List,
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `server.port`.
        key: String,
    },
    /// Print the path to the configuration file.
    Path,
    /// Write the current configuration to the config file.
    Init {
        /// Write `./.soliton-gen.toml` instead of the user config dir.
        #[arg(long = "local")]
        local: bool,
        #[arg(short = 'f', long = "force", help = "Overwrite an existing file")]
        force: bool,
    },
}

// ── tests ─────────────────────────────────────────────────────────────────────
