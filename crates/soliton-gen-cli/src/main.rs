//! # soliton-gen
//!
//! DDD scaffolding for Soliton-Go projects.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load configuration (defaults, file, environment).
//! 4. Build the [`OutputManager`] and command [`Context`].
//! 5. Dispatch to the appropriate command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                         |
//! |------|---------------------------------|
//! |  0   | Success                         |
//! |  1   | Any failure                     |
//! |  2   | Argument parsing failed (clap)  |

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    commands::Context,
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // Missing .env is fine.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    let _guard = match init_logging(&cli.global) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::from(1);
        }
    };

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e:#}");
            eprintln!("Error: failed to load configuration: {e:#}");
            return ExitCode::from(1);
        }
    };

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;
    let ctx = Context::new(cli.global, config, output);

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    match run(cli.command, &ctx) {
        Ok(()) => {
            info!("soliton-gen completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

#[instrument(skip_all)]
fn run(command: Commands, ctx: &Context) -> CliResult<()> {
    match command {
        Commands::Init(args) => commands::init::execute(args, ctx),
        Commands::Domain(args) => commands::domain::execute(args, ctx),
        Commands::Service(args) => commands::service::execute(args, ctx),
        Commands::Event(args) => commands::ddd::event(args, ctx),
        Commands::EventHandler(args) => commands::ddd::event_handler(args, ctx),
        Commands::Policy(args) => commands::ddd::policy(args, ctx),
        Commands::Spec(args) => commands::ddd::specification(args, ctx),
        Commands::ValueObject(args) => commands::ddd::value_object(args, ctx),
        Commands::Ddd(cmd) => commands::ddd::execute(cmd, ctx),
        Commands::Tidy => commands::tidy::execute(ctx),
        Commands::Serve(args) => commands::serve::execute(args, ctx),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd, &ctx.config, &ctx.output),
    }
}

/// The single place where structured errors become stderr text and an exit
/// code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    let msg = if std::io::stderr().is_terminal() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
