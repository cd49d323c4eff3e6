//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use soliton_gen_core::domain::{DeleteResult, FileStatus, GeneratedFile, GenerationResult};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => match config.output.format.as_str() {
                "human" => OutputFormat::Human,
                "plain" => OutputFormat::Plain,
                "json" => OutputFormat::Json,
                _ => OutputFormat::Auto,
            },
            explicit => explicit,
        };
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Pretty JSON on stdout. Never suppressed: it is the command's result.
    pub fn json<T: Serialize>(&self, value: &T) -> CliResult<()> {
        let text = serde_json::to_string_pretty(value).map_err(|e| CliError::IoError {
            message: "failed to serialise output".into(),
            source: io::Error::other(e),
        })?;
        self.term.write_line(&text)?;
        Ok(())
    }

    /// One `[STATUS] path` line per file, preview bodies, warnings, then
    /// the summary message.
    pub fn generation(&self, result: &GenerationResult) -> CliResult<()> {
        if self.is_json() {
            return self.json(result);
        }
        for file in &result.files {
            self.file_line(file)?;
            if let Some(content) = &file.content {
                self.print(content.trim_end_matches('\n'))?;
                self.print("")?;
            }
        }
        for warning in &result.warnings {
            self.warning(warning)?;
        }
        if result.success {
            self.success(&result.message)?;
        }
        Ok(())
    }

    pub fn deletion(&self, result: &DeleteResult) -> CliResult<()> {
        if self.is_json() {
            return self.json(result);
        }
        for item in &result.deleted_items {
            self.print(&format!("  {} {item}", self.tag("[DELETED]", FileStatus::Skip)))?;
        }
        if result.success {
            self.success(&result.message)?;
        }
        Ok(())
    }

    fn file_line(&self, file: &GeneratedFile) -> io::Result<()> {
        let tag = format!("[{}]", file.status.as_str().to_ascii_uppercase());
        let mut line = format!("  {} {}", self.tag(&tag, file.status), file.path.display());
        if let Some(reason) = &file.error {
            line.push_str(&format!(": {reason}"));
        }
        if file.status == FileStatus::Error {
            // Errors stay visible in quiet mode.
            return self.term.write_line(&line);
        }
        self.print(&line)
    }

    fn tag(&self, tag: &str, status: FileStatus) -> String {
        if self.no_color {
            return tag.to_string();
        }
        match status {
            FileStatus::New => tag.green().bold().to_string(),
            FileStatus::Overwrite => tag.yellow().bold().to_string(),
            FileStatus::Skip => tag.dimmed().to_string(),
            FileStatus::Error => tag.red().bold().to_string(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

/// Turns a finished result into the command's outcome.
pub fn check(result: &GenerationResult) -> CliResult<()> {
    if result.success {
        return Ok(());
    }
    Err(CliError::GenerationFailed {
        message: result.message.clone(),
        errors: result.errors.clone(),
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────
