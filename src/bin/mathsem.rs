//! Binary entry point for the mathsem CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Rewrite a tree read from a file, pretty JSON on stdout
//! mathsem transform formula.json
//!
//! # Read from stdin, print an outline, repair wrong child counts
//! cat formula.json | mathsem transform --format outline --structure repair
//!
//! # List element kinds and their rules
//! mathsem kinds
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use mathsem::cli::{
    parse_input_with, read_input, render, render_kinds, run_transform, RenderFormat,
};
use mathsem::config::{CliOverrides, ResolvedConfig, StructurePolicy};
use mathsem::error::{MathsemError, OutputErrorCode};
use mathsem::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Rewrite presentation MathML trees into semantic trees.
///
/// Input is a JSON presentation tree; output is the semantic tree as JSON
/// or as an indented outline.
#[derive(Parser, Debug)]
#[command(name = "mathsem", version, about = "Presentation to semantic math trees")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Output format for the transform command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Full JSON response (default).
    #[default]
    Json,
    /// Indented outline, one node per line.
    Outline,
}

impl From<Format> for RenderFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => RenderFormat::Json,
            Format::Outline => RenderFormat::Outline,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite a presentation tree into a semantic tree.
    Transform {
        /// JSON input file; stdin when omitted or `-`.
        input: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value = "json")]
        format: Format,

        /// Single-line JSON.
        #[arg(long)]
        compact: bool,

        /// Maximum nesting depth (overrides MATHSEM_MAX_DEPTH).
        #[arg(long, value_parser = parse_max_depth)]
        max_depth: Option<usize>,

        /// Wrong child counts: `strict` fails, `repair` pads or truncates
        /// (overrides MATHSEM_STRUCTURE).
        #[arg(long)]
        structure: Option<StructurePolicy>,
    },
    /// List every element kind with the rule that rewrites it.
    Kinds,
}

fn parse_max_depth(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(depth) if depth > 0 => Ok(depth),
        _ => Err(format!("invalid depth '{}', expected a positive integer", s)),
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_format);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON, like successful responses.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, format: LogFormat) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), MathsemError> {
    match cli.command {
        Command::Transform {
            input,
            format,
            compact,
            max_depth,
            structure,
        } => execute_transform(
            input,
            format,
            compact,
            CliOverrides {
                max_depth,
                structure,
            },
        ),
        Command::Kinds => execute_kinds(),
    }
}

// ============================================================================
// Command Executors
// ============================================================================

fn execute_transform(
    input: Option<PathBuf>,
    format: Format,
    compact: bool,
    overrides: CliOverrides,
) -> Result<(), MathsemError> {
    let config = ResolvedConfig::resolve(&overrides)?;
    tracing::debug!(
        max_depth = config.max_depth.value,
        max_depth_source = ?config.max_depth.source,
        structure = %config.structure.value,
        structure_source = ?config.structure.source,
        "resolved configuration"
    );

    let source = read_input(input.as_deref())?;
    let tree = parse_input_with(&source, config.max_depth.value)?;
    let response = run_transform(&tree, &config.to_options())?;

    let mut stdout = io::stdout().lock();
    render(&response, format.into(), compact, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn execute_kinds() -> Result<(), MathsemError> {
    let mut stdout = io::stdout().lock();
    render_kinds(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}
