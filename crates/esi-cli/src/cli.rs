//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use esi_model::SessionId;

#[derive(Parser)]
#[command(
    name = "esi",
    version,
    about = "Supporting Information pages with embedded 3D molecule viewers",
    long_about = "Compose Supporting Information report pages.\n\n\
                  Replaces viewer placeholders in per-molecule reports, renders\n\
                  viewer snapshots headlessly, and lists the export endpoints of a session."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compose a report page, optionally with the viewer image archive.
    Render(RenderArgs),

    /// List the export endpoints of a session.
    Links(LinksArgs),

    /// Print the normalized PDB and XYZ blocks of a structure.
    Pdb(PdbArgs),

    /// Remove stale session directories from the uploads directory.
    Clean(CleanArgs),

    /// Print a fresh, unused session id.
    Session,
}

#[derive(Parser)]
pub struct RenderArgs {
    /// Report markup files, in page order.
    #[arg(value_name = "REPORT", required = true)]
    pub reports: Vec<PathBuf>,

    /// Directory holding `<stem>.pdb` for every report.
    #[arg(long = "structures", value_name = "DIR")]
    pub structures: PathBuf,

    /// Output page path.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: PathBuf,

    /// Session id (default: a fresh one).
    #[arg(long = "session", value_name = "UUID")]
    pub session: Option<SessionId>,

    /// Load every viewer headlessly and save `<session>_images.zip` next to the page.
    #[arg(long = "images")]
    pub images: bool,
}

#[derive(Parser)]
pub struct LinksArgs {
    /// Session id.
    #[arg(long = "session", value_name = "UUID")]
    pub session: SessionId,

    /// Report template for the text and archive endpoints.
    #[arg(long = "template", value_name = "NAME")]
    pub template: Option<String>,
}

#[derive(Parser)]
pub struct PdbArgs {
    /// PDB file to read.
    #[arg(value_name = "STRUCTURE")]
    pub structure: PathBuf,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Uploads directory (default: from settings).
    #[arg(long = "uploads", value_name = "DIR")]
    pub uploads: Option<PathBuf>,

    /// Maximum session age in hours (default: from settings).
    #[arg(long = "max-age-hours", value_name = "HOURS")]
    pub max_age_hours: Option<u64>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
