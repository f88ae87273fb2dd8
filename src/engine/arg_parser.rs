use clap::Parser;
use std::path::PathBuf;

use crate::presets::Preset;
use crate::types::LowThreadPolicy;

/// Generate test fixtures by running a scaffolding tool once per template.
#[derive(Clone, Parser)]
#[command(name = "fixturegen")]
#[command(
    about = "Run a scaffolding tool once per fixture item across a bounded worker pool; existing fixtures are skipped."
)]
pub struct Cli {
    /// Only generate these items. Default: every item in the set.
    #[arg(value_name = "ITEMS")]
    pub items: Vec<String>,

    /// Fixture manifest (TOML). Default: `.fixturegen.toml` in the current directory.
    #[arg(long, short = 'm', conflicts_with = "preset")]
    pub manifest: Option<PathBuf>,

    /// Built-in fixture set.
    #[arg(long, short = 'p', value_enum)]
    pub preset: Option<Preset>,

    /// Override the set's output root.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_root: Option<PathBuf>,

    /// Worker count. Default: min(12, 3/8 of hardware threads).
    #[arg(long, short = 'w', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// What to do with fewer than 6 hardware threads. Default: the set's policy.
    #[arg(long, value_enum)]
    pub low_threads: Option<LowThreadPolicy>,

    /// Print the command lines that would run; create nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// List the set's items and exit.
    #[arg(long, short = 'l')]
    pub list: bool,

    /// Do not create per-item claim markers.
    #[arg(long)]
    pub no_claim: bool,

    /// Let the tool write to this terminal instead of discarding its output.
    #[arg(long)]
    pub show_tool_output: bool,

    /// Show a progress bar.
    #[arg(long)]
    pub progress: bool,

    /// Write a JSON run report to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
