use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::types::{FixtureSet, Opts};

/// Read-only state shared by all workers for one run.
#[derive(Clone, Debug)]
pub struct RunContext {
    pub output_root: PathBuf,
    pub tool: Vec<String>,
    pub trailing_flags: Vec<String>,
    pub skip_existing: bool,
    pub claim: bool,
    pub post_remove: Vec<PathBuf>,
    pub dry_run: bool,
    pub tool_output: bool,
    pub cancel: Arc<AtomicBool>,
}

impl RunContext {
    pub fn new(set: &FixtureSet, opts: &Opts) -> Self {
        Self {
            output_root: set.output_root.clone(),
            tool: set.tool.clone(),
            trailing_flags: set.trailing_flags.clone(),
            skip_existing: set.skip_existing,
            // Dry runs must not touch the filesystem.
            claim: set.claim && !opts.dry_run,
            post_remove: set.post_remove.clone(),
            dry_run: opts.dry_run,
            tool_output: opts.tool_output,
            cancel: opts.cancel.clone().unwrap_or_default(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}
