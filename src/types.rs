//! Public and internal types for the fixturegen API and pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

/// One named unit of scaffolding work. Identity is the name; the target directory is
/// `<output_root>/<name>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkItem {
    pub name: String,
    /// Argv tokens passed to the tool after the target directory.
    pub args: Vec<String>,
}

impl WorkItem {
    pub fn new<N, I, S>(name: N, args: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// What to do when the machine has fewer hardware threads than the pool heuristic needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LowThreadPolicy {
    /// Fail before any item is processed.
    #[default]
    Refuse,
    /// Run every item one at a time.
    Sequential,
}

/// How items are dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolPlan {
    /// Bounded pool with this many workers (always >= 2).
    Parallel(usize),
    /// One item at a time on the calling thread.
    Sequential,
}

impl PoolPlan {
    pub fn workers(&self) -> usize {
        match self {
            PoolPlan::Parallel(n) => *n,
            PoolPlan::Sequential => 1,
        }
    }

    /// Never more workers than items; a single worker becomes sequential.
    pub fn capped(self, items: usize) -> Self {
        match self {
            PoolPlan::Parallel(n) if n.min(items) >= 2 => PoolPlan::Parallel(n.min(items)),
            _ => PoolPlan::Sequential,
        }
    }
}

/// A resolved item table plus everything needed to invoke the tool for it.
#[derive(Clone, Debug)]
pub struct FixtureSet {
    /// Directory that holds one subdirectory per item.
    pub output_root: PathBuf,
    /// Tool entrypoint argv, e.g. `["node", "dist/index.js"]`. Never empty.
    pub tool: Vec<String>,
    /// Flags appended after every item's own arguments.
    pub trailing_flags: Vec<String>,
    pub items: Vec<WorkItem>,
    pub low_threads: LowThreadPolicy,
    /// Skip items whose target directory already exists.
    pub skip_existing: bool,
    /// Reserve each item with an exclusive marker before checking/creating it.
    pub claim: bool,
    /// Paths (relative to each created item dir) deleted after the tool succeeds.
    pub post_remove: Vec<PathBuf>,
    /// Files copied into the output root before dispatch (if not already there).
    pub seed_files: Vec<PathBuf>,
}

/// Result of running one item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// The tool exited successfully.
    Created,
    /// Target directory was already there; no child process.
    AlreadyExists,
    /// Another run holds this item's claim marker.
    Claimed,
    /// Dry run: the command line was built but not executed.
    Planned,
    /// The tool exited with a non-zero code.
    ToolFailed { code: i32 },
    /// The tool was terminated without an exit code (signal on Unix).
    ToolCrashed { signal: Option<i32> },
    /// Spawn or filesystem failure around the tool.
    Error { message: String },
    /// Not dispatched because the run was cancelled.
    Cancelled,
}

impl ItemOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ItemOutcome::ToolFailed { .. }
                | ItemOutcome::ToolCrashed { .. }
                | ItemOutcome::Error { .. }
                | ItemOutcome::Cancelled
        )
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, ItemOutcome::AlreadyExists | ItemOutcome::Claimed)
    }
}

/// Per-item report streamed back from the workers.
#[derive(Clone, Debug, Serialize)]
pub struct ItemReport {
    pub name: String,
    pub target: PathBuf,
    /// Rendered command line; `None` when the item never got that far.
    pub command: Option<String>,
    pub outcome: ItemOutcome,
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
}

/// Outcome of a whole run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunSummary {
    pub workers: usize,
    pub reports: Vec<ItemReport>,
}

impl RunSummary {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Created))
    }

    pub fn skipped(&self) -> usize {
        self.count(ItemOutcome::is_skip)
    }

    pub fn failed(&self) -> usize {
        self.count(ItemOutcome::is_failure)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemReport> {
        self.reports.iter().filter(|r| r.outcome.is_failure())
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Runtime options (CLI and lib). Per-set settings live on [`FixtureSet`].
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Override worker count. When None, derived from hardware threads.
    pub workers: Option<usize>,
    /// Override detected hardware thread count.
    pub hardware_threads: Option<usize>,
    /// Override the set's low-thread policy.
    pub low_threads: Option<LowThreadPolicy>,
    /// Restrict the run to these item names.
    pub only: Vec<String>,
    /// Build command lines but run nothing.
    pub dry_run: bool,
    /// Let the tool write to our stdout/stderr instead of discarding.
    pub tool_output: bool,
    /// Set from the Ctrl+C handler; workers stop picking up new items.
    pub cancel: Option<Arc<AtomicBool>>,
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_capped_by_item_count() {
        assert_eq!(PoolPlan::Parallel(1_000_000).capped(3), PoolPlan::Parallel(3));
        assert_eq!(PoolPlan::Parallel(4).capped(12), PoolPlan::Parallel(4));
        assert_eq!(PoolPlan::Parallel(4).capped(1), PoolPlan::Sequential);
        assert_eq!(PoolPlan::Parallel(4).capped(0), PoolPlan::Sequential);
        assert_eq!(PoolPlan::Sequential.capped(12), PoolPlan::Sequential);
    }
}
