//! Fixturegen: materialize sample app directories by fanning a scaffolding tool out over a
//! bounded worker pool.

pub mod engine;
pub mod pipeline;
pub mod presets;
pub mod sizing;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;

use crate::engine::tools::{prepare_output_root, select_items, validate_fixture_set};
use crate::pipeline::{RunContext, run_items};

/// Result alias used by public fixturegen API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: run every selected item of `set` and return the summary.
///
/// - Worker count comes from [`sizing::plan_workers`]; with too few hardware threads under
///   [`LowThreadPolicy::Refuse`] this returns an error before any item runs.
/// - `on_report` is called on the calling thread once per item, in completion order.
/// - Tool failures do **not** make this return `Err`; they are in the summary. Use
///   [`pipeline::check_for_failures`] to turn them into an error.
///
/// ```ignore
/// let set = fixturegen::presets::starters();
/// let summary = fixturegen::generate(&set, &fixturegen::Opts::default(), |_| {})?;
/// fixturegen::pipeline::check_for_failures(&summary)?;
/// ```
pub fn generate<F>(set: &FixtureSet, opts: &Opts, on_report: F) -> Result<RunSummary>
where
    F: FnMut(&ItemReport),
{
    validate_fixture_set(set)?;
    let items = select_items(&set.items, &opts.only)?;

    let threads = opts.hardware_threads.or_else(sizing::hardware_threads);
    let policy = opts.low_threads.unwrap_or(set.low_threads);
    let plan = sizing::plan_workers(threads, policy, opts.workers)?.capped(items.len());
    debug!(
        "{} items, {:?}, output root {}",
        items.len(),
        plan,
        set.output_root.display()
    );

    if !opts.dry_run {
        prepare_output_root(&set.output_root, &set.seed_files)?;
    }

    let ctx = RunContext::new(set, opts);
    let reports = run_items(&items, plan, &ctx, on_report)?;
    Ok(RunSummary {
        workers: plan.workers(),
        reports,
    })
}
