use anyhow::{Context, Result};
use crossbeam_channel::{Sender, bounded};
use log::debug;
use rayon::prelude::*;

use crate::types::{ItemReport, PoolPlan, WorkItem};

use super::context::RunContext;
use super::worker::run_item;

/// Dispatch `items` according to `plan` and collect one report per item.
///
/// Reports arrive in completion order; `on_report` runs on the calling thread as each one
/// lands, so it may print or drive a progress bar without locking.
pub fn run_items<F>(
    items: &[&WorkItem],
    plan: PoolPlan,
    ctx: &RunContext,
    mut on_report: F,
) -> Result<Vec<ItemReport>>
where
    F: FnMut(&ItemReport),
{
    // Capacity covers every item, so workers never block on send.
    let (report_tx, report_rx) = bounded::<ItemReport>(items.len().max(1));

    std::thread::scope(|s| {
        let handle = s.spawn(move || dispatch(items, plan, ctx, report_tx));

        let mut reports = Vec::with_capacity(items.len());
        while let Ok(report) = report_rx.recv() {
            on_report(&report);
            reports.push(report);
        }
        debug!("Report channel closed, {} reports", reports.len());

        handle
            .join()
            .map_err(|_| anyhow::anyhow!("dispatch thread panicked"))??;
        Ok(reports)
    })
}

/// Run every item, sending its report on `report_tx`. Dropping the sender(s) closes the channel.
fn dispatch(
    items: &[&WorkItem],
    plan: PoolPlan,
    ctx: &RunContext,
    report_tx: Sender<ItemReport>,
) -> Result<()> {
    match plan {
        PoolPlan::Sequential => {
            debug!("Dispatching {} items sequentially", items.len());
            for item in items {
                let _ = report_tx.send(run_item(item, ctx));
            }
        }
        PoolPlan::Parallel(n) => {
            debug!("Dispatching {} items across {} workers", items.len(), n);
            let pool = build_worker_pool(n)?;
            pool.install(|| {
                items.par_iter().for_each_with(report_tx, |tx, item| {
                    let _ = tx.send(run_item(item, ctx));
                });
            });
        }
    }
    Ok(())
}

/// Dedicated pool so a run never exceeds `n` concurrent children, independent of the global pool.
pub fn build_worker_pool(n: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n)
        .thread_name(|i| format!("{}-worker-{}", env!("CARGO_PKG_NAME"), i))
        .build()
        .context("build worker pool")
}
