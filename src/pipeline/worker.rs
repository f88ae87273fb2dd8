//! One item, start to finish: claim, existence check, invoke, map status, clean up.

use log::{debug, warn};
use std::time::Instant;

use crate::engine::claim::{ClaimGuard, claim_path_for};
use crate::engine::command::{ToolInvocation, outcome_from_status};
use crate::engine::tools::{remove_post_paths, target_dir_for};
use crate::types::{ItemOutcome, ItemReport, WorkItem};

use super::context::RunContext;

/// Run `item` and report what happened. Never panics on tool or filesystem failure; those
/// become [`ItemOutcome`] values.
pub fn run_item(item: &WorkItem, ctx: &RunContext) -> ItemReport {
    let start = Instant::now();
    let target = target_dir_for(&ctx.output_root, item);
    let mut command = None;
    let outcome = run_item_inner(item, ctx, &target, &mut command);
    ItemReport {
        name: item.name.clone(),
        target,
        command,
        outcome,
        elapsed: start.elapsed(),
    }
}

fn run_item_inner(
    item: &WorkItem,
    ctx: &RunContext,
    target: &std::path::Path,
    command: &mut Option<String>,
) -> ItemOutcome {
    if ctx.is_cancelled() {
        return ItemOutcome::Cancelled;
    }

    // Held until this function returns, i.e. after the tool and cleanup finish.
    let _claim = if ctx.claim {
        match ClaimGuard::acquire(&ctx.output_root, &item.name) {
            Ok(Some(guard)) => Some(guard),
            Ok(None) => {
                warn!(
                    "{} is claimed by {}; remove it or pass --no-claim if no other run is active",
                    item.name,
                    claim_path_for(&ctx.output_root, &item.name).display()
                );
                return ItemOutcome::Claimed;
            }
            Err(e) => return error_outcome(e),
        }
    } else {
        None
    };

    if ctx.skip_existing && target.exists() {
        return ItemOutcome::AlreadyExists;
    }

    let invocation =
        match ToolInvocation::for_item(&ctx.tool, target, item, &ctx.trailing_flags) {
            Ok(inv) => inv,
            Err(e) => return error_outcome(e),
        };
    let rendered = invocation.render();
    debug!("{}: {}", item.name, rendered);
    *command = Some(rendered);

    if ctx.dry_run {
        return ItemOutcome::Planned;
    }

    let outcome = match invocation.run(ctx.tool_output) {
        Ok(status) => outcome_from_status(status),
        Err(e) => return error_outcome(e),
    };
    if outcome != ItemOutcome::Created {
        warn!("{}: tool did not succeed ({:?})", item.name, outcome);
        return outcome;
    }

    match remove_post_paths(target, &ctx.post_remove) {
        Ok(()) => ItemOutcome::Created,
        Err(e) => error_outcome(e),
    }
}

fn error_outcome(e: anyhow::Error) -> ItemOutcome {
    ItemOutcome::Error {
        message: format!("{e:#}"),
    }
}
