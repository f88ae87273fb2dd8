use anyhow::Result;

use crate::engine::claim::claim_path_for;
use crate::types::{ItemOutcome, ItemReport, RunSummary};

/// Claimed by another run, yet the target is still missing once this run is over: either that
/// run is still going or it died and left its marker behind.
pub fn is_unresolved_claim(report: &ItemReport) -> bool {
    report.outcome == ItemOutcome::Claimed && !report.target.exists()
}

/// Turn any failed item, or any claim that never produced its target, into an error for a
/// non-zero exit. Call after the run completes.
pub fn check_for_failures(summary: &RunSummary) -> Result<()> {
    let failed: Vec<String> = summary
        .reports
        .iter()
        .filter(|r| r.outcome.is_failure() || is_unresolved_claim(r))
        .map(|r| format!("{} ({})", r.name, describe_report(r)))
        .collect();
    if failed.is_empty() {
        return Ok(());
    }
    Err(anyhow::anyhow!(
        "{} of {} fixture(s) failed: {}",
        failed.len(),
        summary.reports.len(),
        failed.join(", ")
    ))
}

fn describe_report(report: &ItemReport) -> String {
    match (&report.outcome, report.target.parent()) {
        (ItemOutcome::Claimed, Some(root)) => format!(
            "{}; remove {} or rerun with --no-claim if no other run is active",
            describe_failure(&report.outcome),
            claim_path_for(root, &report.name).display()
        ),
        _ => describe_failure(&report.outcome),
    }
}

/// Short human description of a failure outcome.
pub fn describe_failure(outcome: &ItemOutcome) -> String {
    match outcome {
        ItemOutcome::ToolFailed { code } => format!("exit code {code}"),
        ItemOutcome::ToolCrashed { signal: Some(sig) } => format!("killed by signal {sig}"),
        ItemOutcome::ToolCrashed { signal: None } => "terminated abnormally".to_string(),
        ItemOutcome::Error { message } => message.clone(),
        ItemOutcome::Cancelled => "cancelled".to_string(),
        ItemOutcome::Claimed => "claimed by another run, target not created".to_string(),
        other => format!("{other:?}"),
    }
}
