//! CLI command handler: resolve the fixture set, run it, print notices, set the exit status.

use anyhow::{Context, Result, bail};
use kdam::Animation;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::arg_parser::Cli;
use crate::engine::claim::claim_path_for;
use crate::engine::progress::{
    ProgressBar, ProgressBarConfig, create_progress_bar, update_progress_bar, write_above_bar,
};
use crate::engine::tools::select_items;
use crate::pipeline::{check_for_failures, describe_failure};
use crate::presets::Preset;
use crate::types::{FixtureSet, ItemOutcome, ItemReport, Opts, RunSummary};
use crate::utils::config::{PROGRESS_DESC, PackagePaths};
use crate::utils::manifest::{find_manifest, load_manifest};
use crate::utils::{Colors, setup_logging};

/// Preset, explicit manifest, or `.fixturegen.toml` in `cwd`, with CLI overrides applied.
pub fn resolve_fixture_set(cli: &Cli, cwd: &Path) -> Result<FixtureSet> {
    let mut set = match (&cli.preset, &cli.manifest) {
        (Some(preset), _) => preset.fixture_set(),
        (None, Some(path)) => load_manifest(path)?,
        (None, None) => match find_manifest(cwd) {
            Some(path) => {
                debug!("Using manifest {}", path.display());
                load_manifest(&path)?
            }
            None => bail!(
                "no fixture set: pass --preset ({}) or --manifest, or create {}",
                preset_names(),
                PackagePaths::get().manifest_filename()
            ),
        },
    };
    if let Some(root) = &cli.output_root {
        set.output_root = root.clone();
    }
    if cli.no_claim {
        set.claim = false;
    }
    Ok(set)
}

fn preset_names() -> String {
    use clap::ValueEnum;
    Preset::value_variants()
        .iter()
        .filter_map(|p| p.to_possible_value())
        .map(|v| v.get_name().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn setup_opts(cli: &Cli, cancel: Arc<AtomicBool>) -> Opts {
    Opts {
        workers: cli.workers,
        hardware_threads: None,
        low_threads: cli.low_threads,
        only: cli.items.clone(),
        dry_run: cli.dry_run,
        tool_output: cli.show_tool_output,
        cancel: Some(cancel),
    }
}

/// One console line per item; `None` for outcomes that need no notice.
pub fn notice_for(report: &ItemReport) -> Option<String> {
    match &report.outcome {
        ItemOutcome::Created => Some(Colors::created(&report.name)),
        ItemOutcome::AlreadyExists => Some(Colors::exists(&report.name)),
        ItemOutcome::Claimed => Some(match report.target.parent() {
            Some(root) => format!(
                "Fixture {} is claimed by {} (another run, or a stale marker; see --no-claim).",
                report.name,
                claim_path_for(root, &report.name).display()
            ),
            None => format!("Fixture {} is being generated by another run.", report.name),
        }),
        ItemOutcome::Planned => report.command.clone(),
        other => Some(Colors::failed(&report.name, &describe_failure(other))),
    }
}

fn print_list(set: &FixtureSet) {
    println!(
        "{} -> {}",
        set.tool.join(" "),
        set.output_root.display()
    );
    for item in &set.items {
        println!("  {:<24} {}", item.name, item.args.join(" "));
    }
}

/// Number of items a run of `set` restricted to `only` will report.
pub fn progress_total(set: &FixtureSet, only: &[String]) -> Result<usize> {
    Ok(select_items(&set.items, only)?.len())
}

fn write_report(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serialize run report")?;
    std::fs::write(path, json).with_context(|| format!("write run report {}", path.display()))
}

/// Run the fixture set described by `cli`. Errors on precondition failure or any failed item.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose);
    let cwd = std::env::current_dir().context("read current directory")?;
    let set = resolve_fixture_set(cli, &cwd)?;
    if cli.list {
        print_list(&set);
        return Ok(());
    }

    let cancel_requested = Arc::new(AtomicBool::new(false));
    let cancel_requested_handler = Arc::clone(&cancel_requested);
    ctrlc::set_handler(move || {
        cancel_requested_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    let opts = setup_opts(cli, Arc::clone(&cancel_requested));
    if opts.dry_run {
        warn!("DRY RUN: NO COMMANDS WILL BE EXECUTED.");
    }

    let total = progress_total(&set, &opts.only)?;
    let bar: Option<ProgressBar> = cli.progress.then(|| {
        create_progress_bar(ProgressBarConfig::new(
            total,
            PROGRESS_DESC,
            Animation::Classic,
        ))
    });

    let summary = crate::generate(&set, &opts, |report| {
        if let Some(line) = notice_for(report) {
            match &bar {
                Some(bar) => write_above_bar(bar, line),
                None => println!("{line}"),
            }
        }
        if let Some(bar) = &bar {
            update_progress_bar(bar, 1);
        }
    })?;
    if bar.is_some() {
        eprintln!();
    }

    info!(
        "{} created, {} skipped, {} failed ({} workers)",
        summary.created(),
        summary.skipped(),
        summary.failed(),
        summary.workers
    );
    if let Some(path) = &cli.report {
        write_report(path, &summary)?;
    }
    if cancel_requested.load(Ordering::Relaxed) {
        bail!("Generation cancelled by user");
    }
    check_for_failures(&summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use std::time::Duration;

    fn report(outcome: ItemOutcome, command: Option<&str>) -> ItemReport {
        ItemReport {
            name: "react".into(),
            target: PathBuf::from("out/react"),
            command: command.map(String::from),
            outcome,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn notices() {
        colored::control::set_override(false);
        assert_eq!(
            notice_for(&report(ItemOutcome::Created, None)).unwrap(),
            "Created fixture react."
        );
        assert_eq!(
            notice_for(&report(ItemOutcome::AlreadyExists, None)).unwrap(),
            "Fixture react already exists."
        );
        assert_eq!(
            notice_for(&report(ItemOutcome::Planned, Some("tool out/react"))).unwrap(),
            "tool out/react"
        );
        assert_eq!(
            notice_for(&report(ItemOutcome::ToolFailed { code: 1 }, None)).unwrap(),
            "Failed fixture react: exit code 1"
        );
        let claimed = notice_for(&report(ItemOutcome::Claimed, None)).unwrap();
        assert!(claimed.contains("out/.react.claim"), "{claimed}");
        assert!(claimed.contains("--no-claim"), "{claimed}");
    }

    #[test]
    fn progress_total_counts_distinct_items() {
        let cli = Cli::try_parse_from(["fixturegen", "-p", "apps", "react", "react"]).unwrap();
        let set = resolve_fixture_set(&cli, Path::new("/nonexistent")).unwrap();
        assert_eq!(progress_total(&set, &cli.items).unwrap(), 1);
        assert_eq!(progress_total(&set, &[]).unwrap(), set.items.len());
        assert!(progress_total(&set, &["nope".to_string()]).is_err());
    }

    #[test]
    fn preset_with_overrides() {
        let cli = Cli::try_parse_from([
            "fixturegen",
            "-p",
            "apps",
            "-o",
            "elsewhere",
            "--no-claim",
        ])
        .unwrap();
        let set = resolve_fixture_set(&cli, Path::new("/nonexistent")).unwrap();
        assert_eq!(set.output_root, PathBuf::from("elsewhere"));
        assert!(!set.claim);
        assert_eq!(set.tool, ["npx", "create-snowpack-app"]);
    }

    #[test]
    fn manifest_found_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".fixturegen.toml"),
            "[settings]\ntool = [\"mkdir\"]\n\n[[item]]\nname = \"one\"\n",
        )
        .unwrap();
        let cli = Cli::try_parse_from(["fixturegen"]).unwrap();
        let set = resolve_fixture_set(&cli, dir.path()).unwrap();
        assert_eq!(set.items.len(), 1);
        assert_eq!(set.tool, ["mkdir"]);
    }

    #[test]
    fn no_set_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from(["fixturegen"]).unwrap();
        let err = resolve_fixture_set(&cli, dir.path()).unwrap_err().to_string();
        assert!(err.contains("apps, starters"), "{err}");
    }
}
