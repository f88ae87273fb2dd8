//! Build and run one scaffolding-tool invocation.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::types::{ItemOutcome, WorkItem};

/// `<tool...> <target> <item args...> <trailing flags...>`, executed without a shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolInvocation {
    program: OsString,
    args: Vec<OsString>,
}

impl ToolInvocation {
    pub fn for_item(
        tool: &[String],
        target: &Path,
        item: &WorkItem,
        trailing_flags: &[String],
    ) -> Result<Self> {
        let (program, tool_args) = tool.split_first().context("empty tool entrypoint")?;
        let args = tool_args
            .iter()
            .map(OsString::from)
            .chain(std::iter::once(target.as_os_str().to_os_string()))
            .chain(item.args.iter().map(OsString::from))
            .chain(trailing_flags.iter().map(OsString::from))
            .collect();
        Ok(Self {
            program: program.into(),
            args,
        })
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Space-joined command line for notices and reports.
    pub fn render(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion. Output is discarded unless `show_output`.
    pub fn run(&self, show_output: bool) -> Result<ExitStatus> {
        let stdio = || {
            if show_output {
                Stdio::inherit()
            } else {
                Stdio::null()
            }
        };
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(stdio())
            .stderr(stdio())
            .status()
            .with_context(|| format!("spawn {}", self.program.to_string_lossy()))
    }
}

/// Map a finished child's status to an item outcome.
pub fn outcome_from_status(status: ExitStatus) -> ItemOutcome {
    if status.success() {
        return ItemOutcome::Created;
    }
    match status.code() {
        Some(code) => ItemOutcome::ToolFailed { code },
        None => ItemOutcome::ToolCrashed {
            signal: exit_signal(&status),
        },
    }
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn starter_invocation() -> ToolInvocation {
        let item = WorkItem::new("blank", ["--base-template", "blank", "--no-typescript"]);
        ToolInvocation::for_item(
            &["node".into(), "dist/index.js".into()],
            &PathBuf::from("snowpack-starters/blank"),
            &item,
            &["--skip-git-init".into()],
        )
        .unwrap()
    }

    #[test]
    fn argument_order() {
        let inv = starter_invocation();
        assert_eq!(inv.program(), "node");
        let args: Vec<_> = inv.args().iter().map(|a| a.to_string_lossy()).collect();
        assert_eq!(
            args,
            [
                "dist/index.js",
                "snowpack-starters/blank",
                "--base-template",
                "blank",
                "--no-typescript",
                "--skip-git-init",
            ]
        );
    }

    #[test]
    fn render_joins_with_spaces() {
        assert_eq!(
            starter_invocation().render(),
            "node dist/index.js snowpack-starters/blank --base-template blank --no-typescript --skip-git-init"
        );
    }

    #[test]
    fn empty_tool_is_an_error() {
        let item = WorkItem::new("x", Vec::<String>::new());
        assert!(ToolInvocation::for_item(&[], Path::new("out/x"), &item, &[]).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn status_mapping() {
        let ok = Command::new("true").status().unwrap();
        assert_eq!(outcome_from_status(ok), ItemOutcome::Created);

        let failed = Command::new("sh").args(["-c", "exit 3"]).status().unwrap();
        assert_eq!(outcome_from_status(failed), ItemOutcome::ToolFailed { code: 3 });

        let killed = Command::new("sh").args(["-c", "kill -9 $$"]).status().unwrap();
        assert_eq!(
            outcome_from_status(killed),
            ItemOutcome::ToolCrashed { signal: Some(9) }
        );
    }

    #[test]
    fn spawn_failure_is_an_error() {
        let item = WorkItem::new("x", Vec::<String>::new());
        let inv = ToolInvocation::for_item(
            &["fixturegen-definitely-not-a-program".into()],
            Path::new("out/x"),
            &item,
            &[],
        )
        .unwrap();
        assert!(inv.run(false).is_err());
    }
}
