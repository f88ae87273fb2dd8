//! Load a fixture manifest (`.fixturegen.toml` or `--manifest PATH`) into a [`FixtureSet`].
//!
//! ```toml
//! [settings]
//! output_root = "snowpack-starters"
//! tool = ["node", "dist/index.js"]
//! trailing_flags = ["--skip-git-init"]
//! low_threads = "refuse"
//!
//! [[item]]
//! name = "blank"
//! args = ["--base-template", "blank"]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::engine::tools::validate_fixture_set;
use crate::types::{FixtureSet, LowThreadPolicy, WorkItem};
use crate::utils::config::PackagePaths;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    settings: SettingsSection,
    #[serde(default, rename = "item")]
    items: Vec<ItemSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    output_root: Option<String>,
    tool: Option<Vec<String>>,
    trailing_flags: Option<Vec<String>>,
    low_threads: Option<LowThreadPolicy>,
    skip_existing: Option<bool>,
    claim: Option<bool>,
    post_remove: Option<Vec<String>>,
    seed_files: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ItemSection {
    name: String,
    #[serde(default)]
    args: Vec<String>,
}

impl Manifest {
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse fixture manifest")
    }

    /// Resolve into a validated [`FixtureSet`]. `output_root` defaults to `fixtures`.
    pub fn into_fixture_set(self) -> Result<FixtureSet> {
        let s = self.settings;
        let set = FixtureSet {
            output_root: PathBuf::from(s.output_root.unwrap_or_else(|| "fixtures".to_string())),
            tool: s.tool.unwrap_or_default(),
            trailing_flags: s.trailing_flags.unwrap_or_default(),
            items: self
                .items
                .into_iter()
                .map(|i| WorkItem::new(i.name, i.args))
                .collect(),
            low_threads: s.low_threads.unwrap_or_default(),
            skip_existing: s.skip_existing.unwrap_or(true),
            claim: s.claim.unwrap_or(true),
            post_remove: to_paths(s.post_remove),
            seed_files: to_paths(s.seed_files),
        };
        validate_fixture_set(&set)?;
        Ok(set)
    }
}

fn to_paths(v: Option<Vec<String>>) -> Vec<PathBuf> {
    v.unwrap_or_default().into_iter().map(PathBuf::from).collect()
}

/// Load and resolve the manifest at `path`.
pub fn load_manifest(path: &Path) -> Result<FixtureSet> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read manifest {}", path.display()))?;
    Manifest::parse(&s)
        .and_then(Manifest::into_fixture_set)
        .with_context(|| format!("invalid manifest {}", path.display()))
}

/// `.fixturegen.toml` in `dir`, if present.
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(PackagePaths::get().manifest_filename());
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_items_in_order_with_defaults() {
        let m = Manifest::parse(
            r#"
            [settings]
            tool = ["mkdir"]

            [[item]]
            name = "zeta"
            args = ["-p"]

            [[item]]
            name = "alpha"
            "#,
        )
        .unwrap();
        let set = m.into_fixture_set().unwrap();
        assert_eq!(set.output_root, PathBuf::from("fixtures"));
        let names: Vec<_> = set.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert!(set.items[1].args.is_empty());
        assert_eq!(set.low_threads, LowThreadPolicy::Refuse);
        assert!(set.skip_existing);
        assert!(set.claim);
    }

    #[test]
    fn reads_policy_and_paths() {
        let set = Manifest::parse(
            r#"
            [settings]
            output_root = "out"
            tool = ["npx", "create-snowpack-app"]
            low_threads = "sequential"
            post_remove = [".git"]
            claim = false
            "#,
        )
        .unwrap()
        .into_fixture_set()
        .unwrap();
        assert_eq!(set.low_threads, LowThreadPolicy::Sequential);
        assert_eq!(set.post_remove, vec![PathBuf::from(".git")]);
        assert!(!set.claim);
        assert!(set.items.is_empty());
    }

    #[test]
    fn rejects_missing_tool() {
        let m = Manifest::parse("[[item]]\nname = \"a\"\n").unwrap();
        assert!(m.into_fixture_set().is_err());
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(Manifest::parse("[settings]\nlow_threads = \"maybe\"\n").is_err());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Manifest::parse("[settings]\ntools = [\"x\"]\n").is_err());
    }
}
