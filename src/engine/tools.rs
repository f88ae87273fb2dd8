//! Path helpers: target directories, item selection, output-root seeding, cleanup.

use anyhow::{Context, Result, bail};
use log::debug;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::types::{FixtureSet, WorkItem};

/// `<output_root>/<name>`.
pub fn target_dir_for(output_root: &Path, item: &WorkItem) -> PathBuf {
    output_root.join(&item.name)
}

/// An item name must map to exactly one directory directly under the output root.
pub fn validate_item_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == name && !name.contains(['/', '\\']) => Ok(()),
        _ => bail!("invalid item name {:?}: must be a single directory name", name),
    }
}

/// Tool must be non-empty; item names valid and unique (target dirs stay disjoint).
pub fn validate_fixture_set(set: &FixtureSet) -> Result<()> {
    if set.tool.first().is_none_or(|p| p.trim().is_empty()) {
        bail!("fixture set has no tool entrypoint");
    }
    let mut seen = HashSet::new();
    for item in &set.items {
        validate_item_name(&item.name)?;
        if !seen.insert(item.name.as_str()) {
            bail!("duplicate item name {:?}", item.name);
        }
    }
    for p in &set.post_remove {
        if p.is_absolute() || p.components().any(|c| matches!(c, Component::ParentDir)) {
            bail!(
                "post_remove path {} must stay inside the item directory",
                p.display()
            );
        }
    }
    Ok(())
}

/// Items to run: all of them, or only those named in `only` (in set order).
pub fn select_items<'a>(items: &'a [WorkItem], only: &[String]) -> Result<Vec<&'a WorkItem>> {
    if only.is_empty() {
        return Ok(items.iter().collect());
    }
    let known: HashSet<&str> = items.iter().map(|i| i.name.as_str()).collect();
    let unknown: Vec<&str> = only
        .iter()
        .map(String::as_str)
        .filter(|n| !known.contains(n))
        .collect();
    if !unknown.is_empty() {
        bail!("unknown item(s): {}", unknown.join(", "));
    }
    Ok(items
        .iter()
        .filter(|i| only.iter().any(|n| n == &i.name))
        .collect())
}

/// Create the output root and copy seed files into it (existing copies are left alone).
pub fn prepare_output_root(output_root: &Path, seed_files: &[PathBuf]) -> Result<()> {
    std::fs::create_dir_all(output_root)
        .with_context(|| format!("create output root {}", output_root.display()))?;
    for src in seed_files {
        let file_name = src
            .file_name()
            .with_context(|| format!("seed file {} has no file name", src.display()))?;
        let dest = output_root.join(file_name);
        if dest.exists() {
            debug!("Seed {} already present", dest.display());
            continue;
        }
        std::fs::copy(src, &dest).with_context(|| {
            format!("copy seed file ({} -> {})", src.display(), dest.display())
        })?;
        debug!("Seeded {}", dest.display());
    }
    Ok(())
}

/// Delete `paths` (relative to `target`) after a successful run. Missing paths are ignored.
pub fn remove_post_paths(target: &Path, paths: &[PathBuf]) -> Result<()> {
    for rel in paths {
        let p = target.join(rel);
        let res = match std::fs::symlink_metadata(&p) {
            Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(&p),
            Ok(_) => std::fs::remove_file(&p),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => Err(e),
        };
        res.with_context(|| format!("remove {}", p.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LowThreadPolicy;

    fn set_with(names: &[&str]) -> FixtureSet {
        FixtureSet {
            output_root: PathBuf::from("out"),
            tool: vec!["tool".into()],
            trailing_flags: vec![],
            items: names
                .iter()
                .map(|n| WorkItem::new(*n, Vec::<String>::new()))
                .collect(),
            low_threads: LowThreadPolicy::Refuse,
            skip_existing: true,
            claim: true,
            post_remove: vec![],
            seed_files: vec![],
        }
    }

    #[test]
    fn item_names() {
        assert!(validate_item_name("react-typescript").is_ok());
        assert!(validate_item_name("lit-element").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name(".").is_err());
        assert!(validate_item_name("..").is_err());
        assert!(validate_item_name("a/b").is_err());
        assert!(validate_item_name("/abs").is_err());
    }

    #[test]
    fn duplicate_names_rejected() {
        assert!(validate_fixture_set(&set_with(&["a", "b"])).is_ok());
        assert!(validate_fixture_set(&set_with(&["a", "a"])).is_err());
    }

    #[test]
    fn empty_tool_rejected() {
        let mut set = set_with(&["a"]);
        set.tool.clear();
        assert!(validate_fixture_set(&set).is_err());
        set.tool.push("  ".into());
        assert!(validate_fixture_set(&set).is_err());
    }

    #[test]
    fn post_remove_must_stay_inside() {
        let mut set = set_with(&["a"]);
        set.post_remove = vec![PathBuf::from("../x")];
        assert!(validate_fixture_set(&set).is_err());
        set.post_remove = vec![PathBuf::from(".git")];
        assert!(validate_fixture_set(&set).is_ok());
    }

    #[test]
    fn select_keeps_set_order() {
        let set = set_with(&["a", "b", "c"]);
        let picked = select_items(&set.items, &["c".into(), "a".into()]).unwrap();
        let names: Vec<_> = picked.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
        assert_eq!(select_items(&set.items, &[]).unwrap().len(), 3);
        assert!(select_items(&set.items, &["nope".into()]).is_err());
    }

    #[test]
    fn target_dir_joins_name() {
        let item = WorkItem::new("vue", ["--x"]);
        assert_eq!(
            target_dir_for(Path::new("snowpack-starters"), &item),
            PathBuf::from("snowpack-starters/vue")
        );
    }
}
