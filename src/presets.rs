//! Built-in fixture sets for the Snowpack app generator test suites.

use std::path::PathBuf;

use crate::types::{FixtureSet, LowThreadPolicy, WorkItem};

/// Base templates shared by both sets; each also gets a `-typescript` variant.
pub const BASE_TEMPLATES: [&str; 6] = ["blank", "react", "vue", "svelte", "preact", "lit-element"];

const SEED_FILE: &str = "dist-templates/index.js";

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Official `create-snowpack-app` templates, for comparison runs.
    Apps,
    /// Starters produced by the local generator build (`dist/index.js`).
    Starters,
}

impl Preset {
    pub fn fixture_set(self) -> FixtureSet {
        match self {
            Preset::Apps => apps(),
            Preset::Starters => starters(),
        }
    }
}

fn template_names() -> impl Iterator<Item = String> {
    let plain = BASE_TEMPLATES.iter().map(|t| t.to_string());
    let typescript = BASE_TEMPLATES.iter().map(|t| format!("{t}-typescript"));
    plain.chain(typescript)
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// `npx create-snowpack-app created-snowpack-apps/<t> --template @snowpack/app-template-<t> --no-install`
pub fn apps() -> FixtureSet {
    FixtureSet {
        output_root: PathBuf::from("created-snowpack-apps"),
        tool: strings(&["npx", "create-snowpack-app"]),
        trailing_flags: strings(&["--no-install"]),
        items: template_names()
            .map(|t| {
                let template = format!("@snowpack/app-template-{t}");
                WorkItem::new(t, ["--template".to_string(), template])
            })
            .collect(),
        low_threads: LowThreadPolicy::Sequential,
        skip_existing: true,
        claim: true,
        post_remove: vec![PathBuf::from(".git")],
        seed_files: vec![PathBuf::from(SEED_FILE)],
    }
}

/// Per-template generator flags: (code formatters, plugins).
fn starter_options(base: &str) -> (&'static str, &'static str) {
    match base {
        "blank" => ("prettier", "none"),
        "react" | "preact" => ("prettier", "wtr"),
        "vue" => ("none", "none"),
        "svelte" => ("none", "wtr"),
        _ => ("prettier", "none"), // lit-element
    }
}

/// `node dist/index.js snowpack-starters/<t> <config...> <fixed flags...>`
pub fn starters() -> FixtureSet {
    let items = BASE_TEMPLATES
        .into_iter()
        .flat_map(|base| {
            [false, true].into_iter().map(move |typescript| {
                let (formatters, plugins) = starter_options(base);
                let name = if typescript {
                    format!("{base}-typescript")
                } else {
                    base.to_string()
                };
                let ts_flag = if typescript {
                    "--typescript"
                } else {
                    "--no-typescript"
                };
                WorkItem::new(
                    name,
                    [
                        "--base-template",
                        base,
                        "--code-formatters",
                        formatters,
                        ts_flag,
                        "--plugins",
                        plugins,
                    ],
                )
            })
        })
        .collect();

    FixtureSet {
        output_root: PathBuf::from("snowpack-starters"),
        tool: strings(&["node", "dist/index.js"]),
        trailing_flags: strings(&[
            "--no-sass",
            "--css-framework",
            "none",
            "--bundler",
            "none",
            "--other-prod-deps",
            "none",
            "--other-dev-deps",
            "none",
            "--license",
            "none",
            "--skip-git-init",
        ]),
        items,
        low_threads: LowThreadPolicy::Refuse,
        skip_existing: true,
        claim: true,
        post_remove: vec![],
        seed_files: vec![PathBuf::from(SEED_FILE)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tools::validate_fixture_set;

    #[test]
    fn both_presets_are_valid_with_twelve_items() {
        for preset in [Preset::Apps, Preset::Starters] {
            let set = preset.fixture_set();
            validate_fixture_set(&set).unwrap();
            assert_eq!(set.items.len(), 12, "{preset:?}");
        }
    }

    #[test]
    fn apps_items() {
        let set = apps();
        let react_ts = set
            .items
            .iter()
            .find(|i| i.name == "react-typescript")
            .unwrap();
        assert_eq!(
            react_ts.args,
            ["--template", "@snowpack/app-template-react-typescript"]
        );
        assert_eq!(set.low_threads, LowThreadPolicy::Sequential);
    }

    #[test]
    fn starters_items() {
        let set = starters();
        let svelte_ts = set
            .items
            .iter()
            .find(|i| i.name == "svelte-typescript")
            .unwrap();
        assert_eq!(
            svelte_ts.args,
            [
                "--base-template",
                "svelte",
                "--code-formatters",
                "none",
                "--typescript",
                "--plugins",
                "wtr"
            ]
        );
        let lit = set.items.iter().find(|i| i.name == "lit-element").unwrap();
        assert!(lit.args.contains(&"--no-typescript".to_string()));
        assert!(lit.args.contains(&"prettier".to_string()));
        assert_eq!(set.low_threads, LowThreadPolicy::Refuse);
        assert_eq!(set.trailing_flags.last().unwrap(), "--skip-git-init");
    }
}
