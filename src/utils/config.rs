//! Application configuration constants.
//! Tuning and file names in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    manifest_filename: String,
    claim_suffix: String,
    hardware_threads_env: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                manifest_filename: format!(".{pkg}.toml"),
                claim_suffix: ".claim".to_string(),
                hardware_threads_env: format!("{}_HARDWARE_THREADS", pkg.to_uppercase()),
            }
        })
    }

    /// Manifest picked up from the working directory when no `--manifest`/`--preset` is given.
    pub fn manifest_filename(&self) -> &str {
        &self.manifest_filename
    }

    /// Name of the claim marker for `item`, created next to the item's target directory.
    pub fn claim_dir_name(&self, item: &str) -> String {
        format!(".{item}{}", self.claim_suffix)
    }

    /// Environment variable that overrides the detected hardware thread count.
    pub fn hardware_threads_env(&self) -> &str {
        &self.hardware_threads_env
    }
}

// ---- Worker pool ----

/// Limits for sizing the worker pool from hardware threads.
///
/// `workers = min(max_workers, floor(share_num * threads / share_den))`, valid only when
/// `threads >= min_hardware_threads`. 3/8 keeps a 4C/8T machine at 3 workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerPoolLimits {
    pub min_hardware_threads: usize,
    pub max_workers: usize,
    pub share_num: usize,
    pub share_den: usize,
}

impl Default for WorkerPoolLimits {
    fn default() -> Self {
        Self {
            min_hardware_threads: Self::MIN_HARDWARE_THREADS,
            max_workers: Self::MAX_WORKERS,
            share_num: Self::SHARE_NUM,
            share_den: Self::SHARE_DEN,
        }
    }
}

impl WorkerPoolLimits {
    pub const MIN_HARDWARE_THREADS: usize = 6;
    pub const MAX_WORKERS: usize = 12;
    pub const SHARE_NUM: usize = 3;
    pub const SHARE_DEN: usize = 8;
}

// ---- Progress ----

/// Label shown on the `--progress` bar.
pub const PROGRESS_DESC: &str = "Generating";
