//! Exclusive per-item claim markers.
//!
//! A claim is a directory `<output_root>/.<name>.claim`. Directory creation is atomic, so at most
//! one run holds a given item between its existence check and the tool finishing.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;

/// Marker path for `item` under `output_root`.
pub fn claim_path_for(output_root: &Path, item: &str) -> PathBuf {
    output_root.join(PackagePaths::get().claim_dir_name(item))
}

/// Held claim; the marker is removed on drop.
#[derive(Debug)]
pub struct ClaimGuard {
    path: PathBuf,
}

impl ClaimGuard {
    /// Try to claim `item` under `output_root`. `Ok(None)` when another run holds it.
    pub fn acquire(output_root: &Path, item: &str) -> Result<Option<Self>> {
        let path = claim_path_for(output_root, item);
        match std::fs::create_dir(&path) {
            Ok(()) => {
                debug!("Claimed {}", path.display());
                Ok(Some(Self { path }))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(e).with_context(|| format!("create claim {}", path.display())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ClaimGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir(&self.path) {
            warn!("Could not release claim {}: {}", self.path.display(), e);
        }
    }
}
