//! Worker-pool sizing from hardware parallelism.
//!
//! See [`plan_workers`] for the main API.

use anyhow::{Result, bail};
use log::debug;
use sysinfo::{CpuRefreshKind, RefreshKind, System};

use crate::types::{LowThreadPolicy, PoolPlan};
use crate::utils::config::{PackagePaths, WorkerPoolLimits};

/// Logical CPU count, or `None` if it cannot be determined.
///
/// `FIXTUREGEN_HARDWARE_THREADS` (also read from `.env`) takes precedence over detection.
pub fn hardware_threads() -> Option<usize> {
    let env_name = PackagePaths::get().hardware_threads_env();
    if let Ok(v) = std::env::var(env_name) {
        match v.trim().parse::<usize>() {
            Ok(n) if n > 0 => return Some(n),
            _ => log::warn!("Ignoring {}={:?}: not a positive integer", env_name, v),
        }
    }
    let sys =
        System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()));
    let n = sys.cpus().len();
    (n > 0).then_some(n)
}

/// `min(max_workers, floor(3 * threads / 8))`, or `None` below the hardware-thread floor.
pub fn worker_count(threads: usize) -> Option<usize> {
    worker_count_with(threads, &WorkerPoolLimits::default())
}

pub fn worker_count_with(threads: usize, limits: &WorkerPoolLimits) -> Option<usize> {
    if threads < limits.min_hardware_threads {
        return None;
    }
    // floor(num * t / den) without forming num * t.
    let whole = (threads / limits.share_den).saturating_mul(limits.share_num);
    let part = threads % limits.share_den * limits.share_num / limits.share_den;
    Some(whole.saturating_add(part).min(limits.max_workers))
}

/// Decide how to dispatch.
///
/// - `override_workers: Some(n)` wins: `n >= 2` is a pool, `1` is sequential, `0` is rejected.
/// - Otherwise [`worker_count`] applies; below the floor (or with unknown `threads`) the
///   `policy` either refuses or degrades to sequential.
pub fn plan_workers(
    threads: Option<usize>,
    policy: LowThreadPolicy,
    override_workers: Option<usize>,
) -> Result<PoolPlan> {
    if let Some(n) = override_workers {
        return match n {
            0 => bail!("worker count must be at least 1"),
            1 => Ok(PoolPlan::Sequential),
            n => Ok(PoolPlan::Parallel(n)),
        };
    }

    let plan = match (threads.and_then(worker_count), policy) {
        (Some(n), _) => PoolPlan::Parallel(n),
        (None, LowThreadPolicy::Sequential) => PoolPlan::Sequential,
        (None, LowThreadPolicy::Refuse) => match threads {
            Some(t) => bail!(
                "need at least {} hardware threads for parallel generation, found {}",
                WorkerPoolLimits::MIN_HARDWARE_THREADS,
                t
            ),
            None => bail!("could not determine the hardware thread count"),
        },
    };
    debug!("Hardware threads: {:?}, plan: {:?}", threads, plan);
    Ok(plan)
}
