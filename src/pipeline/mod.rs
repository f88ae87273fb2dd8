//! Fan-out runner: context, per-item worker, pool dispatch, failure aggregation.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod worker;

pub use context::RunContext;
pub use error_handler::{check_for_failures, describe_failure, is_unresolved_claim};
pub use orchestrator::{build_worker_pool, run_items};
pub use worker::run_item;
