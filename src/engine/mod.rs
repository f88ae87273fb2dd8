//! Engine: CLI surface, tool invocation, claims, filesystem helpers

pub mod arg_parser;
pub mod claim;
pub mod cli;
pub mod command;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use claim::ClaimGuard;
pub use cli::{handle_run, resolve_fixture_set};
pub use command::{ToolInvocation, outcome_from_status};
pub use tools::{select_items, target_dir_for, validate_fixture_set, validate_item_name};
