pub mod config;
pub mod logger;
pub mod manifest;

pub use config::*;
pub use logger::{Colors, setup_logging};
pub use manifest::{find_manifest, load_manifest};
