//! Fixturegen CLI: generate test fixtures; use --dry-run to print the commands without running them.

use anyhow::Result;
use clap::Parser;
use fixturegen::engine::arg_parser::Cli;
use fixturegen::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
