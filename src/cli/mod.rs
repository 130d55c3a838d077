mod commands;
pub mod exit_codes;
pub mod output;

pub use commands::{check, execute, replay, Cli, Commands, Step};

use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    execute(cli)
}
