//! The thin driver of §6: `format`, `layout`, and `edit` bound onto the core crates.

pub mod cli;
pub mod commands;

use anyhow::Result;
use clap::Parser;

pub fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.command {
        cli::Command::Format { file } => commands::format::run(&file),
        cli::Command::Layout { file, width } => commands::layout::run(&file, width),
        cli::Command::Edit { file } => commands::edit::run(&file),
    }
}
