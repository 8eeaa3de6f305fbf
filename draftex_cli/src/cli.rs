use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "draftex", about = "A structural editor for a TeX-like markup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Tokenize, expand, serialize, and print the result (round-trip check).
    Format {
        file: PathBuf,
    },
    /// Tokenize, expand, lay out against a headless metrics context, and print the box tree.
    Layout {
        file: PathBuf,
        /// Line width in ems.
        #[arg(long, default_value_t = 40.0)]
        width: f32,
    },
    /// Open an interactive line-oriented REPL over the document.
    Edit {
        file: PathBuf,
    },
}
