//! Command-line interface definitions.
//!
//! The CLI is a thin collaborator over the journal store: it parses
//! arguments and calls the store's public operations, and never touches
//! encryption, serialization, or file handling itself.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A single-user encrypted journal stored in one authenticated file
#[derive(Parser, Debug)]
#[clap(name = "vellum", version, about, long_about = None)]
pub struct CliArgs {
    /// Path of the journal file (overrides VELLUM_JOURNAL)
    #[clap(short = 'f', long, global = true)]
    pub file: Option<PathBuf>,

    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new entry, timestamped now (reads stdin if TEXT is omitted)
    Add {
        /// The entry text
        text: Option<String>,
    },
    /// List all entries in timestamp order
    List,
    /// Decrypt and print the entry at a timestamp
    Show {
        /// Entry timestamp in microseconds since the Unix epoch
        timestamp: u64,
    },
    /// Decrypt and print the most recent entry
    Latest,
    /// Delete the entry at a timestamp
    Delete {
        /// Entry timestamp in microseconds since the Unix epoch
        timestamp: u64,
    },
}
