//! Command-line interface for fireline.
//!
//! This module provides the CLI structure and command handlers for the
//! `fireline` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CompleteCommand, ConfigCommand, CreateCommand, ListCommand, NatureArg, ReportCommand,
    ShowCommand, StatusArg, StatusCommand,
};

/// fireline - Fire-department incident intake and record keeping
///
/// Captures the multi-step incident intake flow: a basic form opens a
/// pending record, a nature-specific follow-up form completes it.
#[derive(Debug, Parser)]
#[command(name = "fireline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an incident: basic intake form
    Create(CreateCommand),

    /// Complete the in-progress incident with a nature follow-up form
    Complete(CompleteCommand),

    /// Abandon the in-progress incident draft
    Abandon,

    /// List incident records
    List(ListCommand),

    /// Show a single incident record
    Show(ShowCommand),

    /// Summarize the record store
    Report(ReportCommand),

    /// Show store status and draft state
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
