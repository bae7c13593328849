//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::{IncidentStatus, Nature};

/// Basic intake command arguments.
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Basic form field as KEY=VALUE (repeatable)
    #[arg(short = 'f', long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

/// Nature completion command arguments.
#[derive(Debug, Args)]
pub struct CompleteCommand {
    /// The nature of the incident being completed
    #[arg(value_enum)]
    pub nature: NatureArg,

    /// Follow-up form field as KEY=VALUE; a bare KEY marks a checked box
    #[arg(short = 'f', long = "field", value_name = "KEY[=VALUE]")]
    pub fields: Vec<String>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Filter by completion status
    #[arg(short, long, value_enum)]
    pub status: Option<StatusArg>,

    /// Filter by completed nature
    #[arg(short, long, value_enum)]
    pub nature: Option<NatureArg>,

    /// Maximum number of records to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Index of the record to show
    pub index: usize,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Nature argument for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NatureArg {
    /// Fire response
    Fire,
    /// Prevention inspection
    Prevention,
    /// Community outreach
    Community,
    /// Management activity
    Management,
}

impl From<NatureArg> for Nature {
    fn from(arg: NatureArg) -> Self {
        match arg {
            NatureArg::Fire => Self::Fire,
            NatureArg::Prevention => Self::Prevention,
            NatureArg::Community => Self::Community,
            NatureArg::Management => Self::Management,
        }
    }
}

/// Status argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Awaiting nature follow-up
    Pending,
    /// Completed
    Ready,
}

impl From<StatusArg> for IncidentStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Self::Pending,
            StatusArg::Ready => Self::Ready,
        }
    }
}
