//! # Innova CLI Module
//!
//! This module implements the CLI interface for Innova.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show portfolio status
//! - `projects` - List or create projects
//! - `score` - Show a project's maturity scorecard
//! - `checklist` - Show a project's checklist summary
//! - `import` - Import response rows from a file
//! - `export` - Export a project (rows or canonical snapshot)
//! - `finalize` - Finalize the current evaluation into history
//! - `history` - Show a project's finalized evaluations
//! - `init` - Initialize a new portfolio database
//! - `hash` - Compute BLAKE3 hash of a project snapshot

mod commands;

use clap::{Parser, Subcommand};
use innova_core::InnovaError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Innova - Portfolio Maturity Server
///
/// A deterministic maturity-assessment engine for innovation portfolios.
/// Scores are cumulative: a level counts only when every level below it
/// holds, and an affirmative answer counts only with qualifying evidence.
#[derive(Parser, Debug)]
#[command(name = "innova")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the portfolio database
    #[arg(short = 'D', long, global = true, default_value = "innova.db")]
    pub database: PathBuf,

    /// Storage backend: "redb" (ACID database) or "memory" (volatile)
    #[arg(short = 'B', long, global = true, default_value = "redb")]
    pub backend: String,

    /// Path to a TOML configuration file
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show portfolio status
    Status,

    /// List projects, or create one with --create
    Projects {
        /// Create a new project with the given name
        #[arg(long)]
        create: Option<String>,
    },

    /// Show a project's maturity scorecard
    Score {
        /// Project identifier
        #[arg(short = 'P', long)]
        project: u64,
    },

    /// Show a project's checklist summary
    Checklist {
        /// Project identifier
        #[arg(short = 'P', long)]
        project: u64,
    },

    /// Import response rows from a file
    Import {
        /// Project identifier
        #[arg(short = 'P', long)]
        project: u64,

        /// Path to the input file (JSON or text)
        #[arg(short, long)]
        file: PathBuf,

        /// Input format (json, text)
        #[arg(short = 't', long, default_value = "json")]
        format: String,
    },

    /// Export a project's evaluation
    Export {
        /// Project identifier
        #[arg(short = 'P', long)]
        project: u64,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (rows, snapshot)
        #[arg(short = 't', long, default_value = "rows")]
        format: String,
    },

    /// Finalize the current evaluation into the project's history
    Finalize {
        /// Project identifier
        #[arg(short = 'P', long)]
        project: u64,

        /// Label for the history entry (e.g. an evaluation date)
        #[arg(short, long, default_value = "")]
        label: String,
    },

    /// Show a project's finalized evaluations
    History {
        /// Project identifier
        #[arg(short = 'P', long)]
        project: u64,
    },

    /// Initialize a new empty portfolio database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },

    /// Compute BLAKE3 cryptographic hash of a project snapshot
    Hash {
        /// Project identifier
        #[arg(short = 'P', long)]
        project: u64,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), InnovaError> {
    let ctx = CommandContext::from_cli(&cli)?;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(&ctx, host, port).await,
        Some(Commands::Status) => cmd_status(&ctx),
        Some(Commands::Projects { create }) => cmd_projects(&ctx, create),
        Some(Commands::Score { project }) => cmd_score(&ctx, project),
        Some(Commands::Checklist { project }) => cmd_checklist(&ctx, project),
        Some(Commands::Import {
            project,
            file,
            format,
        }) => cmd_import(&ctx, project, &file, &format),
        Some(Commands::Export {
            project,
            output,
            format,
        }) => cmd_export(&ctx, project, &output, &format),
        Some(Commands::Finalize { project, label }) => cmd_finalize(&ctx, project, &label),
        Some(Commands::History { project }) => cmd_history(&ctx, project),
        Some(Commands::Init { force }) => cmd_init(&ctx, force),
        Some(Commands::Hash { project }) => cmd_hash(&ctx, project),
        None => {
            // No subcommand - show status by default
            cmd_status(&ctx)
        }
    }
}
