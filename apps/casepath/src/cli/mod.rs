//! # Casepath CLI Module
//!
//! This module implements the CLI interface for Casepath.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `init` - Initialize a new database
//! - `journey` - Show stage statuses and progress (default)
//! - `record` - Record a graded stage result
//! - `current` - Show, set or clear the current stage
//! - `company` - Choose a company track
//! - `targets` - Show the skills to practice next
//! - `prepare` - Work through preparation areas for a stage
//! - `checklist` - Tick off the preparation checklist for a stage
//! - `skills` - Describe skill categories
//! - `sessions` - List stored sessions
//! - `export` - Export a session record to file
//! - `import` - Import a session record from file

mod commands;

use crate::config::{Backend, CasepathConfig, Coach};
use casepath_core::{CasepathError, SessionId};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Casepath - consulting case interview coach
///
/// Tracks a candidate through personal experience, three cases and a final
/// round, and tells them what to practice next.
#[derive(Parser, Debug)]
#[command(name = "casepath")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the session database (overrides config)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend (overrides config)
    #[arg(short = 'B', long, global = true, value_enum)]
    pub backend: Option<Backend>,

    /// Session to operate on
    #[arg(short = 'S', long, global = true, default_value = "default")]
    pub session: String,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Header + postcard payload, importable
    Binary,
    /// Pretty-printed JSON for inspection
    Json,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },

    /// Show stage statuses and overall progress
    Journey {
        /// Show descriptions, hints and recommended practice per stage
        #[arg(short, long)]
        detailed: bool,
    },

    /// Record a graded stage result
    Record {
        /// Stage identifier (e.g. case_1)
        stage: String,

        /// Mark the stage as passed
        #[arg(long)]
        passed: bool,

        /// Skill score as category=score (repeatable)
        #[arg(short = 's', long = "score")]
        scores: Vec<String>,

        /// Grader feedback
        #[arg(short, long)]
        feedback: Option<String>,

        /// Grader improvement note (repeatable)
        #[arg(short, long = "improve")]
        improvements: Vec<String>,
    },

    /// Show, set or clear the current stage
    Current {
        /// Stage to make current
        stage: Option<String>,

        /// Clear the current stage
        #[arg(long, conflicts_with = "stage")]
        clear: bool,
    },

    /// Choose a company track (mckinsey, bcg, bain, general)
    Company {
        company: String,
    },

    /// Show the weakest skills of the latest result with tips
    Targets {
        /// Use the latest result of this stage instead
        #[arg(long)]
        stage: Option<String>,

        /// Number of skills to show (overrides config)
        #[arg(short)]
        k: Option<usize>,
    },

    /// Work through preparation areas for a stage
    Prepare {
        /// Stage identifier
        stage: String,

        /// Preparation area (frameworks, mental_math, structured_communication, industry_knowledge)
        #[arg(short, long)]
        area: Option<String>,

        /// Answer the area's quiz
        #[arg(long, requires = "area")]
        answer: Option<String>,

        /// Mark the area's exercise completed
        #[arg(long, requires = "area", conflicts_with = "answer")]
        exercise: bool,
    },

    /// Show or edit the preparation checklist for a stage
    Checklist {
        /// Stage identifier
        stage: String,

        /// Check items (frameworks, mental_math, structured_responses, industry_trends)
        #[arg(long, value_delimiter = ',')]
        check: Vec<String>,

        /// Uncheck items
        #[arg(long, value_delimiter = ',')]
        uncheck: Vec<String>,

        /// Flip items
        #[arg(long, value_delimiter = ',')]
        toggle: Vec<String>,

        /// Also print the expert tips
        #[arg(long)]
        tips: bool,
    },

    /// Describe skill categories, or break one down
    Skills {
        /// Category to break down
        category: Option<String>,

        /// Overall score to show with the breakdown
        #[arg(long, requires = "category")]
        score: Option<u8>,
    },

    /// List stored sessions
    Sessions,

    /// Export the session record
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format
        #[arg(short = 't', long, value_enum, default_value = "binary")]
        format: ExportFormat,
    },

    /// Import a session record exported in binary format
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

// =============================================================================
// RESOLVED SETTINGS
// =============================================================================

/// Config file merged with CLI overrides.
#[derive(Debug)]
pub struct Context {
    pub db_path: PathBuf,
    pub backend: Backend,
    pub coach: Coach,
    pub session: SessionId,
    pub json_mode: bool,
    pub verbose: bool,
    pub config: CasepathConfig,
}

impl Context {
    pub fn resolve(cli: &Cli) -> Result<Self, CasepathError> {
        let config = CasepathConfig::load(cli.config.as_deref())?;
        let coach = Coach::from_config(&config.coaching)?;
        Ok(Self {
            db_path: cli
                .database
                .clone()
                .unwrap_or_else(|| config.storage.path.clone()),
            backend: cli.backend.unwrap_or(config.storage.backend),
            coach,
            session: SessionId::new(cli.session.as_str())?,
            json_mode: cli.json_mode,
            verbose: cli.verbose,
            config,
        })
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CasepathError> {
    let ctx = Context::resolve(&cli)?;
    if ctx.verbose {
        tracing::info!(
            "Using {} backend at {}",
            ctx.backend.as_str(),
            ctx.db_path.display()
        );
    }

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(&ctx, host, port).await,
        Some(Commands::Init { force }) => cmd_init(&ctx, force),
        Some(Commands::Journey { detailed }) => cmd_journey(&ctx, detailed),
        Some(Commands::Record {
            stage,
            passed,
            scores,
            feedback,
            improvements,
        }) => cmd_record(
            &ctx,
            &stage,
            passed,
            &scores,
            feedback.unwrap_or_default(),
            improvements,
        ),
        Some(Commands::Current { stage, clear }) => cmd_current(&ctx, stage.as_deref(), clear),
        Some(Commands::Company { company }) => cmd_company(&ctx, &company),
        Some(Commands::Targets { stage, k }) => cmd_targets(&ctx, stage.as_deref(), k),
        Some(Commands::Prepare {
            stage,
            area,
            answer,
            exercise,
        }) => cmd_prepare(&ctx, &stage, area.as_deref(), answer.as_deref(), exercise),
        Some(Commands::Checklist {
            stage,
            check,
            uncheck,
            toggle,
            tips,
        }) => cmd_checklist(
            &ctx,
            &stage,
            &ChecklistEdits {
                check,
                uncheck,
                toggle,
            },
            tips,
        ),
        Some(Commands::Skills { category, score }) => {
            cmd_skills(&ctx, category.as_deref(), score)
        }
        Some(Commands::Sessions) => cmd_sessions(&ctx),
        Some(Commands::Export { output, format }) => cmd_export(&ctx, &output, format),
        Some(Commands::Import { input }) => cmd_import(&ctx, &input),
        None => {
            // No subcommand - show the journey by default
            cmd_journey(&ctx, false)
        }
    }
}
