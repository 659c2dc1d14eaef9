//! CLI module for the AI clipper
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// TrimX AI Clipper
///
/// Selects clips from a long video with an AI collaborator, guided by a
/// transcript and an intent, and cuts each clip into its own file.
#[derive(Parser, Debug)]
#[command(name = "clipper-ai")]
#[command(about = "TrimX AI Clipper - Transcript-guided clip selection and extraction")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: config/clipper.toml or clipper.toml)
    #[arg(long, global = true, env = "CLIPPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select and extract clips for a request
    Run(args::RunArgs),
    /// Print the selection request that would be sent
    Prompt(args::PromptArgs),
    /// Interpret a saved AI answer against duration bounds
    Interpret(args::InterpretArgs),
    /// Print the effective configuration
    Config,
}
