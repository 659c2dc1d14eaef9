//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;
use clap_num::number_range;

fn concurrency_in_range(s: &str) -> Result<usize, String> {
    number_range(s, 1, 64)
}

fn retries_in_range(s: &str) -> Result<u32, String> {
    number_range(s, 0, 10)
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Request file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(short, long)]
    pub request: PathBuf,

    /// Directory for produced clips
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Transcoding subprocesses running at once
    #[arg(long, value_parser = concurrency_in_range)]
    pub concurrency: Option<usize>,

    /// Repair calls allowed after the initial selection
    #[arg(long, value_parser = retries_in_range)]
    pub max_retries: Option<u32>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the prompt command
#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Request file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(short, long)]
    pub request: PathBuf,
}

/// Arguments for the interpret command
#[derive(Args, Debug)]
pub struct InterpretArgs {
    /// File holding the raw AI answer
    #[arg(short, long)]
    pub response: PathBuf,

    /// Minimum clip duration in seconds
    #[arg(long, default_value = "10")]
    pub min: f64,

    /// Maximum clip duration in seconds
    #[arg(long, default_value = "30")]
    pub max: f64,
}
