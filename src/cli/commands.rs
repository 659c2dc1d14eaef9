//! Command implementations

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::adapters::toml_config::{ClipperConfig, TomlConfigAdapter};
use crate::adapters::LocalFsAdapter;
use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::pipeline_interactor::{preview_selection_request, resolve_source};
use crate::cli::args::{InterpretArgs, PromptArgs, RunArgs};
use crate::domain::interpret::ResponseInterpreter;
use crate::domain::model::{Candidate, ClipRequest, ClipResponse, Constraints, ErrorResponse};
use crate::domain::rules::CandidateValidator;
use crate::error::{ClipperError, ClipperResult};

/// Read a clip request; `.yaml`/`.yml` files are parsed as YAML, anything else as JSON
pub fn load_request(path: &Path) -> ClipperResult<ClipRequest> {
    let content = std::fs::read_to_string(path).map_err(|source| ClipperError::RequestRead {
        path: path.display().to_string(),
        source,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let parsed = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| ClipperError::RequestParse {
        path: path.display().to_string(),
        message,
    })
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", rendered);
    Ok(())
}

/// Execute the run command
///
/// Every failure, including an unreadable request file or a missing API key,
/// is printed as an error response before the command fails.
pub async fn run(args: RunArgs, config: &ClipperConfig) -> Result<()> {
    info!("Starting clip generation run");
    info!("Request: {}", args.request.display());

    match generate(&args, config).await {
        Ok(response) => print_json(&response, args.pretty),
        Err(e) => {
            error!("Clip generation failed: {}", e);
            print_json(&ErrorResponse::new(e.to_string()), args.pretty)?;
            Err(e.into())
        }
    }
}

/// Validate the request, then build the adapters and run the pipeline
async fn generate(args: &RunArgs, config: &ClipperConfig) -> ClipperResult<ClipResponse> {
    let request = load_request(&args.request)?;
    request.constraints()?;
    resolve_source(
        &LocalFsAdapter::new(),
        &config.extract.media_dir,
        &request.source_media_ref,
    )
    .await?;

    let container = DefaultAppContainer::new(config)?;
    let result = container.clip_pipeline().execute(&request).await?;
    if result.is_partial() {
        warn!(
            "Produced {} of {} requested clips",
            result.produced_total, result.requested_total
        );
    }
    Ok(result.to_response())
}

/// Execute the prompt command
pub fn prompt(args: PromptArgs) -> Result<()> {
    let request = load_request(&args.request)?;
    let rendered = preview_selection_request(&request).map_err(ClipperError::from)?;
    println!("{}", rendered);
    Ok(())
}

#[derive(Debug, Serialize)]
struct InterpretReport {
    accepted: Vec<Candidate>,
    rejected: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the interpret command
///
/// An answer that cannot be interpreted is reported, not treated as a failure.
pub fn interpret(args: InterpretArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.response).map_err(|source| {
        ClipperError::RequestRead {
            path: args.response.display().to_string(),
            source,
        }
    })?;
    let constraints = Constraints::new(args.min, args.max, 1, 1).map_err(ClipperError::from)?;

    let report = match ResponseInterpreter::interpret(&raw) {
        Ok(candidates) => {
            let outcome = CandidateValidator::validate(&candidates, &constraints);
            InterpretReport {
                accepted: outcome.accepted,
                rejected: outcome.rejected,
                error: None,
            }
        }
        Err(e) => {
            warn!("Answer could not be interpreted: {}", e);
            InterpretReport {
                accepted: Vec::new(),
                rejected: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    };

    print_json(&report, true)
}

/// Execute the config command
pub fn show_config(config: &ClipperConfig) -> Result<()> {
    print!("{}", TomlConfigAdapter::serialize(config)?);
    Ok(())
}
