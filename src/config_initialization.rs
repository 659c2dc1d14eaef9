//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use tracing::info;

use crate::adapters::toml_config::{ClipperConfig, TomlConfigAdapter};
use crate::adapters::tracing_log::LogFormat;
use crate::cli::{Cli, Commands};
use crate::error::{ClipperError, ClipperResult};

/// Effective configuration and where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ClipperConfig,
    /// File the base configuration was read from, if any
    pub source: Option<PathBuf>,
    pub env_overrides: usize,
    pub cli_overrides: usize,
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> ClipperResult<LoadedConfig> {
    // Steps 1 and 2: defaults, overlaid by the first config file found
    let (mut config, source) = TomlConfigAdapter::discover(cli.config.as_deref())?;

    // Step 3: environment variables
    let env_overrides = apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    // Step 4: command-line flags
    let cli_overrides = apply_cli_overrides(&mut config, cli);

    config.validate()?;

    Ok(LoadedConfig {
        config,
        source,
        env_overrides,
        cli_overrides,
    })
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> ClipperResult<T> {
    value.trim().parse().map_err(|_| ClipperError::Config {
        message: format!("{} has an invalid value: {}", key, value),
    })
}

/// Apply `CLIPPER_*` environment overrides, returning how many were applied
pub fn apply_env_overrides<F>(config: &mut ClipperConfig, lookup: F) -> ClipperResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;
    let mut take = |key: &str| {
        let value = lookup(key);
        if value.is_some() {
            info!("Found environment override: {}", key);
            applied += 1;
        }
        value
    };

    if let Some(value) = take("CLIPPER_AI_MODEL") {
        config.ai.model = value;
    }
    if let Some(value) = take("CLIPPER_AI_ENDPOINT") {
        config.ai.endpoint = value;
    }
    if let Some(value) = take("CLIPPER_AI_TIMEOUT_SECS") {
        config.ai.timeout_secs = parse_env("CLIPPER_AI_TIMEOUT_SECS", &value)?;
    }
    if let Some(value) = take("CLIPPER_MAX_RETRIES") {
        config.pipeline.max_retries = parse_env("CLIPPER_MAX_RETRIES", &value)?;
    }
    if let Some(value) = take("CLIPPER_OUTPUT_DIR") {
        config.extract.output_dir = PathBuf::from(value);
    }
    if let Some(value) = take("CLIPPER_MEDIA_DIR") {
        config.extract.media_dir = PathBuf::from(value);
    }
    if let Some(value) = take("CLIPPER_URL_PREFIX") {
        config.extract.url_prefix = value;
    }
    if let Some(value) = take("CLIPPER_FFMPEG") {
        config.extract.ffmpeg_path = value;
    }
    if let Some(value) = take("CLIPPER_FFPROBE") {
        config.extract.ffprobe_path = value;
    }
    if let Some(value) = take("CLIPPER_CONCURRENCY") {
        config.extract.concurrency = parse_env("CLIPPER_CONCURRENCY", &value)?;
    }
    if let Some(value) = take("CLIPPER_LOG_LEVEL") {
        config.logging.level = value;
    }

    if applied > 0 {
        info!("Applied {} environment variable overrides", applied);
    }
    Ok(applied)
}

/// Apply command-line overrides, returning how many were applied
fn apply_cli_overrides(config: &mut ClipperConfig, cli: &Cli) -> usize {
    let mut applied = 0;

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
        applied += 1;
    }
    if cli.json_logs {
        config.logging.format = LogFormat::Json;
        applied += 1;
    }

    if let Commands::Run(args) = &cli.command {
        if let Some(output_dir) = &args.output_dir {
            config.extract.output_dir = output_dir.clone();
            applied += 1;
        }
        if let Some(concurrency) = args.concurrency {
            config.extract.concurrency = concurrency;
            applied += 1;
        }
        if let Some(max_retries) = args.max_retries {
            config.pipeline.max_retries = max_retries;
            applied += 1;
        }
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_replace_file_values() {
        let mut config = ClipperConfig::default();
        let applied = apply_env_overrides(
            &mut config,
            lookup_from(&[
                ("CLIPPER_AI_MODEL", "gemini-2.5-pro"),
                ("CLIPPER_MAX_RETRIES", "4"),
                ("CLIPPER_OUTPUT_DIR", "/tmp/clips"),
            ]),
        )
        .unwrap();

        assert_eq!(applied, 3);
        assert_eq!(config.ai.model, "gemini-2.5-pro");
        assert_eq!(config.pipeline.max_retries, 4);
        assert_eq!(config.extract.output_dir, PathBuf::from("/tmp/clips"));
    }

    #[test]
    fn test_env_override_with_bad_number_is_rejected() {
        let mut config = ClipperConfig::default();
        let err = apply_env_overrides(&mut config, lookup_from(&[("CLIPPER_CONCURRENCY", "many")]))
            .unwrap_err();
        assert!(err.to_string().contains("CLIPPER_CONCURRENCY"));
    }

    #[test]
    fn test_cli_overrides_win_over_env() {
        let mut config = ClipperConfig::default();
        apply_env_overrides(&mut config, lookup_from(&[("CLIPPER_MAX_RETRIES", "4")])).unwrap();

        let cli = Cli::parse_from([
            "clipper-ai",
            "--log-level",
            "debug",
            "--json-logs",
            "run",
            "--request",
            "req.json",
            "--max-retries",
            "1",
            "--concurrency",
            "3",
        ]);
        let applied = apply_cli_overrides(&mut config, &cli);

        assert_eq!(applied, 4);
        assert_eq!(config.pipeline.max_retries, 1);
        assert_eq!(config.extract.concurrency, 3);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }
}
