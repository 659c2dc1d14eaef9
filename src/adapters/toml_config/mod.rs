// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::adapters::tracing_log::{LogFormat, LogLevel};
use crate::error::{ClipperError, ClipperResult};

/// AI collaborator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Base URL of the generative language API
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Upper bound for one selection call
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash-lite".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Repair policy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Repair calls allowed after the initial selection call
    pub max_retries: u32,
    /// Upper bound for synthetic start times when the media duration is unknown
    pub fallback_start_range: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            fallback_start_range: 200.0,
        }
    }
}

/// Segment extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub output_dir: PathBuf,
    /// Where relative source references are looked up by file name
    pub media_dir: PathBuf,
    /// Public prefix of produced clip URLs
    pub url_prefix: String,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub stream_copy: bool,
    /// Concurrent transcoding subprocesses
    pub concurrency: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("server/public/videos"),
            media_dir: PathBuf::from("server/public/videos"),
            url_prefix: "/videos".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            stream_copy: true,
            concurrency: num_cpus::get().max(1),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Complete clipper configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipperConfig {
    pub ai: AiConfig,
    pub pipeline: PipelineConfig,
    pub extract: ExtractConfig,
    pub logging: LoggingConfig,
}

impl ClipperConfig {
    /// Validate configuration
    pub fn validate(&self) -> ClipperResult<()> {
        LogLevel::parse(&self.logging.level).map_err(|e| ClipperError::Config {
            message: e.to_string(),
        })?;

        if self.ai.timeout_secs == 0 {
            return Err(config_error("ai.timeout_secs must be positive"));
        }
        if self.ai.model.trim().is_empty() {
            return Err(config_error("ai.model cannot be empty"));
        }
        if self.extract.concurrency == 0 {
            return Err(config_error("extract.concurrency must be positive"));
        }
        if !self.pipeline.fallback_start_range.is_finite()
            || self.pipeline.fallback_start_range < 0.0
        {
            return Err(config_error(
                "pipeline.fallback_start_range must be a non-negative number",
            ));
        }

        Ok(())
    }
}

fn config_error(message: &str) -> ClipperError {
    ClipperError::Config {
        message: message.to_string(),
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Files tried, in order, when no explicit path is given
    pub const SEARCH_PATHS: &'static [&'static str] = &["config/clipper.toml", "clipper.toml"];

    /// Deserialize config from TOML string
    pub fn parse(toml_content: &str) -> ClipperResult<ClipperConfig> {
        toml::from_str(toml_content).map_err(|e| ClipperError::Config {
            message: format!("Failed to parse TOML config: {}", e),
        })
    }

    /// Serialize config to TOML string
    pub fn serialize(config: &ClipperConfig) -> ClipperResult<String> {
        toml::to_string_pretty(config).map_err(|e| ClipperError::Config {
            message: format!("Failed to serialize config: {}", e),
        })
    }

    /// Load configuration from file
    pub fn load_file(path: &Path) -> ClipperResult<ClipperConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| ClipperError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    /// Load the explicit file, else the first search path that exists, else defaults
    pub fn discover(explicit: Option<&Path>) -> ClipperResult<(ClipperConfig, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load_file(path)?, Some(path.to_path_buf())));
        }

        for candidate in Self::SEARCH_PATHS {
            let path = Path::new(candidate);
            if path.exists() {
                return Ok((Self::load_file(path)?, Some(path.to_path_buf())));
            }
        }

        Ok((ClipperConfig::default(), None))
    }
}
