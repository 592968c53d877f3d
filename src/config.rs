//! Configuration management for the ReAct agent.
//!
//! Configuration can be set via environment variables:
//! - `GEMINI_API_KEY` - Required. API key for the Gemini model.
//! - `MODEL_NAME` - Optional. Model identity passed to the model client. Defaults to `gemini-1.5-flash`.
//! - `SERP_API_KEY` - Optional. SerpAPI key used by the Google search tool.
//! - `PROMPT_TEMPLATE_PATH` - Optional. Prompt template file. Defaults to `./data/input/react.txt`.
//! - `TRACE_PATH` - Optional. Append-only trace file. Defaults to `./data/output/trace.txt`.
//! - `TRACE_ENABLED` - Optional. Whether the trace file is written. Defaults to `true`.
//! - `MAX_ITERATIONS` - Optional. Iteration budget per query. Defaults to `5`.
//! - `PACING_DELAY_MS` - Optional. Pause after every model call. Defaults to `2000`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `5000`.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_PROMPT_TEMPLATE_PATH: &str = "./data/input/react.txt";
pub const DEFAULT_TRACE_PATH: &str = "./data/output/trace.txt";
pub const DEFAULT_MAX_ITERATIONS: usize = 5;
pub const DEFAULT_PACING_DELAY_MS: u64 = 2000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key
    pub api_key: String,

    /// Model identity handed to the model client
    pub model: String,

    /// SerpAPI key for the Google tool
    pub serp_api_key: Option<String>,

    /// Prompt template resource, loaded once at startup
    pub prompt_template_path: PathBuf,

    /// Trace file, `None` when tracing to disk is disabled
    pub trace_path: Option<PathBuf>,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,

    /// Delay applied after each model call
    pub pacing_delay: Duration,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `GEMINI_API_KEY` is not set, and
    /// `ConfigError::InvalidValue` if a numeric or boolean variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let model = std::env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let serp_api_key = std::env::var("SERP_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let prompt_template_path = std::env::var("PROMPT_TEMPLATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PROMPT_TEMPLATE_PATH));

        let trace_enabled = std::env::var("TRACE_ENABLED")
            .ok()
            .map(|v| parse_bool(&v).map_err(|e| ConfigError::InvalidValue("TRACE_ENABLED".to_string(), e)))
            .transpose()?
            .unwrap_or(true);

        let trace_path = trace_enabled.then(|| {
            std::env::var("TRACE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TRACE_PATH))
        });

        let max_iterations = env_or("MAX_ITERATIONS", DEFAULT_MAX_ITERATIONS)?;
        let pacing_delay = Duration::from_millis(env_or("PACING_DELAY_MS", DEFAULT_PACING_DELAY_MS)?);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env_or("PORT", 5000u16)?;

        Ok(Self {
            api_key,
            model,
            serp_api_key,
            prompt_template_path,
            trace_path,
            max_iterations,
            pacing_delay,
            host,
            port,
        })
    }

    /// Create a config with default values (useful for testing).
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            serp_api_key: None,
            prompt_template_path: PathBuf::from(DEFAULT_PROMPT_TEMPLATE_PATH),
            trace_path: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            pacing_delay: Duration::from_millis(DEFAULT_PACING_DELAY_MS),
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected boolean-like value, got: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = Config::new("key".to_string());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.pacing_delay, Duration::from_secs(2));
        assert!(config.trace_path.is_none());
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool(" Yes "), Ok(true));
        assert_eq!(parse_bool("off"), Ok(false));
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_env_or_reports_invalid_value() {
        std::env::set_var("REACT_AGENT_TEST_BAD_NUMBER", "five");
        let err = env_or::<usize>("REACT_AGENT_TEST_BAD_NUMBER", 5).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "REACT_AGENT_TEST_BAD_NUMBER"));

        std::env::remove_var("REACT_AGENT_TEST_UNSET_NUMBER");
        assert_eq!(env_or::<usize>("REACT_AGENT_TEST_UNSET_NUMBER", 7).unwrap(), 7);
    }
}
