//! Configuration management for Ragline.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - A `.env` file in the working directory
//! - Config files (.ragline/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! The retrieval credential is resolved here, once, at process start. The
//! generation credential belongs to the caller's session and is only looked
//! up on request via [`AppConfig::resolve_generation_key`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default environment variable holding the retrieval service key.
pub const DEFAULT_RETRIEVAL_KEY_ENV: &str = "RAGIE_API_KEY";

/// Default environment variable holding the generation service key.
pub const DEFAULT_GENERATION_KEY_ENV: &str = "SAMBANOVA_API_KEY";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (may contain .ragline/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Retrieval service settings
    pub retrieval: RetrievalConfig,

    /// Generation service settings
    pub generation: GenerationConfig,

    /// Ingestion settings
    pub ingest: IngestConfig,

    /// Retrieval credential, resolved once during `load`
    #[serde(skip)]
    pub retrieval_api_key: Option<String>,
}

/// Retrieval/indexing service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetrievalConfig {
    /// Base URL of the retrieval service
    pub base_url: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Scope used when a query names none
    pub default_scope: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.ragie.ai".to_string(),
            api_key_env: DEFAULT_RETRIEVAL_KEY_ENV.to_string(),
            default_scope: "tutorial".to_string(),
        }
    }
}

/// Generation (chat completion) service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Provider name ("sambanova", "openai", "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Custom endpoint; provider default when absent
    pub endpoint: Option<String>,

    /// Environment variable consulted when the caller supplies no key
    pub api_key_env: String,

    pub temperature: f32,

    pub top_p: f32,

    pub max_tokens: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: "sambanova".to_string(),
            model: "Llama-3.2-11B-Vision-Instruct".to_string(),
            endpoint: None,
            api_key_env: DEFAULT_GENERATION_KEY_ENV.to_string(),
            temperature: 0.1,
            top_p: 0.1,
            max_tokens: None,
        }
    }
}

/// Ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngestConfig {
    /// Default index mode ("fast" or "accurate")
    pub mode: String,

    /// Seconds to wait after a successful submission
    pub settle_secs: u64,

    /// Poll the document status instead of waiting a fixed time
    pub poll: bool,

    /// Delay between status polls, in milliseconds
    pub poll_interval_ms: u64,

    /// Give up polling after this many seconds
    pub poll_timeout_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            mode: "fast".to_string(),
            settle_secs: 5,
            poll: false,
            poll_interval_ms: 1000,
            poll_timeout_secs: 120,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    retrieval: Option<RetrievalConfig>,
    generation: Option<GenerationConfig>,
    ingest: Option<IngestConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
            retrieval: RetrievalConfig::default(),
            generation: GenerationConfig::default(),
            ingest: IngestConfig::default(),
            retrieval_api_key: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `.env`, the config file, and environment variables.
    ///
    /// Environment variables:
    /// - `RAGLINE_WORKSPACE`: Override workspace path
    /// - `RAGLINE_CONFIG`: Path to config file
    /// - `RAGLINE_RETRIEVAL_URL`: Retrieval service base URL
    /// - `RAGLINE_SCOPE`: Default retrieval scope
    /// - `RAGLINE_MODEL`: Generation model identifier
    /// - `RAGIE_API_KEY` (or `retrieval.apiKeyEnv`): Retrieval credential
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// A missing retrieval credential is not an error here; see
    /// [`AppConfig::require_retrieval_key`].
    ///
    /// # Example
    /// ```no_run
    /// use ragline_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Scope: {}", config.retrieval.default_scope);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Load configuration, with CLI-provided workspace and config file
    /// paths taking precedence over their environment variables.
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        // Real environment variables win over .env entries
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(AppError::Config(format!("Failed to read .env file: {}", e)));
            }
        }

        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("RAGLINE_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("RAGLINE_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }

        if config_file.is_some() {
            config.config_file = config_file;
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.ragline_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(url) = std::env::var("RAGLINE_RETRIEVAL_URL") {
            config.retrieval.base_url = url;
        }

        if let Ok(scope) = std::env::var("RAGLINE_SCOPE") {
            config.retrieval.default_scope = scope;
        }

        if let Ok(model) = std::env::var("RAGLINE_MODEL") {
            config.generation.model = model;
        }

        config.retrieval_api_key = std::env::var(&config.retrieval.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        tracing::debug!("Merging config file {:?}", path);

        let mut result = self.clone();

        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }

        if let Some(generation) = config_file.generation {
            result.generation = generation;
        }

        if let Some(ingest) = config_file.ingest {
            result.ingest = ingest;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        scope: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(scope) = scope {
            self.retrieval.default_scope = scope;
        }

        if let Some(model) = model {
            self.generation.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .ragline directory.
    pub fn ragline_dir(&self) -> PathBuf {
        self.workspace.join(".ragline")
    }

    /// The retrieval credential, or a configuration error when absent.
    ///
    /// Called before the pipeline is built; no network call happens
    /// without it.
    pub fn require_retrieval_key(&self) -> AppResult<&str> {
        self.retrieval_api_key.as_deref().ok_or_else(|| {
            AppError::Config(format!(
                "Missing retrieval API key! Set {} in the environment or .env file.",
                self.retrieval.api_key_env
            ))
        })
    }

    /// Resolve the generation credential from its environment variable.
    ///
    /// Only used when the caller did not supply a key for the session.
    pub fn resolve_generation_key(&self) -> Option<String> {
        std::env::var(&self.generation.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Validate sampling parameters, scope and polling settings.
    ///
    /// Provider and index mode names are checked by the crates that parse
    /// them.
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(AppError::Config(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.generation.temperature
            )));
        }

        if !(0.0..=1.0).contains(&self.generation.top_p) {
            return Err(AppError::Config(format!(
                "topP must be between 0.0 and 1.0, got {}",
                self.generation.top_p
            )));
        }

        if self.retrieval.default_scope.is_empty() {
            return Err(AppError::Config("Default scope must not be empty".to_string()));
        }

        if self.ingest.poll_interval_ms == 0 {
            return Err(AppError::Config(
                "pollIntervalMs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
