//! Configuration management for lexlink.
//!
//! Configuration is layered, later sources winning:
//! - Built-in defaults
//! - YAML config file (`lexlink.yaml`, or the path in `LEXLINK_CONFIG`)
//! - Environment variables
//! - Command-line flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lexlink.yaml";

/// Providers the LLM factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["openai", "openai-compatible"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Chat and embedding model settings
    pub llm: LlmSettings,

    /// Retrieval-augmented answering settings
    pub rag: RagSettings,

    /// Entity linking settings
    pub linking: LinkingSettings,

    /// Remote search provider endpoints
    pub search: SearchSettings,

    /// Glossary harvester settings
    pub harvest: HarvestSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as JSON lines
    pub json_logs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, uploads included
    #[serde(rename = "maxUploadBytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

/// LLM configuration shared by chat completion and embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Provider name ("openai", "openai-compatible")
    pub provider: String,

    /// Base URL of the API; provider default when unset
    pub endpoint: Option<String>,

    /// Chat model identifier
    pub model: String,

    /// Embedding provider ("openai", "mock")
    #[serde(rename = "embeddingProvider")]
    pub embedding_provider: String,

    /// Embedding model identifier
    #[serde(rename = "embeddingModel")]
    pub embedding_model: String,

    /// Name of the environment variable holding the API key
    #[serde(rename = "apiKeyEnv")]
    pub api_key_env: String,

    /// Resolved API key; never written back out
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            endpoint: None,
            model: "gpt-3.5-turbo".to_string(),
            embedding_provider: "openai".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Documents retrieved per question for uploaded files
    #[serde(rename = "uploadTopK")]
    pub upload_top_k: usize,

    /// Documents retrieved per question for the fixed corpus
    #[serde(rename = "corpusTopK")]
    pub corpus_top_k: usize,

    /// Run the extraction pass over retrieved documents before answering
    #[serde(rename = "compressContext")]
    pub compress_context: bool,

    /// PDF answered against by `/api/sap/qa`
    #[serde(rename = "corpusPath")]
    pub corpus_path: PathBuf,

    /// Directory of prompt overrides (`<id>.yml`)
    #[serde(rename = "promptsDir")]
    pub prompts_dir: Option<PathBuf>,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            upload_top_k: 3,
            corpus_top_k: 4,
            compress_context: false,
            corpus_path: PathBuf::from("docs/sap_docs.pdf"),
            prompts_dir: None,
        }
    }
}

/// What to do when a search provider returns nothing twice in a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyResultPolicy {
    /// Treat it as "no match" and continue with no documents
    #[default]
    Accept,
    /// Fail the request with an upstream error
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkingSettings {
    /// Harvested glossary merged into the SAP candidate pool
    #[serde(rename = "glossaryPath")]
    pub glossary_path: PathBuf,

    /// Behaviour after the retry also comes back empty
    #[serde(rename = "emptyResult")]
    pub empty_result: EmptyResultPolicy,
}

impl Default for LinkingSettings {
    fn default() -> Self {
        Self {
            glossary_path: PathBuf::from("docs/sap_glossary.json"),
            empty_result: EmptyResultPolicy::Accept,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    #[serde(rename = "wikipediaEndpoint")]
    pub wikipedia_endpoint: String,

    #[serde(rename = "sapHelpEndpoint")]
    pub sap_help_endpoint: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            wikipedia_endpoint: "https://en.wikipedia.org/w/api.php".to_string(),
            sap_help_endpoint: "https://help.sap.com/http.svc/elasticsearch".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestSettings {
    pub endpoint: String,
    pub language: String,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    pub pages: u32,
    pub output: PathBuf,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://help.sap.com/http.svc/glossary".to_string(),
            language: "en-US".to_string(),
            page_size: 1000,
            pages: 68,
            output: PathBuf::from("docs/sap_glossary.json"),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    server: Option<ServerConfig>,
    llm: Option<LlmSettings>,
    rag: Option<RagSettings>,
    linking: Option<LinkingSettings>,
    search: Option<SearchSettings>,
    harvest: Option<HarvestSettings>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            server: ServerConfig::default(),
            llm: LlmSettings::default(),
            rag: RagSettings::default(),
            linking: LinkingSettings::default(),
            search: SearchSettings::default(),
            harvest: HarvestSettings::default(),
            log_level: None,
            verbose: false,
            no_color: false,
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and the process environment.
    ///
    /// Environment variables:
    /// - `LEXLINK_CONFIG`: Path to config file (when `config_file` is `None`)
    /// - `PORT`: Server port
    /// - `LEXLINK_PROVIDER`: LLM provider
    /// - `LEXLINK_MODEL`: Chat model identifier
    /// - `LEXLINK_EMBEDDING_MODEL`: Embedding model identifier
    /// - `LEXLINK_LLM_ENDPOINT`: Base URL of the LLM API
    /// - `OPENAI_API_KEY` (or the variable named by `llm.apiKeyEnv`): API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use lexlink_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Port: {}", config.server.port);
    /// ```
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        Self::load_with(config_file, |key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    pub fn load_with<F>(config_file: Option<&Path>, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let explicit = config_file
            .map(Path::to_path_buf)
            .or_else(|| lookup("LEXLINK_CONFIG").map(PathBuf::from));

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config = config.merge_yaml(&path)?;
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    config = config.merge_yaml(&default_path)?;
                }
            }
        }

        // Environment variables override YAML config
        if let Some(port) = lookup("PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid PORT value: {}", port)))?;
        }

        if let Some(provider) = lookup("LEXLINK_PROVIDER") {
            config.llm.provider = provider;
        }

        if let Some(model) = lookup("LEXLINK_MODEL") {
            config.llm.model = model;
        }

        if let Some(model) = lookup("LEXLINK_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }

        if let Some(endpoint) = lookup("LEXLINK_LLM_ENDPOINT") {
            config.llm.endpoint = Some(endpoint);
        }

        config.llm.api_key = lookup(&config.llm.api_key_env);

        if let Some(level) = lookup("RUST_LOG") {
            config.log_level = Some(level);
        }

        if lookup("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();
        result.config_file = Some(path.to_path_buf());

        if let Some(server) = config_file.server {
            result.server = server;
        }
        if let Some(llm) = config_file.llm {
            result.llm = llm;
        }
        if let Some(rag) = config_file.rag {
            result.rag = rag;
        }
        if let Some(linking) = config_file.linking {
            result.linking = linking;
        }
        if let Some(search) = config_file.search {
            result.search = search;
        }
        if let Some(harvest) = config_file.harvest {
            result.harvest = harvest;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.json_logs = json;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config
    /// file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.llm.provider = provider;
        }

        if let Some(model) = model {
            self.llm.model = model;
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

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.llm.provider.as_str();

        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        match provider {
            "openai" => {
                if self.llm.api_key.is_none() {
                    return Err(AppError::Config(format!(
                        "API key not found in environment variable: {}",
                        self.llm.api_key_env
                    )));
                }
            }
            "openai-compatible" => {
                if self.llm.endpoint.is_none() {
                    return Err(AppError::Config(
                        "Provider openai-compatible requires llm.endpoint".to_string(),
                    ));
                }
            }
            _ => {}
        }

        if self.rag.upload_top_k == 0 || self.rag.corpus_top_k == 0 {
            return Err(AppError::Config(
                "Retrieval width must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
