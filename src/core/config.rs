//! Configuration management for Vitrine.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with defaults matching the artifact
//! catalog deployment for every setting.

use crate::core::error::{Result, VitrineError};
use crate::core::types::Operator;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub autocomplete: AutocompleteConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Which search index answers queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Embedded Tantivy collection
    #[default]
    Local,
    /// Remote Solr core over HTTP
    Solr,
}

impl std::str::FromStr for BackendKind {
    type Err = VitrineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "solr" => Ok(BackendKind::Solr),
            other => Err(VitrineError::ConfigError(format!(
                "Unknown backend kind '{other}' (expected 'local' or 'solr')"
            ))),
        }
    }
}

/// Search index connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,

    /// Base URL of the Solr core (used by the solr backend)
    #[serde(default = "default_solr_url")]
    pub solr_url: String,

    /// Per-attempt timeout for index requests
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Retries after the first attempt for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    #[serde(default = "default_retry_min_delay_ms")]
    pub retry_min_delay_ms: u64,

    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory for local collections
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Collection queried by the local backend
    #[serde(default = "default_collection")]
    pub collection: String,
}

/// Default request parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Page sizes a request may select
    #[serde(default = "default_per_page_options")]
    pub per_page_options: Vec<usize>,

    #[serde(default = "default_per_page")]
    pub default_per_page: usize,

    /// Values shown for a facet-limited field
    #[serde(default = "default_facet_limit")]
    pub default_facet_limit: usize,

    /// Values fetched when a single facet is expanded
    #[serde(default = "default_expanded_facet_limit")]
    pub expanded_facet_limit: usize,

    #[serde(default = "default_facet_mincount")]
    pub facet_mincount: u64,

    #[serde(default = "default_true")]
    pub spellcheck: bool,

    /// Alternate spellings requested alongside results
    #[serde(default = "default_spell_max")]
    pub spell_max: usize,

    /// Query used when the user supplies no text
    #[serde(default = "default_match_all_query")]
    pub match_all_query: String,

    #[serde(default)]
    pub default_operator: Operator,

    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
}

/// Suggestion endpoint settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AutocompleteConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Request handler path on the index
    #[serde(default = "default_autocomplete_path")]
    pub path: String,

    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

/// Field registry source
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// TOML field definitions replacing the embedded artifact catalog
    #[serde(default)]
    pub fields_file: Option<PathBuf>,
}

// Default value functions
fn default_solr_url() -> String {
    "http://localhost:8983/solr/mmap".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> usize {
    3
}

fn default_retry_min_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2_000
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_collection() -> String {
    "artifacts".to_string()
}

fn default_per_page_options() -> Vec<usize> {
    vec![80, 160, 240, 1000]
}

fn default_per_page() -> usize {
    80
}

fn default_facet_limit() -> usize {
    10
}

fn default_expanded_facet_limit() -> usize {
    100
}

fn default_facet_mincount() -> u64 {
    1
}

fn default_true() -> bool {
    true
}

fn default_spell_max() -> usize {
    5
}

fn default_match_all_query() -> String {
    "*:*".to_string()
}

fn default_max_query_length() -> usize {
    500
}

fn default_autocomplete_path() -> String {
    "suggest".to_string()
}

fn default_max_suggestions() -> usize {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            solr_url: default_solr_url(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
            retry_min_delay_ms: default_retry_min_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
            collection: default_collection(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_page_options: default_per_page_options(),
            default_per_page: default_per_page(),
            default_facet_limit: default_facet_limit(),
            expanded_facet_limit: default_expanded_facet_limit(),
            facet_mincount: default_facet_mincount(),
            spellcheck: true,
            spell_max: default_spell_max(),
            match_all_query: default_match_all_query(),
            default_operator: Operator::default(),
            max_query_length: default_max_query_length(),
        }
    }
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_autocomplete_path(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| VitrineError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. VITRINE_CONFIG env var
    /// 2. XDG config file (~/.config/vitrine/config.toml)
    /// 3. ./vitrine.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("VITRINE_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("vitrine.toml").exists() {
                Self::from_file("vitrine.toml")?
            } else {
                Self::default()
            }
        };

        // Collections live under the XDG data directory unless set explicitly
        if env::var("VITRINE_INDEX_DIR").is_err() && config.storage.index_dir == default_index_dir()
        {
            config.storage.index_dir = xdg.index_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Backend configuration
        if let Ok(kind) = env::var("VITRINE_BACKEND") {
            match kind.parse() {
                Ok(k) => self.backend.kind = k,
                Err(e) => tracing::warn!("Ignoring VITRINE_BACKEND: {}", e),
            }
        }
        if let Ok(url) = env::var("VITRINE_SOLR_URL") {
            self.backend.solr_url = url;
        }
        if let Ok(timeout) = env::var("VITRINE_REQUEST_TIMEOUT_MS") {
            if let Ok(t) = timeout.parse() {
                self.backend.request_timeout_ms = t;
            }
        }
        if let Ok(retries) = env::var("VITRINE_MAX_RETRIES") {
            if let Ok(r) = retries.parse() {
                self.backend.max_retries = r;
            }
        }

        // Storage configuration
        if let Ok(index_dir) = env::var("VITRINE_INDEX_DIR") {
            self.storage.index_dir = PathBuf::from(index_dir);
        }
        if let Ok(collection) = env::var("VITRINE_COLLECTION") {
            self.storage.collection = collection;
        }

        // Search configuration
        if let Ok(per_page) = env::var("VITRINE_DEFAULT_PER_PAGE") {
            if let Ok(p) = per_page.parse() {
                self.search.default_per_page = p;
            }
        }
        if let Ok(limit) = env::var("VITRINE_FACET_LIMIT") {
            if let Ok(l) = limit.parse() {
                self.search.default_facet_limit = l;
            }
        }
        if let Ok(spell_max) = env::var("VITRINE_SPELL_MAX") {
            if let Ok(s) = spell_max.parse() {
                self.search.spell_max = s;
            }
        }

        // Autocomplete configuration
        if let Ok(enabled) = env::var("VITRINE_AUTOCOMPLETE") {
            if let Ok(e) = enabled.parse() {
                self.autocomplete.enabled = e;
            }
        }

        // Catalog configuration
        if let Ok(fields) = env::var("VITRINE_FIELDS_FILE") {
            self.catalog.fields_file = Some(PathBuf::from(fields));
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.backend.request_timeout_ms == 0 {
            return Err(VitrineError::ConfigError(
                "Request timeout must be non-zero".to_string(),
            ));
        }

        if self.backend.retry_min_delay_ms > self.backend.retry_max_delay_ms {
            return Err(VitrineError::ConfigError(
                "Retry min delay cannot exceed retry max delay".to_string(),
            ));
        }

        if self.backend.kind == BackendKind::Solr && self.backend.solr_url.trim().is_empty() {
            return Err(VitrineError::ConfigError(
                "Solr backend requires solr_url".to_string(),
            ));
        }

        if self.storage.collection.trim().is_empty() {
            return Err(VitrineError::ConfigError(
                "Collection name must be non-empty".to_string(),
            ));
        }

        if self.search.per_page_options.is_empty() {
            return Err(VitrineError::ConfigError(
                "At least one page size must be allowed".to_string(),
            ));
        }

        if self.search.per_page_options.contains(&0) {
            return Err(VitrineError::ConfigError(
                "Page sizes must be non-zero".to_string(),
            ));
        }

        if !self
            .search
            .per_page_options
            .contains(&self.search.default_per_page)
        {
            return Err(VitrineError::ConfigError(format!(
                "Default page size {} is not one of {:?}",
                self.search.default_per_page, self.search.per_page_options
            )));
        }

        if self.search.default_facet_limit == 0 {
            return Err(VitrineError::ConfigError(
                "Facet limit must be non-zero".to_string(),
            ));
        }

        if self.search.expanded_facet_limit < self.search.default_facet_limit {
            return Err(VitrineError::ConfigError(
                "Expanded facet limit cannot be below the default facet limit".to_string(),
            ));
        }

        if self.search.max_query_length == 0 {
            return Err(VitrineError::ConfigError(
                "Max query length must be non-zero".to_string(),
            ));
        }

        if self.autocomplete.max_suggestions == 0 {
            return Err(VitrineError::ConfigError(
                "Max suggestions must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Backend: {:?}", self.backend.kind);
        if self.backend.kind == BackendKind::Solr {
            tracing::info!("  Solr URL: {}", self.backend.solr_url);
        }
        tracing::info!(
            "  Request timeout: {}ms ({} retries)",
            self.backend.request_timeout_ms,
            self.backend.max_retries
        );
        tracing::info!("  Index dir: {:?}", self.storage.index_dir);
        tracing::info!("  Collection: {}", self.storage.collection);
        tracing::info!("  Page sizes: {:?}", self.search.per_page_options);
        tracing::info!("  Facet limit: {}", self.search.default_facet_limit);
        tracing::info!("  Spellcheck: {} (max {})", self.search.spellcheck, self.search.spell_max);
        tracing::info!("  Autocomplete: {}", self.autocomplete.enabled);
        match &self.catalog.fields_file {
            Some(path) => tracing::info!("  Fields file: {:?}", path),
            None => tracing::info!("  Fields: embedded artifact catalog"),
        }
    }
}
