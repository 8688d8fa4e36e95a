use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Platform data directory, falling back to the working directory when the
/// platform reports none.
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vidscribe")
        .join("transcripts.db")
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_snippet_start")]
    pub snippet_start: String,
    #[serde(default = "default_snippet_end")]
    pub snippet_end: String,
    #[serde(default = "default_snippet_ellipsis")]
    pub snippet_ellipsis: String,
    #[serde(default = "default_snippet_tokens")]
    pub snippet_tokens: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            snippet_start: default_snippet_start(),
            snippet_end: default_snippet_end(),
            snippet_ellipsis: default_snippet_ellipsis(),
            snippet_tokens: default_snippet_tokens(),
        }
    }
}

fn default_limit() -> i64 {
    50
}
fn default_snippet_start() -> String {
    "<mark>".to_string()
}
fn default_snippet_end() -> String {
    "</mark>".to_string()
}
fn default_snippet_ellipsis() -> String {
    "...".to_string()
}
fn default_snippet_tokens() -> i64 {
    32
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranscriptionConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Language hint for the external pipeline; empty means auto-detect.
    #[serde(default)]
    pub language: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            language: String::new(),
        }
    }
}

fn default_model() -> String {
    "base".to_string()
}

impl TranscriptionConfig {
    pub fn language_opt(&self) -> Option<String> {
        if self.language.trim().is_empty() {
            None
        } else {
            Some(self.language.clone())
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate search
    if config.search.limit < 1 {
        anyhow::bail!("search.limit must be >= 1");
    }

    // FTS5 rejects snippet windows outside this range
    if !(1..=64).contains(&config.search.snippet_tokens) {
        anyhow::bail!("search.snippet_tokens must be in [1, 64]");
    }

    if config.search.snippet_start.is_empty() || config.search.snippet_end.is_empty() {
        anyhow::bail!("search.snippet_start and search.snippet_end must be non-empty");
    }

    // Validate transcription
    if config.transcription.model.trim().is_empty() {
        anyhow::bail!("transcription.model must be non-empty");
    }

    Ok(config)
}

/// Load the config file when it exists; otherwise use built-in defaults so
/// the tool works with zero setup. Parse and validation errors in an
/// existing file still surface.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}
