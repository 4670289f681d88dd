//! Configuration parsing and validation.
//!
//! Lectio is configured via a TOML file (default: `config/lectio.toml`).
//! Every adapter reads its paths from here; nothing is global.
//!
//! # Example Configuration
//!
//! ```toml
//! [commentary]
//! path = "data/commentaries.sqlite"
//!
//! [bible]
//! dir = "data/bible_translations"
//! default_translation = "ESV"
//!
//! [bible.files]
//! KJV = "/srv/bibles/kjv.sqlite"
//!
//! [index]
//! path = "data/index.sqlite"
//!
//! [documents]
//! root = "static"
//!
//! [retrieval]
//! result_limit = 20
//! commentary_snippet_chars = 700
//! context_radius = 560
//! fulltext_fallback = true
//!
//! [server]
//! bind = "0.0.0.0:34892"
//! ```

use anyhow::{Context, Result};
use lectio_core::router::RouterOptions;
use lectio_core::Translation;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub commentary: CommentaryConfig,
    pub bible: BibleConfig,
    pub index: IndexConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// The commentary database.
#[derive(Debug, Deserialize, Clone)]
pub struct CommentaryConfig {
    pub path: PathBuf,
}

/// Per-translation Bible databases.
#[derive(Debug, Deserialize, Clone)]
pub struct BibleConfig {
    /// Directory holding `<CODE>.db` files.
    pub dir: PathBuf,
    /// Translation used when a query names none.
    #[serde(default)]
    pub default_translation: Translation,
    /// Per-translation path overrides, keyed by code.
    #[serde(default)]
    pub files: BTreeMap<Translation, PathBuf>,
}

impl BibleConfig {
    /// Database file for `translation`: the override if one is set,
    /// otherwise `<dir>/<CODE>.db`.
    pub fn path_for(&self, translation: Translation) -> PathBuf {
        match self.files.get(&translation) {
            Some(path) => path.clone(),
            None => self.dir.join(format!("{}.db", translation.code())),
        }
    }
}

/// The FTS5 index database.
#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    pub path: PathBuf,
}

/// Where indexed `file_path` values resolve.
#[derive(Debug, Deserialize, Clone)]
pub struct DocumentsConfig {
    #[serde(default = "default_documents_root")]
    pub root: PathBuf,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            root: default_documents_root(),
        }
    }
}

fn default_documents_root() -> PathBuf {
    PathBuf::from("static")
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_result_limit")]
    pub result_limit: i64,
    #[serde(default = "default_commentary_snippet_chars")]
    pub commentary_snippet_chars: usize,
    #[serde(default = "default_context_radius")]
    pub context_radius: usize,
    #[serde(default = "default_fulltext_fallback")]
    pub fulltext_fallback: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
            commentary_snippet_chars: default_commentary_snippet_chars(),
            context_radius: default_context_radius(),
            fulltext_fallback: default_fulltext_fallback(),
        }
    }
}

fn default_result_limit() -> i64 {
    20
}
fn default_commentary_snippet_chars() -> usize {
    700
}
fn default_context_radius() -> usize {
    560
}
fn default_fulltext_fallback() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:34892".to_string()
}

impl Config {
    /// Router options derived from `[retrieval]` and `[bible]`.
    pub fn router_options(&self) -> RouterOptions {
        RouterOptions {
            result_limit: self.retrieval.result_limit,
            commentary_snippet_chars: self.retrieval.commentary_snippet_chars,
            context_radius: self.retrieval.context_radius,
            fulltext_fallback: self.retrieval.fulltext_fallback,
            default_translation: self.bible.default_translation,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&content)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.retrieval.result_limit < 1 {
        anyhow::bail!("retrieval.result_limit must be >= 1");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(config)
}
