//! Configuration storage

use anyhow::{bail, Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::context::{Context, Language};

pub const DEFAULT_SHARE_BASE_URL: &str = "https://greetings.example.app";
pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_COLLECTION: &str = "greetings";

/// Which persistence backend stores greetings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// REST + RPC relational service (server-generated slugs)
    #[default]
    Relational,
    /// Document database REST API (client-generated slugs)
    Document,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Relational => "relational",
            Backend::Document => "document",
        }
    }
}

/// Relational backend project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationalConfig {
    /// Project URL, e.g. https://abcd.supabase.co
    pub url: Option<String>,
    /// Public anon key, sent as `apikey`
    pub anon_key: Option<String>,
    /// Signed-in user's access token; the anon key is used when absent
    pub access_token: Option<String>,
}

/// Document backend project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub project_id: Option<String>,
    pub api_key: Option<String>,
    pub collection: String,
    pub endpoint: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            api_key: None,
            collection: DEFAULT_COLLECTION.to_string(),
            endpoint: DEFAULT_FIRESTORE_ENDPOINT.to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    /// Base URL of the web app that renders shared links
    pub share_base_url: String,
    pub language: Language,
    /// Theme used for cards without one
    pub theme: String,
    /// Owner recorded on saved greetings
    pub user_id: Option<String>,
    pub relational: RelationalConfig,
    pub document: DocumentConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            language: Language::default(),
            theme: String::new(),
            user_id: None,
            relational: RelationalConfig::default(),
            document: DocumentConfig::default(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("app", "greetings", "greetings-cli")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;

        // Set restrictive permissions on config file (contains keys)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, perms).context("Failed to set config permissions")?;
        }

        Ok(())
    }

    /// Set a value by dotted key, as used by `config set`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "backend" => {
                self.backend = match value.to_lowercase().as_str() {
                    "relational" => Backend::Relational,
                    "document" => Backend::Document,
                    other => bail!("Unknown backend: {}. Use: relational, document", other),
                }
            }
            "relational.url" => self.relational.url = non_empty(value),
            "relational.anon_key" => self.relational.anon_key = non_empty(value),
            "relational.access_token" => self.relational.access_token = non_empty(value),
            "document.project_id" => self.document.project_id = non_empty(value),
            "document.api_key" => self.document.api_key = non_empty(value),
            "document.collection" => {
                self.document.collection =
                    non_empty(value).unwrap_or_else(|| DEFAULT_COLLECTION.to_string())
            }
            "document.endpoint" => {
                self.document.endpoint =
                    non_empty(value).unwrap_or_else(|| DEFAULT_FIRESTORE_ENDPOINT.to_string())
            }
            "share_base_url" => {
                self.share_base_url =
                    non_empty(value).unwrap_or_else(|| DEFAULT_SHARE_BASE_URL.to_string())
            }
            "language" => {
                self.language = <Language as crate::models::lenient::Tag>::from_tag(value)
                    .with_context(|| format!("Unknown language: {}. Use: en, es, fr, hi", value))?
            }
            "theme" => self.theme = value.trim().to_string(),
            "user_id" => self.user_id = non_empty(value),
            other => bail!("Unknown config key: {}", other),
        }
        Ok(())
    }

    /// Viewer context for decoding and preview
    pub fn context(&self) -> Context {
        Context::new(self.language, &self.theme)
    }
}
