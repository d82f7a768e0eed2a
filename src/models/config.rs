//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote content API settings
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Bundled corpus settings
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Listing/pagination settings
    #[serde(default)]
    pub listing: ListingConfig,

    /// Random-record composition settings
    #[serde(default)]
    pub random: RandomConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.remote.base_url.trim().is_empty() {
            return Err(AppError::validation("remote.base_url is empty"));
        }
        Url::parse(&self.remote.base_url)
            .map_err(|e| AppError::validation(format!("remote.base_url is invalid: {e}")))?;
        if self.remote.timeout_secs == 0 {
            return Err(AppError::validation("remote.timeout_secs must be > 0"));
        }
        if self.listing.default_page_size == 0 {
            return Err(AppError::validation(
                "listing.default_page_size must be > 0",
            ));
        }
        if self.random.sample_limit == 0 {
            return Err(AppError::validation("random.sample_limit must be > 0"));
        }
        Ok(())
    }
}

/// Remote content API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base endpoint of the content API
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// API key sent as `x-api-key`; empty disables the header
    #[serde(default)]
    pub api_key: String,

    /// Hard timeout for remote data calls and the reachability probe,
    /// in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// How long a probe outcome is reused before re-probing, in seconds.
    /// Zero re-probes on every routing decision.
    #[serde(default = "defaults::probe_ttl")]
    pub probe_ttl_secs: u64,

    /// Whether the remote source is consulted at all
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            api_key: String::new(),
            timeout_secs: defaults::timeout(),
            probe_ttl_secs: defaults::probe_ttl(),
            enabled: defaults::enabled(),
        }
    }
}

/// Bundled corpus settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorpusConfig {
    /// Optional directory holding per-collection corpus JSON overrides
    /// (`<slug>.json`). Files that are missing or unparseable fall back to
    /// the embedded documents.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Listing/pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Page size used when the caller does not supply one
    #[serde(default = "defaults::page_size")]
    pub default_page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: defaults::page_size(),
        }
    }
}

/// Random-record composition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomConfig {
    /// Collections preferred for the random draw when present in the
    /// resolved set (the six canonical compilations)
    #[serde(default = "defaults::major_collections")]
    pub major_collections: Vec<String>,

    /// Upper bound on the item page sampled for the final draw
    #[serde(default = "defaults::sample_limit")]
    pub sample_limit: usize,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            major_collections: defaults::major_collections(),
            sample_limit: defaults::sample_limit(),
        }
    }
}

mod defaults {
    // Remote defaults
    pub fn base_url() -> String {
        "https://api.sunnah.com/v1".into()
    }
    pub fn timeout() -> u64 {
        5
    }
    pub fn probe_ttl() -> u64 {
        30
    }
    pub fn enabled() -> bool {
        true
    }

    // Listing defaults
    pub fn page_size() -> usize {
        20
    }

    // Random defaults
    pub fn major_collections() -> Vec<String> {
        vec![
            "bukhari".into(),
            "muslim".into(),
            "abudawud".into(),
            "tirmidhi".into(),
            "nasai".into(),
            "ibnmajah".into(),
        ]
    }
    pub fn sample_limit() -> usize {
        50
    }
}
