//! Directory configuration: parsing, normalization, and loading.
//!
//! The configuration is an optional TOML file:
//!
//! ```toml
//! [feed]
//! default_per_page = 9
//! max_per_page = 100
//! ```
//!
//! Every key is optional. Normalization replaces missing or zero values with
//! the defaults and lowers `default_per_page` to `max_per_page` when it exceeds
//! it, so a loaded [`FeedCfg`] is always usable as-is.
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]

use std::num::NonZeroUsize;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Feed page size used when a request does not give a valid one.
pub const DEFAULT_PER_PAGE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(8);
/// Largest page size a request may ask for.
pub const MAX_PER_PAGE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(99);

/// Top-level TOML document.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryToml {
    /// `[feed]` table.
    #[serde(default)]
    pub feed: FeedToml,
}

/// Raw `[feed]` table as written in the file.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FeedToml {
    /// Page size when `per_page` is absent or invalid.
    pub default_per_page: Option<usize>,
    /// Upper bound for `per_page`.
    pub max_per_page: Option<usize>,
}

/// Normalized configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryConfig {
    /// Feed paging settings.
    pub feed: FeedCfg,
}

/// Normalized feed paging settings; `default_per_page <= max_per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedCfg {
    /// Page size when `per_page` is absent or invalid.
    pub default_per_page: NonZeroUsize,
    /// Upper bound for `per_page`.
    pub max_per_page: NonZeroUsize,
}

impl Default for FeedCfg {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

impl FeedCfg {
    /// Replaces the default page size; zero is ignored and the value is capped
    /// at `max_per_page`.
    pub fn with_default_per_page(self, per_page: usize) -> Self {
        let default_per_page = NonZeroUsize::new(per_page)
            .unwrap_or(self.default_per_page)
            .min(self.max_per_page);
        Self {
            default_per_page,
            ..self
        }
    }
}

/// Turns the raw document into a usable configuration.
pub fn normalize_config(raw: DirectoryToml) -> DirectoryConfig {
    let max_per_page = raw
        .feed
        .max_per_page
        .and_then(NonZeroUsize::new)
        .unwrap_or(MAX_PER_PAGE);
    let default_per_page = raw
        .feed
        .default_per_page
        .and_then(NonZeroUsize::new)
        .unwrap_or(DEFAULT_PER_PAGE)
        .min(max_per_page);

    DirectoryConfig {
        feed: FeedCfg {
            default_per_page,
            max_per_page,
        },
    }
}

/// Parse and normalize a configuration from a TOML string.
///
/// Errors:
/// - TOML parse failures, including unknown keys
pub fn load_config_str(toml_str: &str) -> anyhow::Result<DirectoryConfig> {
    let raw: DirectoryToml = toml::from_str(toml_str).context("failed to parse directory config TOML")?;
    let cfg = normalize_config(raw);
    tracing::debug!(?cfg, "directory config loaded");
    Ok(cfg)
}

/// Read a configuration file from disk, parse, and normalize it.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<DirectoryConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
