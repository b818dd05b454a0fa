//! Site configuration module.
//!
//! Handles loading and validating `config.toml` from the content root. All
//! options are optional; the stock defaults target the dubia.cc archive:
//!
//! ```toml
//! content_root = "content"
//!
//! [site]
//! root_href_dev = "http://127.0.0.1:8080"
//! root_href_prod = "https://dubia.cc"
//!
//! [articles]
//! rosary_slugs = ["rosary", "rosenkranz"]
//! strict_dropcap = true
//!
//! [processing]
//! # max_threads = 4
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::richtext::Dropcap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// Sparse files are fine; every field falls back to its stock default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Path to the content root directory, relative to the source root.
    pub content_root: String,
    /// Site addressing.
    pub site: SiteSection,
    /// Article rendering policies.
    pub articles: ArticlesConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_root: "content".to_string(),
            site: SiteSection::default(),
            articles: ArticlesConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

/// Site addressing: the `$$ROOT_HREF$$` token resolves to one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Site name used as the homepage title.
    pub title: String,
    pub root_href_dev: String,
    pub root_href_prod: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "dubia.cc".to_string(),
            root_href_dev: "http://127.0.0.1:8080".to_string(),
            root_href_prod: "https://dubia.cc".to_string(),
        }
    }
}

/// Article rendering policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArticlesConfig {
    /// Slugs rendered as rosary devotional pages instead of regular articles.
    pub rosary_slugs: Vec<String>,
    /// Fail the run when a dropcap would wrap a quote character. Disable
    /// only for content sets where quoted openings are deliberate.
    pub strict_dropcap: bool,
}

impl Default for ArticlesConfig {
    fn default() -> Self {
        Self {
            rosary_slugs: vec!["rosary".to_string(), "rosenkranz".to_string()],
            strict_dropcap: true,
        }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel article-rendering workers.
    /// When absent, defaults to the number of CPU cores.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.min(cores)).unwrap_or(cores)
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for href in [&self.site.root_href_dev, &self.site.root_href_prod] {
            if href.is_empty() {
                return Err(ConfigError::Validation(
                    "site.root_href_* must not be empty".into(),
                ));
            }
            if href.ends_with('/') {
                return Err(ConfigError::Validation(format!(
                    "site.root_href_* must not end with '/': {href}"
                )));
            }
        }
        if self.articles.rosary_slugs.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::Validation(
                "articles.rosary_slugs entries must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Root href for the build kind.
    pub fn root_href(&self, production: bool) -> &str {
        if production {
            &self.site.root_href_prod
        } else {
            &self.site.root_href_dev
        }
    }

    pub fn is_rosary_slug(&self, slug: &str) -> bool {
        self.articles.rosary_slugs.iter().any(|s| s == slug)
    }

    pub fn dropcap(&self) -> Dropcap {
        if self.articles.strict_dropcap {
            Dropcap::Strict
        } else {
            Dropcap::Lenient
        }
    }
}

/// Load config from `config.toml` in the given directory.
///
/// A missing file yields the stock defaults; a present file is parsed with
/// unknown keys rejected, then validated.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join("config.toml");
    let config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and
/// explanations. Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Breviary Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Path to the content directory, relative to the source root.
content_root = "content"

# -----------------------------------------------------------------------------
# Site addressing
# -----------------------------------------------------------------------------
[site]
# Site name, used as the homepage title.
title = "dubia.cc"

# Base URL for links in development builds (no trailing slash).
root_href_dev = "http://127.0.0.1:8080"

# Base URL for links in production builds (no trailing slash).
root_href_prod = "https://dubia.cc"

# -----------------------------------------------------------------------------
# Article rendering
# -----------------------------------------------------------------------------
[articles]
# Slugs rendered as rosary devotional pages instead of regular articles.
rosary_slugs = ["rosary", "rosenkranz"]

# Fail the run when an article's opening dropcap character is a quote mark.
strict_dropcap = true

# -----------------------------------------------------------------------------
# Processing
# -----------------------------------------------------------------------------
[processing]
# Maximum parallel article-rendering workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_targets_dubia() {
        let config = SiteConfig::default();
        assert_eq!(config.content_root, "content");
        assert_eq!(config.site.root_href_prod, "https://dubia.cc");
        assert_eq!(config.root_href(false), "http://127.0.0.1:8080");
        assert_eq!(config.root_href(true), "https://dubia.cc");
    }

    #[test]
    fn default_rosary_slugs_cover_both_languages() {
        let config = SiteConfig::default();
        assert!(config.is_rosary_slug("rosary"));
        assert!(config.is_rosary_slug("rosenkranz"));
        assert!(!config.is_rosary_slug("creed"));
    }

    #[test]
    fn strict_dropcap_defaults_on() {
        let config = SiteConfig::default();
        assert_eq!(config.dropcap(), Dropcap::Strict);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[articles]
strict_dropcap = false
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.dropcap(), Dropcap::Lenient);
        // Default values preserved
        assert_eq!(config.site.root_href_prod, "https://dubia.cc");
        assert!(config.is_rosary_slug("rosenkranz"));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.root_href_prod, "https://dubia.cc");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[site]
root_href_prod = "https://staging.dubia.cc"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.root_href_prod, "https://staging.dubia.cc");
        assert_eq!(config.site.root_href_dev, "http://127.0.0.1:8080");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = r#"
[site]
root_href = "https://dubia.cc"
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    #[test]
    fn trailing_slash_in_root_href_rejected() {
        let mut config = SiteConfig::default();
        config.site.root_href_prod = "https://dubia.cc/".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_rosary_slug_rejected() {
        let mut config = SiteConfig::default();
        config.articles.rosary_slugs.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(
            effective_threads(&ProcessingConfig {
                max_threads: Some(99999)
            }),
            cores
        );
        assert_eq!(effective_threads(&ProcessingConfig { max_threads: None }), cores);
        assert_eq!(
            effective_threads(&ProcessingConfig {
                max_threads: Some(1)
            }),
            1
        );
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.site.root_href_prod, SiteConfig::default().site.root_href_prod);
        assert_eq!(config.articles.rosary_slugs, vec!["rosary", "rosenkranz"]);
        assert_eq!(config.processing.max_threads, None);
    }
}
