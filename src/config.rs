//! Configuration with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/liftsync/liftsync.toml`
//! 3. Environment variables: `LIFTSYNC_*` prefix
//! 4. Command-line flags (applied in the CLI layer)
//!
//! The resolved [`RunConfig`] is threaded explicitly through the pipeline
//! stages; there is no module-level mutable state.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Default field type marking a cross-reference on either side.
pub const DEFAULT_XREF_TYPE: &str = "CAWL";

/// Where candidate gloss text is taken from in the source database.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateLocation {
    /// The owning entry's headword (`lexical-unit > form > text`)
    Headword,
    /// The sense's existing gloss (`gloss > text`)
    Gloss,
}

/// Persistent settings for liftsync.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Language of the glosses to copy (default: inferred from the source)
    pub lang: Option<String>,
    /// Field type marking a cross-reference in the source database
    pub source_xref_type: String,
    /// Field type marking a cross-reference in the target databases
    pub target_xref_type: String,
    /// Locations candidate text is taken from
    pub copy_from: Vec<CandidateLocation>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lang: None,
            source_xref_type: DEFAULT_XREF_TYPE.into(),
            target_xref_type: DEFAULT_XREF_TYPE.into(),
            copy_from: vec![CandidateLocation::Headword],
        }
    }
}

/// Raw settings for intermediate parsing (all fields Option to detect
/// "not specified" and inherit from the layer below).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub lang: Option<String>,
    pub source_xref_type: Option<String>,
    pub target_xref_type: Option<String>,
    pub copy_from: Option<Vec<CandidateLocation>>,
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "liftsync").map(|dirs| dirs.config_dir().join("liftsync.toml"))
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            lang: overlay.lang.clone().or_else(|| self.lang.clone()),
            source_xref_type: overlay
                .source_xref_type
                .clone()
                .unwrap_or_else(|| self.source_xref_type.clone()),
            target_xref_type: overlay
                .target_xref_type
                .clone()
                .unwrap_or_else(|| self.target_xref_type.clone()),
            copy_from: overlay
                .copy_from
                .clone()
                .unwrap_or_else(|| self.copy_from.clone()),
        }
    }

    /// Load settings with layered precedence.
    pub fn load() -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config file, if present
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        Ok(current)
    }

    /// Apply LIFTSYNC_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(Environment::with_prefix("LIFTSYNC"));
        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("lang") {
            settings.lang = Some(val);
        }
        if let Ok(val) = config.get_string("source_xref_type") {
            settings.source_xref_type = val;
        }
        if let Ok(val) = config.get_string("target_xref_type") {
            settings.target_xref_type = val;
        }

        Ok(settings)
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Resolved configuration for one run, passed into each pipeline stage.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Language of the glosses to copy; None means infer from the source
    pub lang: Option<String>,
    pub source_xref_type: String,
    pub target_xref_type: String,
    pub copy_from: Vec<CandidateLocation>,
}

impl RunConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            lang: settings.lang.clone(),
            source_xref_type: settings.source_xref_type.clone(),
            target_xref_type: settings.target_xref_type.clone(),
            copy_from: settings.copy_from.clone(),
        }
    }
}
