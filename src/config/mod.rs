//! Configuration module for the Cortex Search action
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use crate::params::ParamSource;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "CORTEX_SEARCH_SETTINGS_PATH";

/// Load settings from `path` (defaults when `None`), then apply environment overrides
pub fn load_from(path: Option<&Path>, env: &dyn ParamSource) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    settings.merge_env(env);
    Ok(settings)
}

/// First existing settings file, checking the environment variable first
pub fn locate(env: &dyn ParamSource) -> Option<PathBuf> {
    if let Some(path) = env.get(SETTINGS_PATH_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut paths = vec![
        PathBuf::from("cortex-search.yml"),
        PathBuf::from("config/cortex-search.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("cortex-search-action/settings.yml"));
    }

    paths.into_iter().find(|p| p.exists())
}
