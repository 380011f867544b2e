use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{NavError, NavResult};

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub resolver: ResolverConfig,
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Session-store key holding the decimal sequence counter.
    pub counter_key: String,
    /// History-state field that carries an entry's sequence number.
    pub state_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            counter_key: "__pageNumbers".to_string(),
            state_key: "pageNumber".to_string(),
        }
    }
}

/// What a directory does when a terminal page is reached with path left over.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeftoverPolicy {
    /// Fail the resolution with `PageNotFound`.
    #[default]
    Reject,
    /// Load the terminal page and drop the remaining segments.
    Ignore,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ResolverConfig {
    pub leftover_segments: LeftoverPolicy,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DispatchConfig {
    pub queue_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { queue_capacity: 64 }
    }
}

impl Config {
    pub fn load() -> NavResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> NavResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(NavError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            NavError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        toml::from_str::<Self>(&raw)
            .map(Self::sanitized)
            .map_err(|source| {
                NavError::invalid_argument(format!(
                    "failed to parse config {}: {source}",
                    path.display()
                ))
            })
    }

    pub fn from_toml_str(raw: &str) -> NavResult<Self> {
        toml::from_str::<Self>(raw)
            .map(Self::sanitized)
            .map_err(|source| NavError::invalid_argument(format!("failed to parse config: {source}")))
    }

    fn sanitized(mut self) -> Self {
        let defaults = SessionConfig::default();
        if self.session.counter_key.trim().is_empty() {
            self.session.counter_key = defaults.counter_key;
        }
        if self.session.state_key.trim().is_empty() {
            self.session.state_key = defaults.state_key;
        }
        self.dispatch.queue_capacity = self.dispatch.queue_capacity.max(1);
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("SPANAV_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("spanav").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("spanav")
                .join("config.toml"),
        );
    }
    None
}
