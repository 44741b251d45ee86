//! Environment-based configuration
//!
//! The loader works over an arbitrary key lookup so it can be exercised
//! without touching the process environment.

use crate::errors::{Result, SnapshotError};
use esnap_core_types::Sensitive;
use std::collections::HashMap;
use std::env::VarError;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const ENV_URL: &str = "ES_URL";
pub const ENV_REPOSITORY: &str = "ES_SNAPSHOT_REPO";
pub const ENV_LIMIT: &str = "ES_SNAPSHOT_LIMIT";

/// Number of most recent snapshots to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RetentionLimit(u32);

impl RetentionLimit {
    pub fn new(limit: u32) -> Self {
        Self(limit)
    }

    pub fn get(&self) -> usize {
        self.0 as usize
    }

    /// Parse the textual form of the limit
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for anything that is not a non-negative
    /// integer.
    pub fn parse(raw: &str) -> Result<Self> {
        raw.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|e| SnapshotError::InvalidConfig {
                key: ENV_LIMIT.to_string(),
                reason: format!("'{}' is not a non-negative integer ({})", raw, e),
            })
    }
}

impl fmt::Display for RetentionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-operation request timeouts
///
/// Deletion and creation of large snapshots can take many minutes; the
/// read-only calls should answer quickly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub list: Duration,
    pub delete: Duration,
    pub create: Duration,
    pub status: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            list: Duration::from_secs(60),
            delete: Duration::from_secs(10 * 60),
            create: Duration::from_secs(30 * 60),
            status: Duration::from_secs(60),
        }
    }
}

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct Config {
    /// Service base URL; may embed credentials
    pub base_url: Sensitive<String>,
    pub repository: String,
    pub retention: RetentionLimit,
    pub timeouts: Timeouts,
}

impl Config {
    /// Build a config from a key lookup
    ///
    /// # Errors
    ///
    /// `MissingConfig` naming the first absent key, or `InvalidConfig`
    /// when a value is present but unusable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).ok_or_else(|| SnapshotError::MissingConfig {
                key: key.to_string(),
            })
        };

        let base_url = require(ENV_URL)?;
        let repository = require(ENV_REPOSITORY)?;
        let limit = require(ENV_LIMIT)?;

        validate_base_url(&base_url)?;
        if repository.trim().is_empty() {
            return Err(SnapshotError::InvalidConfig {
                key: ENV_REPOSITORY.to_string(),
                reason: "repository name is empty".to_string(),
            });
        }

        Ok(Self {
            base_url: Sensitive::new(base_url.trim_end_matches('/').to_string()),
            repository: repository.trim().to_string(),
            retention: RetentionLimit::parse(&limit)?,
            timeouts: Timeouts::default(),
        })
    }

    /// Build a config from the process environment
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`]. A variable that is set but not valid
    /// UTF-8 is `InvalidConfig`, not `MissingConfig`.
    pub fn from_env() -> Result<Self> {
        let mut values = HashMap::new();
        for key in [ENV_URL, ENV_REPOSITORY, ENV_LIMIT] {
            if let Some(value) = env_value(key, std::env::var(key))? {
                values.insert(key, value);
            }
        }
        Self::from_lookup(|key| values.get(key).cloned())
    }
}

fn env_value(key: &str, value: std::result::Result<String, VarError>) -> Result<Option<String>> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(SnapshotError::InvalidConfig {
            key: key.to_string(),
            reason: "value is not valid UTF-8".to_string(),
        }),
    }
}

fn validate_base_url(raw: &str) -> Result<()> {
    let invalid = |reason: String| SnapshotError::InvalidConfig {
        key: ENV_URL.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(format!("not a valid URL ({})", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "unsupported scheme '{}', expected http or https",
            url.scheme()
        )));
    }
    if url.host().is_none() {
        return Err(invalid("URL has no host".to_string()));
    }
    Ok(())
}
