//! Cache configuration with defaults, JSON loading, and environment overrides
use crate::constants::{
    DEFAULT_CACHE_BYTES, DEFAULT_REPLICAS, MESHCACHE_CACHE_BYTES_VAR, MESHCACHE_REPLICAS_VAR,
};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Sizing for a group's local cache and the peer ring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Byte budget of the local cache; 0 means unbounded
    pub max_bytes: u64,
    /// Virtual nodes per physical peer on the hash ring
    pub replicas: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_CACHE_BYTES,
            replicas: DEFAULT_REPLICAS,
        }
    }
}

impl CacheConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::configuration(format!("failed to parse cache config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the defaults and apply any environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override fields from `MESHCACHE_CACHE_BYTES` and `MESHCACHE_REPLICAS`
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var(MESHCACHE_CACHE_BYTES_VAR) {
            self.max_bytes = parse_env(MESHCACHE_CACHE_BYTES_VAR, &value)?;
            tracing::debug!(max_bytes = self.max_bytes, "cache bytes overridden from environment");
        }
        if let Ok(value) = std::env::var(MESHCACHE_REPLICAS_VAR) {
            self.replicas = parse_env(MESHCACHE_REPLICAS_VAR, &value)?;
            tracing::debug!(replicas = self.replicas, "ring replicas overridden from environment");
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.replicas == 0 {
            return Err(Error::configuration("replicas must be greater than 0"));
        }
        Ok(())
    }
}

/// Parse a numeric override, naming the variable and its raw value on failure
fn parse_env<T>(var: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::configuration(format!("invalid {var}={value:?}: {e}")))
}

/// Builder for creating cache configurations
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.config.max_bytes = max_bytes;
        self
    }

    pub fn replicas(mut self, replicas: usize) -> Self {
        self.config.replicas = replicas;
        self
    }

    pub fn build(self) -> Result<CacheConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
