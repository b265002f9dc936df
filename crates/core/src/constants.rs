//! Constants used throughout the meshcache codebase
// Environment variable names
pub const MESHCACHE_CACHE_BYTES_VAR: &str = "MESHCACHE_CACHE_BYTES";
pub const MESHCACHE_REPLICAS_VAR: &str = "MESHCACHE_REPLICAS";
pub const MESHCACHE_LOG_VAR: &str = "MESHCACHE_LOG";

// Defaults
pub const DEFAULT_CACHE_BYTES: u64 = 64 * 1024 * 1024;
pub const DEFAULT_REPLICAS: usize = 50;
