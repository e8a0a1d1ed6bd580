//! Password hashing configuration.

use serde::{Deserialize, Serialize};

/// Credential guard configuration (Argon2id cost parameters).
///
/// The defaults match the `argon2` crate's recommended parameters; raise
/// `memory_kib` and `iterations` together when tuning for stronger
/// protection on capable hardware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Argon2 iteration count (time cost).
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Argon2 lane count (parallelism).
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_memory_kib() -> u32 {
    19_456
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}
