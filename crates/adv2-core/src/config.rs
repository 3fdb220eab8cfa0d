use std::fmt;

use serde::{Deserialize, Serialize};

/// What to do with the CRC-32 carried by index entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecksumPolicy {
    /// Recompute and compare; a mismatch fails that frame only.
    #[default]
    Verify,
    /// Skip verification.
    Ignore,
}

impl fmt::Display for ChecksumPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumPolicy::Verify => write!(f, "Verify"),
            ChecksumPolicy::Ignore => write!(f, "Ignore"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub checksum_policy: ChecksumPolicy,
    /// Unpack rows in parallel for large frames.
    pub parallel_unpack: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            checksum_policy: ChecksumPolicy::Verify,
            parallel_unpack: true,
        }
    }
}
