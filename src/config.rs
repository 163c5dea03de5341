#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Tuning for a [`VisibilityCache`](crate::VisibilityCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct CacheConfig {
    /// How many recomputes a single query may run before it stops waiting
    /// for a quiet moment between invalidations and answers from the grid it
    /// computed itself. Values below 1 are treated as 1.
    pub max_recompute_attempts: u32,
}

impl CacheConfig {
    pub const DEFAULT_MAX_RECOMPUTE_ATTEMPTS: u32 = 32;

    pub fn with_max_recompute_attempts(self, max_recompute_attempts: u32) -> Self {
        Self {
            max_recompute_attempts,
        }
    }

    pub(crate) fn attempt_limit(&self) -> u32 {
        self.max_recompute_attempts.max(1)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_recompute_attempts: Self::DEFAULT_MAX_RECOMPUTE_ATTEMPTS,
        }
    }
}
