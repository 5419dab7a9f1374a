//! Per-context configuration.

use crate::error::{Result, SlotError};

/// Growth factor applied by `DenseMap` when a write lands past its size.
pub const DEFAULT_EXPAND_RATIO: f64 = 0.2;

/// What `release` does with a hash that has no outstanding reference.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReleasePolicy {
    /// Return `SlotError::DoubleRelease`.
    #[default]
    Strict,
    /// Log and return `Release::Ignored`.
    Permissive,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SlotConfig {
    /// Default expand ratio for maps built against the context.
    pub expand_ratio: f64,
    pub release_policy: ReleasePolicy,
    /// When set, `DenseMap` rejects handles whose slot is no longer owned
    /// by their hash.
    pub check_liveness: bool,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            expand_ratio: DEFAULT_EXPAND_RATIO,
            release_policy: ReleasePolicy::Strict,
            check_liveness: false,
        }
    }
}

impl SlotConfig {
    pub fn expand_ratio(mut self, ratio: f64) -> Self {
        self.expand_ratio = ratio;
        self
    }

    pub fn release_policy(mut self, policy: ReleasePolicy) -> Self {
        self.release_policy = policy;
        self
    }

    pub fn check_liveness(mut self, on: bool) -> Self {
        self.check_liveness = on;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_expand_ratio(self.expand_ratio)
    }
}

pub(crate) fn validate_expand_ratio(ratio: f64) -> Result<()> {
    if ratio.is_finite() && ratio >= 0.0 {
        Ok(())
    } else {
        Err(SlotError::InvalidExpandRatio(ratio))
    }
}
