//! Error taxonomy shared by the allocator, handles and dense maps.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    /// Read past the addressable size of a `DenseMap`.
    #[error("slot {slot} is out of range for a map of size {size}")]
    OutOfRange { slot: usize, size: usize },

    /// The slot is addressable but nothing was stored there.
    #[error("slot {slot} holds no value")]
    Vacant { slot: usize },

    #[error("key handle has no slot assigned")]
    Unassigned,

    /// `release` on a hash that has no outstanding reference.
    #[error("hash {hash:#018x} released without an outstanding reference")]
    DoubleRelease { hash: u64 },

    /// The handle's slot is no longer owned by its hash.
    #[error("slot {slot} is not owned by hash {hash:#018x}")]
    Stale { slot: usize, hash: u64 },

    #[error("expand ratio must be finite and non-negative, got {0}")]
    InvalidExpandRatio(f64),
}

pub type Result<T> = std::result::Result<T, SlotError>;
