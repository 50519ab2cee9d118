//! Shard keys for partitioning genomic coordinate space.
//!
//! Coordinates are bucketed into fixed-width shards, `shard = floor(position / width)`,
//! and two keying policies are layered on top:
//!
//! | Key | Keys per interval | Used for |
//! |-----|-------------------|----------|
//! | [`ReferenceShard`] | one, the shard holding `start` | batching reads for one reference fetch |
//! | [`VariantShard`] | one per overlapped shard | pairing reads with variants |
//!
//! The asymmetry is intentional. A read's reference bases are cut from a fetch
//! that spans the whole group, so a read only needs to land in one group. Reads
//! and variants, on the other hand, must meet in at least one common shard to be
//! compared, so anything crossing a boundary is emitted into every shard it
//! touches and the duplicates are removed when contexts are assembled.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::interval::GenomicInterval;

/// Default number of bases per shard
pub const DEFAULT_SHARD_WIDTH: u64 = 100_000;

/// Most variant shards a single interval may be keyed into
pub const MAX_SHARDS_PER_INTERVAL: u64 = 100_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShardError {
    #[error("Shard width must be a positive number of bases")]
    ZeroWidth,

    #[error("Shard number for position {position} with width {width} exceeds {max}")]
    ShardNumberOverflow { position: u64, width: u64, max: u32 },

    #[error("Interval {interval} spans {count} shards of width {width}, more than {max}")]
    TooManyShards {
        interval: String,
        count: u64,
        width: u64,
        max: u64,
    },
}

/// Number of bases covered by one shard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ShardWidth(NonZeroU64);

impl ShardWidth {
    /// # Errors
    ///
    /// Returns `ShardError::ZeroWidth` if `bases` is zero.
    pub fn new(bases: u64) -> Result<Self, ShardError> {
        NonZeroU64::new(bases).map(Self).ok_or(ShardError::ZeroWidth)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// Shard number holding `position`.
    ///
    /// # Errors
    ///
    /// Returns `ShardError::ShardNumberOverflow` if the shard number does not fit in a `u32`.
    pub fn shard_of(self, position: u64) -> Result<u32, ShardError> {
        let shard = position / self.get();
        u32::try_from(shard).map_err(|_| ShardError::ShardNumberOverflow {
            position,
            width: self.get(),
            max: u32::MAX,
        })
    }
}

impl Default for ShardWidth {
    fn default() -> Self {
        Self(NonZeroU64::new(DEFAULT_SHARD_WIDTH).unwrap_or(NonZeroU64::MIN))
    }
}

impl TryFrom<u64> for ShardWidth {
    type Error = ShardError;

    fn try_from(bases: u64) -> Result<Self, Self::Error> {
        Self::new(bases)
    }
}

impl From<ShardWidth> for u64 {
    fn from(width: ShardWidth) -> Self {
        width.get()
    }
}

impl std::fmt::Display for ShardWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shard-keying policy.
///
/// Implementors are plain `(shard_number, contig)` keys; the policy lives in
/// [`ShardKey::keys_for`].
pub trait ShardKey: Clone + Eq + Ord + std::hash::Hash + Send + Sync + std::fmt::Debug {
    /// All keys an interval is emitted under.
    ///
    /// # Errors
    ///
    /// Returns `ShardError::ShardNumberOverflow` if a shard number is out of range.
    fn keys_for(interval: &GenomicInterval, width: ShardWidth) -> Result<Vec<Self>, ShardError>;

    fn shard_number(&self) -> u32;

    fn contig(&self) -> &str;
}

/// Key batching reads that share one reference-bases fetch.
///
/// Derived from the interval's start only, even when the interval runs past
/// the shard boundary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReferenceShard {
    // Field order drives the derived ordering: contig first, then shard
    contig: String,
    shard_number: u32,
}

impl ReferenceShard {
    pub fn new(shard_number: u32, contig: impl Into<String>) -> Self {
        Self {
            contig: contig.into(),
            shard_number,
        }
    }

    /// The single reference shard for an interval.
    ///
    /// # Errors
    ///
    /// Returns `ShardError::ShardNumberOverflow` if the start shard is out of range.
    pub fn for_interval(interval: &GenomicInterval, width: ShardWidth) -> Result<Self, ShardError> {
        Ok(Self::new(width.shard_of(interval.start())?, interval.contig()))
    }
}

impl ShardKey for ReferenceShard {
    fn keys_for(interval: &GenomicInterval, width: ShardWidth) -> Result<Vec<Self>, ShardError> {
        Ok(vec![Self::for_interval(interval, width)?])
    }

    fn shard_number(&self) -> u32 {
        self.shard_number
    }

    fn contig(&self) -> &str {
        &self.contig
    }
}

impl std::fmt::Display for ReferenceShard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.contig, self.shard_number)
    }
}

/// Key pairing reads with variants; one per shard an interval overlaps
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariantShard {
    contig: String,
    shard_number: u32,
}

impl VariantShard {
    pub fn new(shard_number: u32, contig: impl Into<String>) -> Self {
        Self {
            contig: contig.into(),
            shard_number,
        }
    }

    /// Every variant shard from the shard of `start` through the shard of `end`.
    ///
    /// # Errors
    ///
    /// Returns `ShardError::ShardNumberOverflow` if the end shard is out of range,
    /// and `ShardError::TooManyShards` past [`MAX_SHARDS_PER_INTERVAL`] keys.
    pub fn for_interval(
        interval: &GenomicInterval,
        width: ShardWidth,
    ) -> Result<Vec<Self>, ShardError> {
        let first = width.shard_of(interval.start())?;
        let last = width.shard_of(interval.end())?;

        let count = u64::from(last - first) + 1;
        if count > MAX_SHARDS_PER_INTERVAL {
            return Err(ShardError::TooManyShards {
                interval: interval.to_string(),
                count,
                width: width.get(),
                max: MAX_SHARDS_PER_INTERVAL,
            });
        }

        Ok((first..=last)
            .map(|shard| Self::new(shard, interval.contig()))
            .collect())
    }
}

impl ShardKey for VariantShard {
    fn keys_for(interval: &GenomicInterval, width: ShardWidth) -> Result<Vec<Self>, ShardError> {
        Self::for_interval(interval, width)
    }

    fn shard_number(&self) -> u32 {
        self.shard_number
    }

    fn contig(&self) -> &str {
        &self.contig
    }
}

impl std::fmt::Display for VariantShard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.contig, self.shard_number)
    }
}
