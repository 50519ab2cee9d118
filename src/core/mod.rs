//! Core data types for the sharded read/reference/variant join.
//!
//! This module provides the value types every other layer passes around:
//!
//! - [`GenomicInterval`]: 1-based inclusive span on one contig
//! - [`ReferenceShard`], [`VariantShard`]: the two shard-keying policies
//! - [`ReadRecord`], [`Variant`], [`ReferenceBases`]: the records being joined
//! - [`ReadContextData`], [`PartialContext`]: per-read join results
//!
//! All of them are immutable once built; constructors validate, so an invalid
//! interval never reaches sharding.
//!
//! ## Coordinates
//!
//! | Convention | First base | `chr1:100-149` covers |
//! |------------|------------|-----------------------|
//! | This crate | 1          | 50 bases, 100 through 149 |
//!
//! Intervals on different contigs are never ordered against each other; asking
//! for such an ordering is an error rather than a silent `false`.
//!
//! [`GenomicInterval`]: interval::GenomicInterval
//! [`ReferenceShard`]: shard::ReferenceShard
//! [`VariantShard`]: shard::VariantShard
//! [`ReadRecord`]: read::ReadRecord
//! [`Variant`]: variant::Variant
//! [`ReferenceBases`]: reference::ReferenceBases
//! [`ReadContextData`]: context::ReadContextData
//! [`PartialContext`]: context::PartialContext

pub mod context;
pub mod interval;
pub mod read;
pub mod reference;
pub mod shard;
pub mod types;
pub mod variant;
