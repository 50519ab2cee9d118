//! Sharded overlap join of reads against reference bases and variants.
//!
//! This module provides the join machinery:
//!
//! - [`grouper`]: group records by shard key, preserving multiplicity
//! - [`span`]: bounding span of a reference-shard group
//! - [`join`]: per-shard overlap joins
//! - [`assemble`]: per-read merge of partial results
//! - [`engine`]: [`ReadContextPipeline`], which drives all of the above
//!
//! ## Data flow
//!
//! ```text
//! reads ──► ReferenceShard groups ──► bounding span ──► ReferenceSource::fetch ──► cut per read ─┐
//!   │                                                                                          ├─► assemble ──► ReadContexts
//!   └───► VariantShard groups ◄──── variants                                                   │
//!                 └──────────────► overlap join per shard ──────────────────────────────────────┘
//! ```
//!
//! Every per-shard step is a pure function of that shard's records, and shards
//! run in parallel on a `rayon` pool. The only cross-shard step is assembly,
//! which folds per-read partials with an order-independent merge.
//!
//! ## Example
//!
//! ```rust
//! use read_context::core::interval::GenomicInterval;
//! use read_context::core::read::ReadRecord;
//! use read_context::core::types::ReadId;
//! use read_context::pipeline::{PipelineConfig, ReadContextPipeline};
//! use read_context::sources::reference::SyntheticReference;
//!
//! let reference = SyntheticReference::new([("1", 1_000_000)]);
//! let reads = vec![ReadRecord::new(
//!     ReadId(1),
//!     "r1",
//!     GenomicInterval::new("1", 100, 149).unwrap(),
//! )];
//!
//! let pipeline = ReadContextPipeline::new(&reference, PipelineConfig::default());
//! let output = pipeline.run(&reads, &[]).unwrap();
//! assert_eq!(output.contexts[&ReadId(1)].reference_bases().bases().len(), 50);
//! ```

use thiserror::Error;

use crate::core::context::ContextError;
use crate::core::interval::IntervalError;
use crate::core::reference::ReferenceError;
use crate::core::shard::ShardError;
use crate::core::types::{ReadId, VariantId};

pub mod assemble;
pub mod config;
pub mod engine;
pub mod grouper;
pub mod join;
pub mod span;

pub use assemble::ReadContexts;
pub use config::PipelineConfig;
pub use engine::{PipelineOutput, ReadContextPipeline, RunStats};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error(transparent)]
    Shard(#[from] ShardError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("Reference fetch for shard {shard} (span {span}) failed: {source}")]
    Fetch {
        shard: String,
        span: String,
        source: ReferenceError,
    },

    #[error("Cannot compute a span for an empty group")]
    EmptyGroup,

    #[error("Read id {0} appears more than once in the input")]
    DuplicateReadId(ReadId),

    #[error("Variant id {0} appears more than once in the input")]
    DuplicateVariantId(VariantId),

    #[error("Read {read}: {source}")]
    Context { read: ReadId, source: ContextError },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
