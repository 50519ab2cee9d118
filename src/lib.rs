//! # read-context
//!
//! A library for attaching reference bases and overlapping variants to aligned reads.
//!
//! Preprocessing steps such as base-quality recalibration need, for every read,
//! the reference sequence under it and the known variants it overlaps. Joining
//! millions of reads against a genome and a call set pairwise is hopeless, so
//! `read-context` partitions everything by genomic position first:
//!
//! - **Reference shards**: reads are grouped by the shard of their start, and each
//!   group costs a single reference fetch covering all of its reads
//! - **Variant shards**: reads and variants are emitted under every shard they
//!   touch, then joined shard by shard
//! - **Assembly**: per-read partial results are merged, so a variant seen in
//!   several shards is reported once
//!
//! Shards are independent and run in parallel on a `rayon` pool.
//!
//! ## Example
//!
//! ```rust
//! use read_context::{GenomicInterval, ReadContextPipeline, ReadId, ReadRecord, PipelineConfig};
//! use read_context::{Variant, VariantId, VariantKind};
//! use read_context::sources::reference::SyntheticReference;
//!
//! let reference = SyntheticReference::new([("1", 3_100_000)]);
//! let reads = vec![ReadRecord::new(
//!     ReadId(4),
//!     "r4",
//!     GenomicInterval::new("1", 2_999_999, 3_000_008).unwrap(),
//! )];
//! let variants = vec![Variant::new(
//!     VariantId(1004),
//!     GenomicInterval::new("1", 2_999_998, 3_000_002).unwrap(),
//!     VariantKind::Indel,
//! )];
//!
//! let pipeline = ReadContextPipeline::new(&reference, PipelineConfig::default());
//! let output = pipeline.run(&reads, &variants).unwrap();
//!
//! // Matched in shards 29 and 30, reported once
//! let context = &output.contexts[&ReadId(4)];
//! assert_eq!(context.variant_ids().collect::<Vec<_>>(), vec![VariantId(1004)]);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Intervals, shard keys, records and per-read context types
//! - [`pipeline`]: Grouping, span calculation, overlap joins and assembly
//! - [`sources`]: Reference sources and loaders for FASTA, reads, SAM/BAM and VCF
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod pipeline;
pub mod sources;

// Re-export commonly used types for convenience
pub use core::context::ReadContextData;
pub use core::interval::{GenomicInterval, Located};
pub use core::read::ReadRecord;
pub use core::reference::ReferenceBases;
pub use core::shard::{ReferenceShard, ShardKey, ShardWidth, VariantShard};
pub use core::types::*;
pub use core::variant::Variant;
pub use pipeline::{PipelineConfig, PipelineError, ReadContextPipeline, ReadContexts};
pub use sources::reference::{InMemoryReference, ReferenceSource, SyntheticReference};
