use std::collections::{BTreeMap, HashMap};

use crate::core::context::{PartialContext, ReadContextData};
use crate::core::read::ReadRecord;
use crate::core::reference::ReferenceBases;
use crate::core::types::ReadId;
use crate::core::variant::Variant;
use crate::pipeline::PipelineError;

/// Final join result: one context per read, ordered by read id
pub type ReadContexts = BTreeMap<ReadId, ReadContextData>;

/// Per-read partial contexts collected from any subset of shards.
///
/// Accumulators built on different workers merge with [`ContextAccumulator::merge`];
/// the merge is a per-read [`PartialContext::combine`], so the order in which
/// shards finish does not affect the result. A variant matched to the same read
/// in two shards is stored once.
#[derive(Debug, Default, Clone)]
pub struct ContextAccumulator {
    partials: HashMap<ReadId, PartialContext>,
}

impl ContextAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, read: ReadId, partial: PartialContext) -> Result<(), PipelineError> {
        let merged = match self.partials.remove(&read) {
            Some(existing) => existing
                .combine(partial)
                .map_err(|source| PipelineError::Context { read, source })?,
            None => partial,
        };
        self.partials.insert(read, merged);
        Ok(())
    }

    /// Record the reference bases joined to a read.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Context` if the read already holds different bases.
    pub fn add_reference(&mut self, read: ReadId, bases: ReferenceBases) -> Result<(), PipelineError> {
        self.add(read, PartialContext::from_reference(bases))
    }

    /// Record a variant joined to a read.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Context` if the variant id is already held with different contents.
    pub fn add_variant(&mut self, read: ReadId, variant: Variant) -> Result<(), PipelineError> {
        self.add(read, PartialContext::from_variant(variant))
    }

    /// Merge two accumulators.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Context` when partials for the same read conflict.
    pub fn merge(self, other: Self) -> Result<Self, PipelineError> {
        let (mut larger, smaller) = if self.partials.len() >= other.partials.len() {
            (self, other)
        } else {
            (other, self)
        };

        for (read, partial) in smaller.partials {
            larger.add(read, partial)?;
        }

        Ok(larger)
    }

    /// Number of reads with at least one partial result
    #[must_use]
    pub fn len(&self) -> usize {
        self.partials.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }

    /// Close every read's partial into its full context.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Context` with `MissingReferenceBases` for any
    /// read in `reads` that was never joined to reference bases.
    pub fn finish(mut self, reads: &[ReadRecord]) -> Result<ReadContexts, PipelineError> {
        let mut contexts = BTreeMap::new();

        for read in reads {
            let partial = self.partials.remove(&read.id).unwrap_or_default();
            let context = partial.finish().map_err(|source| PipelineError::Context {
                read: read.id,
                source,
            })?;
            contexts.insert(read.id, context);
        }

        Ok(contexts)
    }
}

/// Assemble contexts from joined pairs in one pass.
///
/// # Errors
///
/// See [`ContextAccumulator::add_reference`], [`ContextAccumulator::add_variant`]
/// and [`ContextAccumulator::finish`].
pub fn assemble_contexts(
    reads: &[ReadRecord],
    reference_pairs: impl IntoIterator<Item = (ReadRecord, ReferenceBases)>,
    variant_pairs: impl IntoIterator<Item = (ReadRecord, Variant)>,
) -> Result<ReadContexts, PipelineError> {
    let mut accumulator = ContextAccumulator::new();

    for (read, bases) in reference_pairs {
        accumulator.add_reference(read.id, bases)?;
    }
    for (read, variant) in variant_pairs {
        accumulator.add_variant(read.id, variant)?;
    }

    accumulator.finish(reads)
}
