use std::collections::HashSet;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::read::ReadRecord;
use crate::core::shard::{ReferenceShard, VariantShard};
use crate::core::variant::Variant;
use crate::pipeline::assemble::{ContextAccumulator, ReadContexts};
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::grouper::{emitted_count, group_by_shard, ShardGroups};
use crate::pipeline::join::{join_reference_bases, join_variants};
use crate::pipeline::span::bounding_span;
use crate::pipeline::PipelineError;
use crate::sources::reference::ReferenceSource;

/// Counters describing one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub reads: usize,
    pub variants: usize,
    /// Reference-shard groups, one reference fetch each
    pub reference_groups: usize,
    pub bases_fetched: u64,
    /// Variant shards holding at least one read and one variant
    pub variant_shards: usize,
    /// Read entries emitted under variant-shard keys (spanning reads count once per shard)
    pub read_shard_entries: usize,
    /// (read, variant) pairs before deduplication
    pub variant_pairs: usize,
}

impl RunStats {
    fn combined(self, other: Self) -> Self {
        Self {
            reads: self.reads + other.reads,
            variants: self.variants + other.variants,
            reference_groups: self.reference_groups + other.reference_groups,
            bases_fetched: self.bases_fetched + other.bases_fetched,
            variant_shards: self.variant_shards + other.variant_shards,
            read_shard_entries: self.read_shard_entries + other.read_shard_entries,
            variant_pairs: self.variant_pairs + other.variant_pairs,
        }
    }
}

/// Result of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub contexts: ReadContexts,
    pub stats: RunStats,
}

/// Drives the sharded join over a reference source
pub struct ReadContextPipeline<'a, S: ReferenceSource + ?Sized> {
    source: &'a S,
    config: PipelineConfig,
}

impl<'a, S: ReferenceSource + ?Sized> ReadContextPipeline<'a, S> {
    pub fn new(source: &'a S, config: PipelineConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build the context of every read.
    ///
    /// Either every read gets a context or the run fails; no partial mapping is
    /// returned. Running twice on the same input yields equal output.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::DuplicateReadId` / `DuplicateVariantId` for
    /// repeated identities, `PipelineError::Fetch` when the reference source
    /// cannot serve a group's span, `PipelineError::Shard` for out-of-range
    /// shard numbers, and `PipelineError::Context` if a read ends up without
    /// reference bases.
    pub fn run(
        &self,
        reads: &[ReadRecord],
        variants: &[Variant],
    ) -> Result<PipelineOutput, PipelineError> {
        check_unique_ids(reads, variants)?;

        match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| self.execute(reads, variants))
            }
            None => self.execute(reads, variants),
        }
    }

    fn execute(
        &self,
        reads: &[ReadRecord],
        variants: &[Variant],
    ) -> Result<PipelineOutput, PipelineError> {
        info!(
            reads = reads.len(),
            variants = variants.len(),
            shard_width = self.config.shard_width.get(),
            "Starting shard join"
        );

        let (reference_acc, reference_stats) = self.reference_path(reads)?;
        let (variant_acc, variant_stats) = self.variant_path(reads, variants)?;

        let contexts = reference_acc.merge(variant_acc)?.finish(reads)?;

        let stats = RunStats {
            reads: reads.len(),
            variants: variants.len(),
            ..RunStats::default()
        }
        .combined(reference_stats)
        .combined(variant_stats);

        info!(
            contexts = contexts.len(),
            reference_groups = stats.reference_groups,
            bases_fetched = stats.bases_fetched,
            variant_pairs = stats.variant_pairs,
            "Shard join complete"
        );

        Ok(PipelineOutput { contexts, stats })
    }

    /// Group by reference shard, fetch each group's bounding span once, and
    /// cut every read's own bases out of it.
    fn reference_path(
        &self,
        reads: &[ReadRecord],
    ) -> Result<(ContextAccumulator, RunStats), PipelineError> {
        let groups: ShardGroups<ReferenceShard, ReadRecord> =
            group_by_shard(reads, self.config.shard_width)?;
        debug!(groups = groups.len(), "Grouped reads by reference shard");

        groups
            .par_iter()
            .map(|(shard, group)| -> Result<_, PipelineError> {
                let span = bounding_span(group)?;
                debug!(%shard, %span, reads = group.len(), "Fetching reference span");

                let bases = self
                    .source
                    .fetch(&span)
                    .map_err(|source| PipelineError::Fetch {
                        shard: shard.to_string(),
                        span: span.to_string(),
                        source,
                    })?;

                let mut acc = ContextAccumulator::new();
                for (read, read_bases) in join_reference_bases(group, &bases)? {
                    acc.add_reference(read.id, read_bases)?;
                }

                let stats = RunStats {
                    reference_groups: 1,
                    bases_fetched: span.len(),
                    ..RunStats::default()
                };
                Ok((acc, stats))
            })
            .try_reduce(
                || (ContextAccumulator::new(), RunStats::default()),
                |(a, a_stats), (b, b_stats)| Ok((a.merge(b)?, a_stats.combined(b_stats))),
            )
    }

    /// Group reads and variants by variant shard and overlap-join each shard
    /// present on both sides.
    fn variant_path(
        &self,
        reads: &[ReadRecord],
        variants: &[Variant],
    ) -> Result<(ContextAccumulator, RunStats), PipelineError> {
        let read_groups: ShardGroups<VariantShard, ReadRecord> =
            group_by_shard(reads, self.config.shard_width)?;
        let variant_groups: ShardGroups<VariantShard, Variant> =
            group_by_shard(variants, self.config.shard_width)?;
        debug!(
            read_shards = read_groups.len(),
            variant_shards = variant_groups.len(),
            read_entries = emitted_count(&read_groups),
            variant_entries = emitted_count(&variant_groups),
            "Grouped reads and variants by variant shard"
        );

        let read_shard_entries = emitted_count(&read_groups);

        let (acc, stats) = read_groups
            .par_iter()
            .filter_map(|(shard, group)| {
                variant_groups
                    .get(shard)
                    .map(|shard_variants| (shard, group, shard_variants))
            })
            .map(|(shard, group, shard_variants)| -> Result<_, PipelineError> {
                let pairs = join_variants(group, shard_variants);
                debug!(%shard, pairs = pairs.len(), "Joined variant shard");

                let stats = RunStats {
                    variant_shards: 1,
                    variant_pairs: pairs.len(),
                    ..RunStats::default()
                };

                let mut acc = ContextAccumulator::new();
                for (read, variant) in pairs {
                    acc.add_variant(read.id, variant)?;
                }
                Ok((acc, stats))
            })
            .try_reduce(
                || (ContextAccumulator::new(), RunStats::default()),
                |(a, a_stats), (b, b_stats)| Ok((a.merge(b)?, a_stats.combined(b_stats))),
            )?;

        Ok((
            acc,
            RunStats {
                read_shard_entries,
                ..stats
            },
        ))
    }
}

fn check_unique_ids(reads: &[ReadRecord], variants: &[Variant]) -> Result<(), PipelineError> {
    let mut seen = HashSet::with_capacity(reads.len());
    for read in reads {
        if !seen.insert(read.id) {
            return Err(PipelineError::DuplicateReadId(read.id));
        }
    }

    let mut seen = HashSet::with_capacity(variants.len());
    for variant in variants {
        if !seen.insert(variant.id) {
            return Err(PipelineError::DuplicateVariantId(variant.id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interval::GenomicInterval;
    use crate::core::shard::ShardWidth;
    use crate::core::types::{ReadId, VariantId, VariantKind};
    use crate::sources::reference::SyntheticReference;

    fn read(id: u64, contig: &str, start: u64, length: u64) -> ReadRecord {
        ReadRecord::new(
            ReadId(id),
            id.to_string(),
            GenomicInterval::from_start_length(contig, start, length).unwrap(),
        )
    }

    fn variant(id: u64, contig: &str, start: u64, end: u64) -> Variant {
        Variant::new(
            VariantId(id),
            GenomicInterval::new(contig, start, end).unwrap(),
            VariantKind::Snp,
        )
    }

    fn reference() -> SyntheticReference {
        SyntheticReference::new([("1", 5_000_000), ("2", 5_000_000)])
    }

    #[test]
    fn test_run_counts_fetches_per_group() {
        let source = reference();
        let pipeline = ReadContextPipeline::new(&source, PipelineConfig::default());
        let reads = vec![read(1, "1", 100, 50), read(2, "1", 140, 100)];

        let output = pipeline.run(&reads, &[]).unwrap();

        assert_eq!(output.stats.reference_groups, 1);
        assert_eq!(output.stats.bases_fetched, 140); // 1:100-239
        assert_eq!(output.contexts.len(), 2);
        assert_eq!(
            output.contexts[&ReadId(2)].reference_bases().bases(),
            source
                .fetch(&GenomicInterval::new("1", 140, 239).unwrap())
                .unwrap()
                .bases()
        );
    }

    #[test]
    fn test_run_spanning_variant_once() {
        let source = reference();
        let pipeline = ReadContextPipeline::new(&source, PipelineConfig::default());
        let reads = vec![read(4, "1", 2_999_999, 10)];
        let variants = vec![variant(1004, "1", 2_999_998, 3_000_002)];

        let output = pipeline.run(&reads, &variants).unwrap();

        assert_eq!(output.stats.variant_shards, 2);
        assert_eq!(output.stats.variant_pairs, 2);
        assert_eq!(output.contexts[&ReadId(4)].variant_count(), 1);
    }

    #[test]
    fn test_run_rejects_duplicate_ids() {
        let source = reference();
        let pipeline = ReadContextPipeline::new(&source, PipelineConfig::default());

        let reads = vec![read(1, "1", 100, 50), read(1, "1", 500, 50)];
        assert!(matches!(
            pipeline.run(&reads, &[]),
            Err(PipelineError::DuplicateReadId(ReadId(1)))
        ));

        let reads = vec![read(1, "1", 100, 50)];
        let variants = vec![variant(9, "1", 120, 120), variant(9, "1", 130, 130)];
        assert!(matches!(
            pipeline.run(&reads, &variants),
            Err(PipelineError::DuplicateVariantId(VariantId(9)))
        ));
    }

    #[test]
    fn test_run_fetch_failure_is_fatal() {
        let source = SyntheticReference::new([("1", 1_000)]);
        let pipeline = ReadContextPipeline::new(&source, PipelineConfig::default());
        let reads = vec![read(1, "1", 990, 20)];

        assert!(matches!(
            pipeline.run(&reads, &[]),
            Err(PipelineError::Fetch { .. })
        ));
    }

    #[test]
    fn test_run_with_dedicated_pool_and_small_shards() {
        let source = reference();
        let config = PipelineConfig::default()
            .with_shard_width(ShardWidth::new(10).unwrap())
            .with_threads(Some(2))
            .unwrap();
        let pipeline = ReadContextPipeline::new(&source, config);

        // Spans 11 shards of width 10
        let reads = vec![read(1, "1", 100, 101)];
        let variants = vec![variant(1, "1", 105, 195), variant(2, "1", 150, 150)];

        let output = pipeline.run(&reads, &variants).unwrap();

        let context = &output.contexts[&ReadId(1)];
        assert_eq!(context.variant_count(), 2);
        assert_eq!(output.stats.read_shard_entries, 11);
        assert!(output.stats.variant_pairs > 2);
    }

    #[test]
    fn test_run_empty_input() {
        let source = reference();
        let pipeline = ReadContextPipeline::new(&source, PipelineConfig::default());
        let output = pipeline.run(&[], &[variant(1, "1", 5, 5)]).unwrap();
        assert!(output.contexts.is_empty());
        assert_eq!(output.stats.variants, 1);
    }
}
