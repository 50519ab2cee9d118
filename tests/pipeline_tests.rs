//! End-to-end shard join over a small fixed data set.
//!
//! Five reads and five variants on two contigs, with a shard width of 100000:
//!
//! | Read | Interval | Reference shard | Expected variants |
//! |------|----------|-----------------|-------------------|
//! | 1 | 1:100-149 | 1#0 | none |
//! | 2 | 1:140-239 | 1#0 | 1001, 1002 |
//! | 3 | 1:1000000-1000009 | 1#10 | 1003 |
//! | 4 | 1:2999999-3000008 | 1#29 | 1004 (matched in 1#29 and 1#30) |
//! | 5 | 2:1000000-1000009 | 2#10 | 1005 |

use read_context::core::shard::{ReferenceShard, VariantShard};
use read_context::pipeline::grouper::group_by_shard;
use read_context::pipeline::span::bounding_span;
use read_context::pipeline::PipelineError;
use read_context::sources::reference::{InMemoryReference, ReferenceSource, SyntheticReference};
use read_context::{
    GenomicInterval, Located, PipelineConfig, ReadContextPipeline, ReadId, ReadRecord, ShardWidth,
    Variant, VariantId, VariantKind,
};

fn interval(contig: &str, start: u64, end: u64) -> GenomicInterval {
    GenomicInterval::new(contig, start, end).unwrap()
}

fn fixture_reads() -> Vec<ReadRecord> {
    [
        (1, "1", 100, 50),
        (2, "1", 140, 100),
        (3, "1", 1_000_000, 10),
        (4, "1", 2_999_999, 10),
        (5, "2", 1_000_000, 10),
    ]
    .into_iter()
    .map(|(id, contig, start, length)| {
        ReadRecord::new(
            ReadId(id),
            format!("read{id}"),
            GenomicInterval::from_start_length(contig, start, length).unwrap(),
        )
    })
    .collect()
}

fn fixture_variants() -> Vec<Variant> {
    vec![
        Variant::new(VariantId(1001), interval("1", 170, 180), VariantKind::Snp),
        Variant::new(VariantId(1002), interval("1", 210, 220), VariantKind::Indel),
        Variant::new(VariantId(1003), interval("1", 1_000_000, 1_000_000), VariantKind::Snp),
        Variant::new(VariantId(1004), interval("1", 2_999_998, 3_000_002), VariantKind::Indel),
        Variant::new(VariantId(1005), interval("2", 1_000_000, 1_000_000), VariantKind::Indel),
    ]
}

fn fixture_reference() -> SyntheticReference {
    SyntheticReference::new([("1", 3_100_000), ("2", 1_100_000)])
}

/// Every read gets exactly the expected variant set
#[test]
fn test_fixture_contexts() {
    let reference = fixture_reference();
    let pipeline = ReadContextPipeline::new(&reference, PipelineConfig::default());
    let output = pipeline.run(&fixture_reads(), &fixture_variants()).unwrap();

    assert_eq!(output.contexts.len(), 5);

    let expected: [(u64, &[u64]); 5] = [
        (1, &[]),
        (2, &[1001, 1002]),
        (3, &[1003]),
        (4, &[1004]),
        (5, &[1005]),
    ];
    for (read, variants) in expected {
        let context = &output.contexts[&ReadId(read)];
        let ids: Vec<u64> = context.variant_ids().map(|id| id.0).collect();
        assert_eq!(ids, variants, "variants of read {read}");
    }
}

/// Each read's bases are its own interval, not its group's span
#[test]
fn test_fixture_reference_bases() {
    let reference = fixture_reference();
    let pipeline = ReadContextPipeline::new(&reference, PipelineConfig::default());
    let reads = fixture_reads();
    let output = pipeline.run(&reads, &fixture_variants()).unwrap();

    for read in &reads {
        let bases = output.contexts[&read.id].reference_bases();
        assert_eq!(bases.interval(), &read.interval);
        assert_eq!(bases.bases().len() as u64, read.interval.len());
        assert_eq!(bases, &reference.fetch(&read.interval).unwrap());
    }
}

/// Reads 1 and 2 share one fetch of 1:100-239
#[test]
fn test_fixture_reference_grouping() {
    let reads = fixture_reads();
    let groups = group_by_shard::<ReferenceShard, _>(&reads, ShardWidth::default()).unwrap();

    let keys: Vec<String> = groups.keys().map(ToString::to_string).collect();
    assert_eq!(keys, vec!["1#0", "1#10", "1#29", "2#10"]);

    let first = &groups[&ReferenceShard::new(0, "1")];
    assert_eq!(first.len(), 2);
    assert_eq!(bounding_span(first).unwrap(), interval("1", 100, 239));

    let reference = fixture_reference();
    let pipeline = ReadContextPipeline::new(&reference, PipelineConfig::default());
    let output = pipeline.run(&reads, &fixture_variants()).unwrap();
    assert_eq!(output.stats.reference_groups, 4);
    assert_eq!(output.stats.bases_fetched, 140 + 10 + 10 + 10);
}

/// Read 4 is emitted under two variant shards but one reference shard
#[test]
fn test_fixture_asymmetric_keys() {
    let reads = fixture_reads();
    let width = ShardWidth::default();

    let variant_groups = group_by_shard::<VariantShard, _>(&reads, width).unwrap();
    assert!(variant_groups[&VariantShard::new(29, "1")]
        .iter()
        .any(|r| r.id == ReadId(4)));
    assert!(variant_groups[&VariantShard::new(30, "1")]
        .iter()
        .any(|r| r.id == ReadId(4)));

    let reference_groups = group_by_shard::<ReferenceShard, _>(&reads, width).unwrap();
    assert!(!reference_groups.contains_key(&ReferenceShard::new(30, "1")));

    let reference = fixture_reference();
    let pipeline = ReadContextPipeline::new(&reference, PipelineConfig::default());
    let output = pipeline.run(&reads, &fixture_variants()).unwrap();
    // r2 x2, r3, r4 in shards 29 and 30, r5
    assert_eq!(output.stats.variant_pairs, 6);
    assert_eq!(output.stats.variant_shards, 5);
    assert_eq!(output.stats.read_shard_entries, 6);
}

/// Shard width, thread count and input order do not change the result
#[test]
fn test_result_is_stable() {
    let reference = fixture_reference();
    let reads = fixture_reads();
    let variants = fixture_variants();

    let baseline = ReadContextPipeline::new(&reference, PipelineConfig::default())
        .run(&reads, &variants)
        .unwrap();

    let again = ReadContextPipeline::new(&reference, PipelineConfig::default())
        .run(&reads, &variants)
        .unwrap();
    assert_eq!(baseline.contexts, again.contexts);

    let mut reversed_reads = reads.clone();
    reversed_reads.reverse();
    let mut reversed_variants = variants.clone();
    reversed_variants.reverse();

    for width in [7, 1_000, 250_000] {
        let config = PipelineConfig::default()
            .with_shard_width(ShardWidth::new(width).unwrap())
            .with_threads(Some(3))
            .unwrap();
        let output = ReadContextPipeline::new(&reference, config)
            .run(&reversed_reads, &reversed_variants)
            .unwrap();
        assert_eq!(output.contexts, baseline.contexts, "shard width {width}");
    }
}

/// An in-memory reference behaves like the synthetic one
#[test]
fn test_in_memory_reference() {
    let reference = InMemoryReference::new().with_contig("chrM", b"GATCACAGGTCTATCACCCT".to_vec());
    let reads = vec![
        ReadRecord::new(ReadId(0), "a", interval("chrM", 1, 4)),
        ReadRecord::new(ReadId(1), "b", interval("chrM", 3, 10)),
    ];
    let variants = vec![Variant::new(VariantId(0), interval("chrM", 4, 4), VariantKind::Snp)];

    let output = ReadContextPipeline::new(&reference, PipelineConfig::default())
        .run(&reads, &variants)
        .unwrap();

    assert_eq!(output.contexts[&ReadId(0)].reference_bases().bases(), b"GATC");
    assert_eq!(output.contexts[&ReadId(1)].reference_bases().bases(), b"TCACAGGT");
    assert!(output.contexts[&ReadId(0)].contains_variant(VariantId(0)));
    assert!(output.contexts[&ReadId(1)].contains_variant(VariantId(0)));
}

/// A read on a contig the reference lacks fails the whole run
#[test]
fn test_unknown_contig_fails_run() {
    let reference = fixture_reference();
    let mut reads = fixture_reads();
    reads.push(ReadRecord::new(ReadId(6), "read6", interval("MT", 1, 10)));

    let result = ReadContextPipeline::new(&reference, PipelineConfig::default())
        .run(&reads, &fixture_variants());
    assert!(matches!(result, Err(PipelineError::Fetch { .. })));
}
