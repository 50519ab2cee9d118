//! Overlap joins within a single shard.
//!
//! Both inputs are already restricted to one shard key (or one bounding span),
//! so candidate sets are small. The comparison side is sorted by start and
//! binary-searched for the last candidate that can still reach a read; the
//! overlap predicate stays the only filter that decides membership.

use crate::core::interval::Located;
use crate::core::read::ReadRecord;
use crate::core::reference::ReferenceBases;
use crate::core::variant::Variant;
use crate::pipeline::PipelineError;

/// All `(l, r)` pairs whose intervals overlap, in `left` order and then by `r` start
pub fn overlap_join<'a, L, R>(left: &'a [L], right: &'a [R]) -> Vec<(&'a L, &'a R)>
where
    L: Located,
    R: Located,
{
    let mut by_start: Vec<&'a R> = right.iter().collect();
    by_start.sort_by_key(|r| r.interval().start());
    let by_start = &by_start;

    left.iter()
        .flat_map(move |l| {
            let interval = l.interval();
            let cut = by_start.partition_point(|r| r.interval().start() <= interval.end());
            by_start[..cut]
                .iter()
                .filter(move |r| interval.overlaps(r.interval()))
                .map(move |r| (l, *r))
        })
        .collect()
}

/// Pair each read with the slice of `bases` covering exactly its own interval.
///
/// `bases` is normally the fetch for the group's bounding span, so every read
/// of the group is contained in it.
///
/// # Errors
///
/// Returns `PipelineError::Reference` if an overlapping read reaches outside `bases`.
pub fn join_reference_bases(
    reads: &[ReadRecord],
    bases: &ReferenceBases,
) -> Result<Vec<(ReadRecord, ReferenceBases)>, PipelineError> {
    overlap_join(reads, std::slice::from_ref(bases))
        .into_iter()
        .map(|(read, span)| -> Result<_, PipelineError> {
            Ok((read.clone(), span.subset(read.interval())?))
        })
        .collect()
}

/// Every (read, variant) pair in one variant shard whose intervals overlap
pub fn join_variants(reads: &[ReadRecord], variants: &[Variant]) -> Vec<(ReadRecord, Variant)> {
    overlap_join(reads, variants)
        .into_iter()
        .map(|(read, variant)| (read.clone(), variant.clone()))
        .collect()
}
