use crate::core::interval::{GenomicInterval, Located};
use crate::pipeline::PipelineError;

/// Minimal interval covering every record in a group.
///
/// This is the region requested from the reference source for a reference-shard
/// group, so each read's bases can be cut from one fetch.
///
/// # Errors
///
/// Returns `PipelineError::EmptyGroup` for an empty group, or
/// `PipelineError::Interval` if the records sit on more than one contig.
pub fn bounding_span<T: Located>(records: &[T]) -> Result<GenomicInterval, PipelineError> {
    let (first, rest) = records.split_first().ok_or(PipelineError::EmptyGroup)?;

    rest.iter().try_fold(first.interval().clone(), |span, record| {
        span.span_with(record.interval()).map_err(PipelineError::from)
    })
}
