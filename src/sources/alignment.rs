//! Read footprints from SAM/BAM files using noodles.
//!
//! Only the reference span of each mapped record is kept. Unmapped records and
//! records without a reference position are skipped.

use std::io::{self, BufReader};
use std::path::Path;

use noodles::sam;
use noodles::sam::alignment::RecordBuf;
use tracing::{debug, warn};

use crate::core::interval::GenomicInterval;
use crate::core::read::ReadRecord;
use crate::core::types::ReadId;
use crate::sources::SourceError;

/// Check if the path looks like a SAM or BAM file
pub fn is_alignment_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .as_deref(),
        Some("sam" | "bam")
    )
}

/// Read the mapped records of a SAM or BAM file as read footprints.
///
/// Ids are assigned in file order starting at 0.
///
/// # Errors
///
/// Returns `SourceError::Io` if the file cannot be opened, `SourceError::Noodles`
/// if decoding fails, or `SourceError::UnsupportedFormat` for other extensions.
pub fn read_alignment_file(path: &Path) -> Result<Vec<ReadRecord>, SourceError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("sam") => read_sam_file(path),
        Some("bam") => read_bam_file(path),
        Some(ext) => Err(SourceError::UnsupportedFormat(ext.to_string())),
        None => Err(SourceError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Read a SAM file (text format)
fn read_sam_file(path: &Path) -> Result<Vec<ReadRecord>, SourceError> {
    let mut reader = std::fs::File::open(path)
        .map(BufReader::new)
        .map(sam::io::Reader::new)?;

    let header = reader
        .read_header()
        .map_err(|e| SourceError::Noodles(e.to_string()))?;

    records_to_reads(&header, reader.record_bufs(&header))
}

/// Read a BAM file (binary format)
fn read_bam_file(path: &Path) -> Result<Vec<ReadRecord>, SourceError> {
    use noodles::bam;

    let mut reader = std::fs::File::open(path).map(bam::io::Reader::new)?;

    let header = reader
        .read_header()
        .map_err(|e| SourceError::Noodles(e.to_string()))?;

    records_to_reads(&header, reader.record_bufs(&header))
}

fn records_to_reads<I>(header: &sam::Header, records: I) -> Result<Vec<ReadRecord>, SourceError>
where
    I: Iterator<Item = io::Result<RecordBuf>>,
{
    let contig_names: Vec<String> = header
        .reference_sequences()
        .keys()
        .map(ToString::to_string)
        .collect();

    let mut reads = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in records.enumerate() {
        let record_num = i + 1;
        let record = result.map_err(|e| {
            SourceError::Noodles(format!("Failed to read record {record_num}: {e}"))
        })?;

        if record.flags().is_unmapped() {
            skipped += 1;
            continue;
        }

        let (Some(contig_id), Some(start), Some(end)) = (
            record.reference_sequence_id(),
            record.alignment_start(),
            record.alignment_end(),
        ) else {
            skipped += 1;
            continue;
        };

        let contig = contig_names.get(contig_id).ok_or_else(|| {
            SourceError::InvalidFormat(format!(
                "Record {record_num} refers to reference sequence {contig_id}, which is not in the header"
            ))
        })?;

        let name = record
            .name()
            .map_or_else(|| "*".to_string(), ToString::to_string);

        let interval = GenomicInterval::new(contig.clone(), usize::from(start) as u64, usize::from(end) as u64)
            .map_err(|source| SourceError::Interval {
                line: record_num,
                source,
            })?;

        reads.push(ReadRecord::new(ReadId(reads.len() as u64), name, interval));
    }

    if skipped > 0 {
        warn!(skipped, "Skipped unmapped or unplaced alignment records");
    }
    debug!(reads = reads.len(), "Loaded alignment records");

    Ok(reads)
}
