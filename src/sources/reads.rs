use std::path::Path;

use crate::core::interval::GenomicInterval;
use crate::core::read::ReadRecord;
use crate::core::types::ReadId;
use crate::sources::SourceError;

/// Parse a read TSV file with columns: name, contig, start, end
///
/// # Errors
///
/// Returns `SourceError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_reads_file(path: &Path) -> Result<Vec<ReadRecord>, SourceError> {
    let content = std::fs::read_to_string(path)?;
    parse_reads_text(&content)
}

/// Parse read TSV text with columns: name, contig, start, end
///
/// Blank lines and lines starting with `#` are skipped, as is a first line
/// whose first field is `name` or `read`. Ids are assigned from 0 in line order.
///
/// # Errors
///
/// Returns `SourceError::InvalidFormat` if a line has fewer than 4 fields or a
/// non-numeric position, and `SourceError::Interval` if the positions do not
/// form a valid interval.
pub fn parse_reads_text(text: &str) -> Result<Vec<ReadRecord>, SourceError> {
    let mut reads = Vec::new();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();

        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if first == "name" || first == "read" {
                continue;
            }
        }

        let line_num = i + 1;

        if fields.len() < 4 {
            return Err(SourceError::InvalidFormat(format!(
                "Line {line_num} has fewer than 4 fields"
            )));
        }

        let start = parse_position(fields[2], "start", line_num)?;
        let end = parse_position(fields[3], "end", line_num)?;
        let interval = GenomicInterval::new(fields[1], start, end)
            .map_err(|source| SourceError::Interval {
                line: line_num,
                source,
            })?;

        reads.push(ReadRecord::new(
            ReadId(reads.len() as u64),
            fields[0],
            interval,
        ));
    }

    Ok(reads)
}

fn parse_position(field: &str, what: &str, line_num: usize) -> Result<u64, SourceError> {
    field.replace(',', "").parse().map_err(|_| {
        SourceError::InvalidFormat(format!("Invalid {what} on line {line_num}: '{field}'"))
    })
}
