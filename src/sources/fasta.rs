//! Load FASTA files into an [`InMemoryReference`].
//!
//! Supported formats:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz` (gzip compressed)
//! - `.fa.bgz`, `.fasta.bgz`, `.fna.bgz` (bgzip compressed)
//!
//! Bases are uppercased on load so soft-masked sequence compares equal.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;
use tracing::debug;

use crate::sources::reference::{InMemoryReference, ReferenceSource};
use crate::sources::SourceError;

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();

    if [".fa.gz", ".fasta.gz", ".fna.gz", ".fa.bgz", ".fasta.bgz", ".fna.bgz"]
        .iter()
        .any(|suffix| path_str.ends_with(suffix))
    {
        return true;
    }

    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna")
    )
}

#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Load every sequence of a FASTA file into memory.
///
/// # Errors
///
/// Returns `SourceError::Io` if the file cannot be read, `SourceError::Noodles` if
/// a record fails to parse, or `SourceError::InvalidFormat` if the file holds no
/// sequences or repeats a name.
pub fn load_fasta_file(path: &Path) -> Result<InMemoryReference, SourceError> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        // bgzip is a series of gzip members
        let reader = BufReader::new(MultiGzDecoder::new(file));
        load_fasta_reader(&mut fasta::io::Reader::new(reader))
    } else {
        let reader = BufReader::new(file);
        load_fasta_reader(&mut fasta::io::Reader::new(reader))
    }
}

impl InMemoryReference {
    /// Build a reference from a FASTA file; see [`load_fasta_file`].
    ///
    /// # Errors
    ///
    /// Same as [`load_fasta_file`].
    pub fn from_fasta_file(path: &Path) -> Result<Self, SourceError> {
        load_fasta_file(path)
    }
}

fn load_fasta_reader<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<InMemoryReference, SourceError> {
    let mut reference = InMemoryReference::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| SourceError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        let name = String::from_utf8_lossy(record.name()).to_string();
        if reference.contig_length(&name).is_some() {
            return Err(SourceError::InvalidFormat(format!(
                "Duplicate FASTA sequence name '{name}'"
            )));
        }

        let bases = record.sequence().as_ref().to_ascii_uppercase();
        debug!(contig = %name, length = bases.len(), "Loaded reference sequence");
        reference.insert(name, bases);
    }

    if reference.is_empty() {
        return Err(SourceError::InvalidFormat(
            "No sequences found in FASTA file".to_string(),
        ));
    }

    Ok(reference)
}
