//! Variant footprints from VCF records.
//!
//! Records are read with the noodles VCF reader. The footprint runs from POS
//! to the record's end, which is INFO `END` when present and otherwise the
//! last base of the reference allele.
//!
//! Kinds:
//! - SNP when REF and every ALT are single bases
//! - indel when any ALT differs in length from REF
//! - other for multi-base substitutions, symbolic alleles and missing ALTs

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::vcf;
use noodles::vcf::variant::record::AlternateBases;
use noodles::vcf::variant::Record as _;
use tracing::debug;

use crate::core::interval::GenomicInterval;
use crate::core::types::{VariantId, VariantKind};
use crate::core::variant::Variant;
use crate::sources::SourceError;

/// Parse a VCF file (plain, gzip or bgzip)
///
/// # Errors
///
/// Returns `SourceError::Io` if the file cannot be opened, or other parse errors
/// if the header or a record is invalid.
pub fn parse_vcf_file(path: &Path) -> Result<Vec<Variant>, SourceError> {
    let file = File::open(path)?;

    let lowered = path.to_string_lossy().to_lowercase();
    if lowered.ends_with(".gz") || lowered.ends_with(".bgz") {
        parse_vcf_reader(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        parse_vcf_reader(BufReader::new(file))
    }
}

/// Parse VCF text, header included
///
/// # Errors
///
/// See [`parse_vcf_reader`].
pub fn parse_vcf_text(text: &str) -> Result<Vec<Variant>, SourceError> {
    parse_vcf_reader(text.as_bytes())
}

/// Parse a VCF stream; ids are assigned from 0 in record order.
///
/// # Errors
///
/// Returns `SourceError::Noodles` if the header or a record cannot be decoded,
/// `SourceError::InvalidFormat` for a record without a POS, and
/// `SourceError::VariantRecord` if the footprint is invalid.
pub fn parse_vcf_reader<R: BufRead>(reader: R) -> Result<Vec<Variant>, SourceError> {
    let mut vcf_reader = vcf::io::Reader::new(reader);
    let header = vcf_reader
        .read_header()
        .map_err(|e| SourceError::Noodles(format!("Failed to read VCF header: {e}")))?;

    let mut variants = Vec::new();

    for (i, result) in vcf_reader.records().enumerate() {
        let record_num = i + 1;
        let record = result
            .map_err(|e| SourceError::Noodles(format!("VCF record {record_num}: {e}")))?;

        let start = match record.variant_start() {
            Some(Ok(position)) => position.get() as u64,
            Some(Err(e)) => {
                return Err(SourceError::Noodles(format!(
                    "Invalid POS in VCF record {record_num}: {e}"
                )))
            }
            None => {
                return Err(SourceError::InvalidFormat(format!(
                    "VCF record {record_num} has no POS"
                )))
            }
        };
        let end = record
            .variant_end(&header)
            .map_err(|e| SourceError::Noodles(format!("Invalid end in VCF record {record_num}: {e}")))?
            .get() as u64;

        let interval = GenomicInterval::new(record.reference_sequence_name(), start, end)
            .map_err(|source| SourceError::VariantRecord {
                record: record_num,
                source,
            })?;

        let alternate_bases = record.alternate_bases();
        let alternates = alternate_bases
            .iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SourceError::Noodles(format!("Invalid ALT in VCF record {record_num}: {e}")))?;
        let alternates = if alternates.is_empty() {
            String::from(".")
        } else {
            alternates.join(",")
        };

        let kind = classify(record.reference_bases(), &alternates);
        variants.push(Variant::new(
            VariantId(variants.len() as u64),
            interval,
            kind,
        ));
    }

    debug!(variants = variants.len(), "Parsed VCF records");
    Ok(variants)
}

fn is_bases(allele: &str) -> bool {
    !allele.is_empty()
        && allele
            .bytes()
            .all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T' | b'N'))
}

/// Classify a record from its REF and comma-separated ALT alleles
pub fn classify(reference: &str, alternates: &str) -> VariantKind {
    if alternates == "." || !is_bases(reference) {
        return VariantKind::Other;
    }

    let alts: Vec<&str> = alternates.split(',').collect();
    if !alts.iter().all(|alt| is_bases(alt)) {
        return VariantKind::Other;
    }

    if reference.len() == 1 && alts.iter().all(|alt| alt.len() == 1) {
        VariantKind::Snp
    } else if alts.iter().any(|alt| alt.len() != reference.len()) {
        VariantKind::Indel
    } else {
        VariantKind::Other
    }
}
