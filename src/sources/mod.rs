//! Loaders and services feeding the shard join.
//!
//! This module provides:
//!
//! - [`reference`]: the [`ReferenceSource`](reference::ReferenceSource) trait with
//!   in-memory and synthetic implementations
//! - [`fasta`]: load a FASTA file (plain or gzip) into an in-memory reference
//! - [`reads`]: tab-separated read intervals
//! - [`alignment`]: read footprints from SAM/BAM files
//! - [`vcf`]: variant footprints from VCF records
//!
//! Loaders assign sequential ids in input order, so the same file always yields
//! the same identities.
//!
//! ## Read TSV format
//!
//! | Column | Description | Required |
//! |--------|-------------|----------|
//! | name   | Read name | Yes |
//! | contig | Contig name | Yes |
//! | start  | 1-based first aligned position | Yes |
//! | end    | 1-based last aligned position, inclusive | Yes |

use thiserror::Error;

use crate::core::interval::IntervalError;

pub mod alignment;
pub mod fasta;
pub mod reads;
pub mod reference;
pub mod vcf;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid interval on line {line}: {source}")]
    Interval { line: usize, source: IntervalError },

    #[error("Invalid footprint in VCF record {record}: {source}")]
    VariantRecord { record: usize, source: IntervalError },
}
