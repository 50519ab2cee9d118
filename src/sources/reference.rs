//! Reference-base sources.
//!
//! The pipeline asks a [`ReferenceSource`] for one interval per reference-shard
//! group. Two sources are provided: [`InMemoryReference`], holding real
//! sequence (usually loaded from FASTA), and [`SyntheticReference`], which
//! derives bases from position for dry runs and tests.

use std::collections::HashMap;

use crate::core::interval::GenomicInterval;
use crate::core::reference::{ReferenceBases, ReferenceError};

/// Supplier of reference bases for an interval
pub trait ReferenceSource: Send + Sync {
    /// Length of a contig, `None` if the source does not know it
    fn contig_length(&self, contig: &str) -> Option<u64>;

    /// Bases covering exactly `interval`.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownContig` for a contig the source does not
    /// hold, or `ReferenceError::OutOfBounds` if the interval runs past its end.
    fn fetch(&self, interval: &GenomicInterval) -> Result<ReferenceBases, ReferenceError>;
}

/// Check `interval` against the source's contig lengths, returning the contig length
fn check_bounds<S: ReferenceSource + ?Sized>(
    source: &S,
    interval: &GenomicInterval,
) -> Result<u64, ReferenceError> {
    let length = source
        .contig_length(interval.contig())
        .ok_or_else(|| ReferenceError::UnknownContig(interval.contig().to_string()))?;

    if interval.end() > length {
        return Err(ReferenceError::OutOfBounds {
            interval: interval.to_string(),
            contig: interval.contig().to_string(),
            length,
        });
    }

    Ok(length)
}

/// Reference sequence held in memory, keyed by contig name
#[derive(Debug, Clone, Default)]
pub struct InMemoryReference {
    contigs: HashMap<String, Vec<u8>>,
    /// Contig names in insertion order
    order: Vec<String>,
}

impl InMemoryReference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a contig's sequence
    pub fn insert(&mut self, name: impl Into<String>, bases: Vec<u8>) {
        let name = name.into();
        if !self.contigs.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.contigs.insert(name, bases);
    }

    #[must_use]
    pub fn with_contig(mut self, name: impl Into<String>, bases: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bases.into());
        self
    }

    pub fn contig_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }
}

impl ReferenceSource for InMemoryReference {
    fn contig_length(&self, contig: &str) -> Option<u64> {
        self.contigs.get(contig).map(|bases| bases.len() as u64)
    }

    fn fetch(&self, interval: &GenomicInterval) -> Result<ReferenceBases, ReferenceError> {
        check_bounds(self, interval)?;
        let sequence = self
            .contigs
            .get(interval.contig())
            .ok_or_else(|| ReferenceError::UnknownContig(interval.contig().to_string()))?;

        // check_bounds guarantees 1 <= start <= end <= sequence.len()
        #[allow(clippy::cast_possible_truncation)]
        let (from, to) = ((interval.start() - 1) as usize, interval.end() as usize);
        ReferenceBases::new(interval.clone(), sequence[from..to].to_vec())
    }
}

const SYNTHETIC_BASES: [u8; 4] = *b"ACGT";

/// Deterministic stand-in reference: the base at position `p` is `ACGT[(p - 1) % 4]`.
///
/// Only contig lengths are stored, so arbitrarily large genomes cost nothing
/// until fetched.
#[derive(Debug, Clone, Default)]
pub struct SyntheticReference {
    lengths: HashMap<String, u64>,
}

impl SyntheticReference {
    pub fn new<N: Into<String>>(contigs: impl IntoIterator<Item = (N, u64)>) -> Self {
        Self {
            lengths: contigs
                .into_iter()
                .map(|(name, length)| (name.into(), length))
                .collect(),
        }
    }

    /// Base at a 1-based position
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn base_at(position: u64) -> u8 {
        SYNTHETIC_BASES[(position.saturating_sub(1) % 4) as usize]
    }
}

impl ReferenceSource for SyntheticReference {
    fn contig_length(&self, contig: &str) -> Option<u64> {
        self.lengths.get(contig).copied()
    }

    fn fetch(&self, interval: &GenomicInterval) -> Result<ReferenceBases, ReferenceError> {
        check_bounds(self, interval)?;
        let bases = (interval.start()..=interval.end())
            .map(Self::base_at)
            .collect();
        ReferenceBases::new(interval.clone(), bases)
    }
}
