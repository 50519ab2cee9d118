use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    #[error("Contig name must not be empty")]
    EmptyContig,

    #[error("Invalid start {0}: coordinates are 1-based")]
    InvalidStart(u64),

    #[error("Invalid interval {contig}:{start}-{end}: start is after end")]
    StartAfterEnd { contig: String, start: u64, end: u64 },

    #[error("Cannot compare intervals on different contigs ({left} vs {right})")]
    ContigMismatch { left: String, right: String },

    #[error("Cannot parse interval '{0}': expected contig:start-end")]
    Parse(String),

    #[error("Interval starting at {start} with length {length} ends past the coordinate range")]
    Overflow { start: u64, length: u64 },
}

/// Records that occupy a genomic interval
pub trait Located {
    fn interval(&self) -> &GenomicInterval;
}

/// A genomic span on one contig, 1-based and inclusive on both ends.
///
/// Construction validates `1 <= start <= end` and a non-empty contig, so every
/// value that exists is safe to shard and join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct GenomicInterval {
    contig: String,
    start: u64,
    end: u64,
}

#[derive(Deserialize)]
struct RawInterval {
    contig: String,
    start: u64,
    end: u64,
}

impl TryFrom<RawInterval> for GenomicInterval {
    type Error = IntervalError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.contig, raw.start, raw.end)
    }
}

impl GenomicInterval {
    /// Create a validated interval.
    ///
    /// # Errors
    ///
    /// Returns `IntervalError::EmptyContig` for an empty contig name,
    /// `IntervalError::InvalidStart` for a zero start, or
    /// `IntervalError::StartAfterEnd` when `start > end`.
    pub fn new(contig: impl Into<String>, start: u64, end: u64) -> Result<Self, IntervalError> {
        let contig = contig.into();
        if contig.is_empty() {
            return Err(IntervalError::EmptyContig);
        }
        if start == 0 {
            return Err(IntervalError::InvalidStart(start));
        }
        if start > end {
            return Err(IntervalError::StartAfterEnd { contig, start, end });
        }
        Ok(Self { contig, start, end })
    }

    /// Create an interval from a start position and a length
    ///
    /// # Errors
    ///
    /// Same as [`GenomicInterval::new`]; a zero length yields `StartAfterEnd`, and
    /// `IntervalError::Overflow` is returned if `start + length` does not fit in a `u64`.
    pub fn from_start_length(
        contig: impl Into<String>,
        start: u64,
        length: u64,
    ) -> Result<Self, IntervalError> {
        let past_end = start
            .checked_add(length)
            .ok_or(IntervalError::Overflow { start, length })?;
        Self::new(contig, start, past_end.saturating_sub(1))
    }

    pub fn contig(&self) -> &str {
        &self.contig
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of positions covered
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always false; intervals cover at least one position
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True when both intervals are on the same contig and share a position.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.contig == other.contig && self.start <= other.end && self.end >= other.start
    }

    fn require_same_contig(&self, other: &Self) -> Result<(), IntervalError> {
        if self.contig == other.contig {
            Ok(())
        } else {
            Err(IntervalError::ContigMismatch {
                left: self.contig.clone(),
                right: other.contig.clone(),
            })
        }
    }

    /// Order two intervals by start, then end.
    ///
    /// # Errors
    ///
    /// Returns `IntervalError::ContigMismatch` for intervals on different contigs.
    pub fn compare(&self, other: &Self) -> Result<Ordering, IntervalError> {
        self.require_same_contig(other)?;
        Ok(self
            .start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end)))
    }

    /// Whether `other` lies entirely within this interval.
    ///
    /// # Errors
    ///
    /// Returns `IntervalError::ContigMismatch` for intervals on different contigs.
    pub fn contains(&self, other: &Self) -> Result<bool, IntervalError> {
        self.require_same_contig(other)?;
        Ok(self.start <= other.start && self.end >= other.end)
    }

    /// Smallest interval covering both.
    ///
    /// # Errors
    ///
    /// Returns `IntervalError::ContigMismatch` for intervals on different contigs.
    pub fn span_with(&self, other: &Self) -> Result<Self, IntervalError> {
        self.require_same_contig(other)?;
        Ok(Self {
            contig: self.contig.clone(),
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        })
    }
}

impl std::fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.end)
    }
}

impl FromStr for GenomicInterval {
    type Err = IntervalError;

    /// Parse `contig:start-end`, or `contig:pos` for a single position.
    /// Commas in numbers are accepted (`1:1,000,000-1,000,009`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || IntervalError::Parse(s.to_string());
        let parse_pos = |text: &str| -> Result<u64, IntervalError> {
            text.trim().replace(',', "").parse().map_err(|_| parse_err())
        };

        // Contig names may themselves contain ':' (e.g. HLA alleles); split on the last one
        let (contig, range) = s.rsplit_once(':').ok_or_else(parse_err)?;
        let (start, end) = match range.split_once('-') {
            Some((start, end)) => (parse_pos(start)?, parse_pos(end)?),
            None => {
                let pos = parse_pos(range)?;
                (pos, pos)
            }
        };

        Self::new(contig, start, end)
    }
}

impl Located for GenomicInterval {
    fn interval(&self) -> &GenomicInterval {
        self
    }
}
