use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::core::interval::{GenomicInterval, IntervalError, Located};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Unknown contig '{0}' in reference")]
    UnknownContig(String),

    #[error("Interval {interval} extends past the end of contig '{contig}' (length {length})")]
    OutOfBounds {
        interval: String,
        contig: String,
        length: u64,
    },

    #[error("Expected {expected} bases for {interval}, got {actual}")]
    LengthMismatch {
        interval: String,
        expected: u64,
        actual: u64,
    },

    #[error("Interval {requested} is not contained in {available}")]
    NotContained {
        requested: String,
        available: String,
    },

    #[error(transparent)]
    Interval(#[from] IntervalError),
}

/// Reference sequence bases for one interval.
///
/// The byte length always equals the interval length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReferenceBases {
    interval: GenomicInterval,
    #[serde(serialize_with = "serialize_bases")]
    bases: Vec<u8>,
}

fn serialize_bases<S: Serializer>(bases: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bases))
}

impl ReferenceBases {
    /// # Errors
    ///
    /// Returns `ReferenceError::LengthMismatch` if `bases` does not cover the interval exactly.
    pub fn new(interval: GenomicInterval, bases: Vec<u8>) -> Result<Self, ReferenceError> {
        let actual = bases.len() as u64;
        if actual != interval.len() {
            return Err(ReferenceError::LengthMismatch {
                interval: interval.to_string(),
                expected: interval.len(),
                actual,
            });
        }
        Ok(Self { interval, bases })
    }

    pub fn bases(&self) -> &[u8] {
        &self.bases
    }

    /// Bases for a sub-interval of this one.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::Interval` for a different contig, or
    /// `ReferenceError::NotContained` if `interval` reaches outside these bases.
    pub fn subset(&self, interval: &GenomicInterval) -> Result<Self, ReferenceError> {
        if !self.interval.contains(interval)? {
            return Err(ReferenceError::NotContained {
                requested: interval.to_string(),
                available: self.interval.to_string(),
            });
        }

        // Both bounds lie within self.interval, whose length is bases.len()
        #[allow(clippy::cast_possible_truncation)]
        let from = (interval.start() - self.interval.start()) as usize;
        #[allow(clippy::cast_possible_truncation)]
        let to = from + interval.len() as usize;

        Ok(Self {
            interval: interval.clone(),
            bases: self.bases[from..to].to_vec(),
        })
    }
}

impl Located for ReferenceBases {
    fn interval(&self) -> &GenomicInterval {
        &self.interval
    }
}
