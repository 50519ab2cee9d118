use serde::{Deserialize, Serialize};

/// Nominal identity of a read.
///
/// Two reads with identical coordinates but different ids are distinct records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadId(pub u64);

impl ReadId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ReadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Nominal identity of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub u64);

impl VariantId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type flags carried by a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    /// Single-base substitution
    Snp,
    /// Insertion or deletion
    Indel,
    /// Anything else (MNPs, symbolic alleles)
    Other,
}

impl VariantKind {
    #[must_use]
    pub fn is_snp(self) -> bool {
        matches!(self, Self::Snp)
    }

    #[must_use]
    pub fn is_indel(self) -> bool {
        matches!(self, Self::Indel)
    }
}

impl std::fmt::Display for VariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Snp => write!(f, "SNP"),
            Self::Indel => write!(f, "INDEL"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}
