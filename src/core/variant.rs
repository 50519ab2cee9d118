use serde::{Deserialize, Serialize};

use crate::core::interval::{GenomicInterval, Located};
use crate::core::types::{VariantId, VariantKind};

/// A called variant: identity, footprint and type flags
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub interval: GenomicInterval,
    pub kind: VariantKind,
}

impl Variant {
    pub fn new(id: VariantId, interval: GenomicInterval, kind: VariantKind) -> Self {
        Self { id, interval, kind }
    }

    #[must_use]
    pub fn is_snp(&self) -> bool {
        self.kind.is_snp()
    }

    #[must_use]
    pub fn is_indel(&self) -> bool {
        self.kind.is_indel()
    }
}

impl Located for Variant {
    fn interval(&self) -> &GenomicInterval {
        &self.interval
    }
}
