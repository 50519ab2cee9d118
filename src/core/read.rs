use serde::{Deserialize, Serialize};

use crate::core::interval::{GenomicInterval, Located};
use crate::core::types::ReadId;

/// An aligned read reduced to what the shard join needs: identity and footprint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReadRecord {
    /// Unique identity, assigned by the loader
    pub id: ReadId,

    /// Read name (QNAME); not unique, mates share it
    pub name: String,

    /// Reference span covered by the alignment
    pub interval: GenomicInterval,
}

impl ReadRecord {
    pub fn new(id: ReadId, name: impl Into<String>, interval: GenomicInterval) -> Self {
        Self {
            id,
            name: name.into(),
            interval,
        }
    }
}

impl Located for ReadRecord {
    fn interval(&self) -> &GenomicInterval {
        &self.interval
    }
}
