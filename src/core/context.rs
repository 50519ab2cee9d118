use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::core::interval::Located;
use crate::core::reference::ReferenceBases;
use crate::core::types::VariantId;
use crate::core::variant::Variant;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("Conflicting reference bases ({first} vs {second})")]
    ConflictingReferenceBases { first: String, second: String },

    #[error("Variant {0} seen with conflicting contents")]
    ConflictingVariant(VariantId),

    #[error("No reference bases were joined")]
    MissingReferenceBases,
}

/// Everything assembled for a single read: its reference bases and every
/// variant overlapping it, unique by variant id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadContextData {
    reference_bases: ReferenceBases,
    #[serde(serialize_with = "serialize_variant_set")]
    variants: BTreeMap<VariantId, Variant>,
}

fn serialize_variant_set<S: Serializer>(
    variants: &BTreeMap<VariantId, Variant>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(variants.values())
}

impl ReadContextData {
    /// Build a context; variants repeated by id are kept once
    pub fn new(reference_bases: ReferenceBases, variants: impl IntoIterator<Item = Variant>) -> Self {
        Self {
            reference_bases,
            variants: variants.into_iter().map(|v| (v.id, v)).collect(),
        }
    }

    pub fn reference_bases(&self) -> &ReferenceBases {
        &self.reference_bases
    }

    /// Variants ordered by id
    pub fn variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.values()
    }

    pub fn variant_ids(&self) -> impl Iterator<Item = VariantId> + '_ {
        self.variants.keys().copied()
    }

    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub fn contains_variant(&self, id: VariantId) -> bool {
        self.variants.contains_key(&id)
    }
}

/// A read's context as seen from some subset of shards.
///
/// `combine` is associative and commutative with `PartialContext::default()` as
/// identity, so partials from any number of shards fold to the same value
/// whatever order they arrive in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialContext {
    reference_bases: Option<ReferenceBases>,
    variants: BTreeMap<VariantId, Variant>,
}

impl PartialContext {
    pub fn from_reference(bases: ReferenceBases) -> Self {
        Self {
            reference_bases: Some(bases),
            variants: BTreeMap::new(),
        }
    }

    pub fn from_variant(variant: Variant) -> Self {
        let mut variants = BTreeMap::new();
        variants.insert(variant.id, variant);
        Self {
            reference_bases: None,
            variants,
        }
    }

    #[must_use]
    pub fn has_reference_bases(&self) -> bool {
        self.reference_bases.is_some()
    }

    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Merge two partials.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::ConflictingReferenceBases` if both sides carry
    /// different reference bases, or `ContextError::ConflictingVariant` if one
    /// variant id maps to two different variants.
    pub fn combine(mut self, other: Self) -> Result<Self, ContextError> {
        self.reference_bases = match (self.reference_bases, other.reference_bases) {
            (Some(a), Some(b)) if a != b => {
                return Err(ContextError::ConflictingReferenceBases {
                    first: a.interval().to_string(),
                    second: b.interval().to_string(),
                });
            }
            (a, b) => a.or(b),
        };

        for (id, variant) in other.variants {
            match self.variants.get(&id) {
                Some(existing) if *existing != variant => {
                    return Err(ContextError::ConflictingVariant(id));
                }
                Some(_) => {}
                None => {
                    self.variants.insert(id, variant);
                }
            }
        }

        Ok(self)
    }

    /// Close the partial into a full context.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::MissingReferenceBases` if no reference bases were joined.
    pub fn finish(self) -> Result<ReadContextData, ContextError> {
        let reference_bases = self
            .reference_bases
            .ok_or(ContextError::MissingReferenceBases)?;
        Ok(ReadContextData {
            reference_bases,
            variants: self.variants,
        })
    }
}
