use std::collections::BTreeMap;

use crate::core::interval::Located;
use crate::core::shard::{ShardError, ShardKey, ShardWidth};

/// Records grouped by shard key, ordered by key (contig, then shard number)
pub type ShardGroups<K, T> = BTreeMap<K, Vec<T>>;

/// Group records under every shard key their interval maps to.
///
/// Multiplicity is preserved: a record emitted under two keys appears in both
/// groups, and two distinct records with identical coordinates both appear.
///
/// # Errors
///
/// Returns `ShardError::ShardNumberOverflow` if any record's shard is out of range,
/// or `ShardError::TooManyShards` if one record would be keyed into too many shards.
pub fn group_by_shard<K, T>(records: &[T], width: ShardWidth) -> Result<ShardGroups<K, T>, ShardError>
where
    K: ShardKey,
    T: Located + Clone,
{
    let mut groups: ShardGroups<K, T> = BTreeMap::new();

    for record in records {
        for key in K::keys_for(record.interval(), width)? {
            groups.entry(key).or_default().push(record.clone());
        }
    }

    Ok(groups)
}

/// Total number of emitted (key, record) entries across all groups
pub fn emitted_count<K, T>(groups: &ShardGroups<K, T>) -> usize {
    groups.values().map(Vec::len).sum()
}
