//! Stable partitioning by key
//!
//! Groups items by the key each produces, keeping keys in the order they are
//! first encountered and items in input order within each group.

use std::collections::HashMap;
use std::hash::Hash;

/// Partition `items` by `key`, in first-occurrence order of keys
pub fn groups<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> Vec<(K, Vec<T>)>
where
    K: Hash + Eq + Clone,
    F: FnMut(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut out: Vec<(K, Vec<T>)> = Vec::new();
    for item in items {
        let k = key(&item);
        match slots.get(&k) {
            Some(&slot) => out[slot].1.push(item),
            None => {
                slots.insert(k.clone(), out.len());
                out.push((k, vec![item]));
            }
        }
    }
    out
}

/// Partition by `outer`, then each bucket by `inner`
pub fn groups2<T, K1, K2, F1, F2>(
    items: impl IntoIterator<Item = T>,
    outer: F1,
    mut inner: F2,
) -> Vec<(K1, Vec<(K2, Vec<T>)>)>
where
    K1: Hash + Eq + Clone,
    K2: Hash + Eq + Clone,
    F1: FnMut(&T) -> K1,
    F2: FnMut(&T) -> K2,
{
    groups(items, outer)
        .into_iter()
        .map(|(k, bucket)| (k, groups(bucket, &mut inner)))
        .collect()
}
