//! Persistent map that remembers insertion order.
//!
//! Entries live in an [`imbl::HashMap`] tagged with a sequence number, and an
//! [`imbl::OrdMap`] from sequence number to key drives iteration. Clones
//! share their tree nodes, so cloning is O(1) and a mutation of a clone
//! copies only the path to the touched entry.

use std::{fmt, hash::Hash, mem};

use imbl::{HashMap, OrdMap};

pub(crate) struct OrderedMap<K, V> {
    entries: HashMap<K, (u64, V)>,
    order: OrdMap<u64, K>,
    next_seq: u64,
}

impl<K: Clone, V: Clone> Clone for OrderedMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            order: self.order.clone(),
            next_seq: self.next_seq,
        }
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::default(),
            order: OrdMap::default(),
            next_seq: 0,
        }
    }
}

impl<K, V> fmt::Debug for OrderedMap<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|(_, value)| value)
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key).map(|(_, value)| value)
    }

    /// Inserts or replaces a value. A replaced entry keeps its position.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some((_, slot)) = self.entries.get_mut(&key) {
            return Some(mem::replace(slot, value));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, key.clone());
        self.entries.insert(key, (seq, value));
        None
    }

    /// Returns the value for `key`, inserting `make()` at the end if absent.
    pub(crate) fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let order = &mut self.order;
        let next_seq = &mut self.next_seq;
        let (_, value) = self.entries.entry(key.clone()).or_insert_with(|| {
            let seq = *next_seq;
            *next_seq += 1;
            order.insert(seq, key);
            (seq, make())
        });
        value
    }

    /// Removes an entry; later entries keep their relative order.
    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let (seq, value) = self.entries.remove(key)?;
        self.order.remove(&seq);
        Some(value)
    }

    /// Entries in insertion order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order
            .values()
            .filter_map(|key| self.entries.get(key).map(|(_, value)| (key, value)))
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns true if both maps share the same tries.
    #[cfg(test)]
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        self.entries.ptr_eq(&other.entries) && self.order.ptr_eq(&other.order)
    }
}
