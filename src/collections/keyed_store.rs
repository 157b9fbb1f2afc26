//! Fixed-size chained hash table that owns its values.
//!
//! The bucket count is derived once from the expected number of entries
//! (`expected / 0.75 + 1`) and never changes. Inserting far more entries than
//! hinted keeps working but chains grow linearly; there is no rehashing.

use std::fmt;
use std::mem;

use super::hash::{hash_key, RawKey};
use super::instrument::{Instrument, NoInstrument, StoreOp};

type Chain<K, V> = Option<Box<Entry<K, V>>>;

struct Entry<K, V> {
    key: K,
    value: V,
    next: Chain<K, V>,
}

/// Hash table keyed by plain numeric identifiers.
///
/// Values are exclusively owned by the store until [`KeyedStore::erase`] hands
/// them back. Dropping the store drops every value still inside it.
pub struct KeyedStore<K, V, I = NoInstrument> {
    buckets: Box<[Chain<K, V>]>,
    len: usize,
    instrument: I,
}

/// Number of buckets allocated for an expected entry count (load factor 0.75).
pub fn bucket_count_for(expected: usize) -> usize {
    expected.saturating_mul(4) / 3 + 1
}

impl<K: RawKey, V> KeyedStore<K, V> {
    /// Create a store sized for `expected` entries.
    pub fn new(expected: usize) -> Self {
        Self::with_instrument(expected, NoInstrument)
    }
}

impl<K: RawKey, V, I: Instrument> KeyedStore<K, V, I> {
    /// Create a store sized for `expected` entries that reports to `instrument`.
    pub fn with_instrument(expected: usize, instrument: I) -> Self {
        let buckets = (0..bucket_count_for(expected)).map(|_| None).collect();
        Self {
            buckets,
            len: 0,
            instrument,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fixed number of chains.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn instrument(&self) -> &I {
        &self.instrument
    }

    /// Insert `value` under `key`.
    ///
    /// An existing value for the same key is replaced in place and returned;
    /// dropping the returned value disposes of it. New keys are prepended to
    /// their chain.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_index(&key);
        let Some(chain) = self.buckets.get_mut(index) else {
            return Some(value);
        };

        let mut steps = 0;
        let mut cursor = chain.as_deref_mut();
        while let Some(entry) = cursor {
            steps += 1;
            if entry.key == key {
                self.instrument.record(StoreOp::Insert, steps);
                return Some(mem::replace(&mut entry.value, value));
            }
            cursor = entry.next.as_deref_mut();
        }

        let next = chain.take();
        *chain = Some(Box::new(Entry { key, value, next }));
        self.len += 1;
        self.instrument.record(StoreOp::Insert, steps);
        None
    }

    pub fn find(&self, key: &K) -> Option<&V> {
        let (entry, steps) = self.locate(key);
        self.instrument.record(StoreOp::Find, steps);
        entry.map(|entry| &entry.value)
    }

    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.bucket_index(key);
        let mut steps = 0;
        let mut cursor = self.buckets.get_mut(index)?.as_deref_mut();
        while let Some(entry) = cursor {
            steps += 1;
            if entry.key == *key {
                self.instrument.record(StoreOp::Find, steps);
                return Some(&mut entry.value);
            }
            cursor = entry.next.as_deref_mut();
        }
        self.instrument.record(StoreOp::Find, steps);
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Remove the entry for `key` and hand its value to the caller.
    pub fn erase(&mut self, key: &K) -> Option<V> {
        let index = self.bucket_index(key);
        let chain = self.buckets.get_mut(index)?;

        let position = {
            let mut cursor = chain.as_deref();
            let mut position = 0;
            loop {
                match cursor {
                    Some(entry) if entry.key == *key => break Some(position),
                    Some(entry) => {
                        position += 1;
                        cursor = entry.next.as_deref();
                    }
                    None => break None,
                }
            }
        };

        let Some(position) = position else {
            self.instrument.record(StoreOp::Erase, chain_len(chain));
            return None;
        };

        let mut slot = chain;
        for _ in 0..position {
            match slot {
                Some(entry) => slot = &mut entry.next,
                None => break,
            }
        }
        let entry = slot.take()?;
        let Entry { value, next, .. } = *entry;
        *slot = next;
        self.len -= 1;
        self.instrument.record(StoreOp::Erase, position + 1);
        Some(value)
    }

    /// Erase every entry matching `pred` and return them.
    ///
    /// Keys are collected during the walk and erased afterwards, so the
    /// traversal never observes a half-modified chain.
    pub fn erase_where<F>(&mut self, mut pred: F) -> Vec<(K, V)>
    where
        F: FnMut(&K, &V) -> bool,
    {
        let keys: Vec<K> = self
            .iter()
            .filter(|(key, value)| pred(*key, *value))
            .map(|(key, _)| *key)
            .collect();

        keys.into_iter()
            .filter_map(|key| self.erase(&key).map(|value| (key, value)))
            .collect()
    }

    /// Visit every entry once, bucket by bucket, allowing the value to change.
    ///
    /// The store is exclusively borrowed for the whole walk, so the callback
    /// cannot insert into or erase from it.
    pub fn for_each<F>(&mut self, mut visit: F)
    where
        F: FnMut(&K, &mut V),
    {
        let mut steps = 0;
        for chain in self.buckets.iter_mut() {
            let mut cursor = chain.as_deref_mut();
            while let Some(entry) = cursor {
                steps += 1;
                visit(&entry.key, &mut entry.value);
                cursor = entry.next.as_deref_mut();
            }
        }
        self.instrument.record(StoreOp::Visit, steps);
    }

    /// Read-only iteration in bucket order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
            remaining: self.len,
        }
    }

    /// Drop every value and empty every chain. Calling it twice is harmless.
    pub fn clear(&mut self) {
        for chain in self.buckets.iter_mut() {
            let mut link = chain.take();
            while let Some(mut entry) = link {
                link = entry.next.take();
            }
        }
        self.len = 0;
    }

    /// Length of the longest chain.
    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(chain_len).max().unwrap_or(0)
    }

    /// Rough byte footprint: the bucket array plus one entry per stored value.
    ///
    /// Heap data owned by the values themselves is not counted.
    pub fn approx_memory_usage(&self) -> usize {
        mem::size_of::<Self>()
            + self.buckets.len() * mem::size_of::<Chain<K, V>>()
            + self.len * mem::size_of::<Entry<K, V>>()
    }

    fn bucket_index(&self, key: &K) -> usize {
        // The modulus is below the bucket count, so it fits in usize.
        (hash_key(key) % self.buckets.len() as u64) as usize
    }

    fn locate(&self, key: &K) -> (Option<&Entry<K, V>>, usize) {
        let index = self.bucket_index(key);
        let mut steps = 0;
        let mut cursor = self.buckets.get(index).and_then(|chain| chain.as_deref());
        while let Some(entry) = cursor {
            steps += 1;
            if entry.key == *key {
                return (Some(entry), steps);
            }
            cursor = entry.next.as_deref();
        }
        (None, steps)
    }
}

fn chain_len<K, V>(chain: &Chain<K, V>) -> usize {
    let mut len = 0;
    let mut cursor = chain.as_deref();
    while let Some(entry) = cursor {
        len += 1;
        cursor = entry.next.as_deref();
    }
    len
}

impl<K, V, I> Drop for KeyedStore<K, V, I> {
    fn drop(&mut self) {
        for chain in self.buckets.iter_mut() {
            let mut link = chain.take();
            while let Some(mut entry) = link {
                link = entry.next.take();
            }
        }
    }
}

impl<K: RawKey + fmt::Debug, V: fmt::Debug, I: Instrument> fmt::Debug for KeyedStore<K, V, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over a [`KeyedStore`].
pub struct Iter<'a, K, V> {
    buckets: std::slice::Iter<'a, Chain<K, V>>,
    current: Option<&'a Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current {
                self.current = entry.next.as_deref();
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&entry.key, &entry.value));
            }
            self.current = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: RawKey, V, I: Instrument> IntoIterator for &'a KeyedStore<K, V, I> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
