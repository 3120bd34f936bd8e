//! ProbingHashMap: open addressing with quadratic probing and tombstones.
//!
//! Slots hold at most one entry. A key's probe sequence visits
//! `(base + k^2) mod capacity` for `k = 0, 1, 2, ...`, where `base` is the
//! key's hash modulo the capacity. Removal flags the entry as a tombstone
//! instead of clearing the slot, so probe sequences passing through it stay
//! intact; a later `put` may reuse the slot.
//!
//! Keeping the load factor at or below one half on a prime capacity means the
//! first `(capacity + 1) / 2` probes are pairwise distinct and always include
//! a slot without a live entry, so every probe loop below is bounded by
//! `capacity` steps.

use crate::buckets::Buckets;
use crate::prime::next_prime;
use crate::table::{rebuild, HashFn, Rebuild, ResizeError, Table};
use core::fmt;
use core::iter::FusedIterator;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<V> {
    key: String,
    value: V,
    tombstone: bool,
}

impl<V> Entry<V> {
    fn new(key: String, value: V) -> Self {
        Self {
            key,
            value,
            tombstone: false,
        }
    }

    fn is_live_for(&self, key: &str) -> bool {
        !self.tombstone && self.key == key
    }
}

/// Quadratic probe sequence over `capacity` slots.
///
/// Steps by successive odd numbers, since `(k + 1)^2 - k^2 = 2k + 1`.
struct Probe {
    index: usize,
    step: usize,
    capacity: usize,
}

impl Iterator for Probe {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.step == self.capacity {
            return None;
        }
        let i = self.index;
        self.index = (self.index + 2 * self.step + 1) % self.capacity;
        self.step += 1;
        Some(i)
    }
}

/// Hash table resolving collisions by quadratic probing.
pub struct ProbingHashMap<V, F = HashFn> {
    buckets: Buckets<Option<Entry<V>>>,
    size: usize,
    hash_fn: F,
}

impl<V, F> ProbingHashMap<V, F>
where
    F: Fn(&str) -> u64,
{
    /// Load factor the table never exceeds after a `put`.
    pub const MAX_LOAD: f64 = 0.5;

    /// Create a table with at least `capacity` slots, rounded up to a prime.
    pub fn new(capacity: usize, hash_fn: F) -> Self {
        Self {
            buckets: Buckets::new(next_prime(capacity)),
            size: 0,
            hash_fn,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }

    /// Number of slots that have never held an entry since the last
    /// clear or resize. Tombstones are not empty.
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|slot| slot.is_none()).count()
    }

    fn probe(&self, key: &str) -> Probe {
        let capacity = self.capacity();
        Probe {
            index: ((self.hash_fn)(key) % capacity as u64) as usize,
            step: 0,
            capacity,
        }
    }

    /// Slot holding the live entry for `key`, if any.
    fn find_live(&self, key: &str) -> Option<usize> {
        for i in self.probe(key) {
            match &self.buckets[i] {
                None => return None,
                Some(e) if e.is_live_for(key) => return Some(i),
                Some(_) => {}
            }
        }
        None
    }

    /// Insert `key`, or overwrite its value in place when already live.
    ///
    /// Overwriting never grows the table. A new key lands in the first
    /// tombstone on its probe path, or else in the first never-used slot.
    pub fn put<K: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        if let Some(i) = self.find_live(&key) {
            if let Some(e) = self.buckets[i].as_mut() {
                e.value = value;
            }
            return;
        }

        if (self.size + 1) as f64 / self.capacity() as f64 > Self::MAX_LOAD {
            let doubled = self.capacity() * 2;
            log::debug!(
                "probing table at {}/{} slots, growing to {}",
                self.size,
                self.capacity(),
                doubled
            );
            self.resize_table(doubled);
        }

        let mut reusable = None;
        let mut vacant = None;
        for i in self.probe(&key) {
            match &self.buckets[i] {
                None => {
                    vacant = Some(i);
                    break;
                }
                Some(e) if e.tombstone => {
                    reusable.get_or_insert(i);
                }
                Some(_) => {}
            }
        }

        match reusable.or(vacant) {
            Some(i) => {
                self.buckets[i] = Some(Entry::new(key, value));
                self.size += 1;
            }
            None => {
                // Only reachable if the load invariant was broken; grow and retry.
                log::warn!(
                    "no free slot on probe path at {}/{} slots",
                    self.size,
                    self.capacity()
                );
                self.resize_table(self.capacity() * 2);
                self.put(key, value);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let i = self.find_live(key)?;
        self.buckets[i].as_ref().map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let i = self.find_live(key)?;
        self.buckets[i].as_mut().map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_live(key).is_some()
    }

    /// Tombstone the live entry for `key`. Returns whether one was found.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(i) = self.find_live(key) else {
            return false;
        };
        match &mut self.buckets[i] {
            Some(e) => {
                e.tombstone = true;
                self.size -= 1;
                true
            }
            None => false,
        }
    }

    /// Drop every entry and tombstone, keeping the capacity.
    pub fn clear(&mut self) {
        log::trace!("clearing probing table of {} entries", self.size);
        self.buckets = Buckets::new(self.capacity());
        self.size = 0;
    }

    /// Rehash the live entries into at least `new_capacity` slots, rounded
    /// up to a prime. Tombstones are dropped.
    ///
    /// Silently does nothing when `new_capacity` is below [`len`](Self::len);
    /// see [`try_resize_table`](Self::try_resize_table) for the checked form.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if let Err(e) = self.try_resize_table(new_capacity) {
            log::trace!("ignoring resize of probing table: {e}");
        }
    }

    pub fn try_resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError> {
        if new_capacity < self.size {
            return Err(ResizeError::BelowSize {
                requested: new_capacity,
                len: self.size,
            });
        }
        rebuild(self, new_capacity);
        Ok(())
    }

    /// Cursor over live entries in slot order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: &self.buckets,
            index: 0,
        }
    }

    /// Owned copies of every live `(key, value)`, in slot order.
    pub fn keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter()
            .map(|(k, v)| (k.to_owned(), v.clone()))
            .collect()
    }
}

impl<V, F> Rebuild<V> for ProbingHashMap<V, F>
where
    F: Fn(&str) -> u64,
{
    fn take_live(&mut self, capacity: usize) -> Vec<(String, V)> {
        let old = std::mem::replace(&mut self.buckets, Buckets::new(capacity));
        self.size = 0;
        old.into_iter()
            .flatten()
            .filter(|e| !e.tombstone)
            .map(|e| (e.key, e.value))
            .collect()
    }

    fn reinsert(&mut self, key: String, value: V) {
        self.put(key, value);
    }
}

impl<V, F> Table<V> for ProbingHashMap<V, F>
where
    F: Fn(&str) -> u64,
{
    fn put(&mut self, key: String, value: V) {
        ProbingHashMap::put(self, key, value)
    }
    fn get(&self, key: &str) -> Option<&V> {
        ProbingHashMap::get(self, key)
    }
    fn contains_key(&self, key: &str) -> bool {
        ProbingHashMap::contains_key(self, key)
    }
    fn remove_key(&mut self, key: &str) -> bool {
        ProbingHashMap::remove(self, key)
    }
    fn len(&self) -> usize {
        self.size
    }
    fn capacity(&self) -> usize {
        ProbingHashMap::capacity(self)
    }
    fn empty_buckets(&self) -> usize {
        ProbingHashMap::empty_buckets(self)
    }
    fn clear(&mut self) {
        ProbingHashMap::clear(self)
    }
    fn resize_table(&mut self, new_capacity: usize) {
        ProbingHashMap::resize_table(self, new_capacity)
    }
    fn keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        ProbingHashMap::keys_and_values(self)
    }
}

/// Forward cursor over the live entries of a [`ProbingHashMap`].
///
/// Starts at slot 0 and skips vacant slots and tombstones. The borrow on the
/// table rules out mutation while iterating; a fresh cursor restarts from
/// the first slot.
pub struct Iter<'a, V> {
    slots: &'a Buckets<Option<Entry<V>>>,
    index: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let slots = self.slots;
        while let Some(slot) = slots.get(self.index) {
            self.index += 1;
            if let Some(e) = slot {
                if !e.tombstone {
                    return Some((e.key.as_str(), &e.value));
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.slots.len().saturating_sub(self.index)))
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

impl<'a, V, F> IntoIterator for &'a ProbingHashMap<V, F>
where
    F: Fn(&str) -> u64,
{
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Display, F> fmt::Display for ProbingHashMap<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.buckets.iter().enumerate() {
            match slot {
                None => writeln!(f, "{i}: None")?,
                Some(e) if e.tombstone => writeln!(f, "{i}: {}: {} (tombstone)", e.key, e.value)?,
                Some(e) => writeln!(f, "{i}: {}: {}", e.key, e.value)?,
            }
        }
        Ok(())
    }
}

impl<V: fmt::Debug, F> fmt::Debug for ProbingHashMap<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbingHashMap")
            .field("size", &self.size)
            .field("buckets", &self.buckets)
            .finish_non_exhaustive()
    }
}
