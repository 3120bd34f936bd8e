//! ChainedHashMap: separate chaining over a prime-sized bucket array.

use crate::buckets::Buckets;
use crate::prime::next_prime;
use crate::table::{rebuild, HashFn, Rebuild, Table};
use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<V> {
    key: String,
    value: V,
}

/// Hash table resolving collisions by chaining entries within a slot.
///
/// Each slot holds a list of entries in insertion order. The table grows to
/// twice its capacity (rounded up to a prime) before an insertion that would
/// bring the load factor to [`Self::MAX_LOAD`].
pub struct ChainedHashMap<V, F = HashFn> {
    buckets: Buckets<Vec<Entry<V>>>,
    size: usize,
    hash_fn: F,
}

impl<V, F> ChainedHashMap<V, F>
where
    F: Fn(&str) -> u64,
{
    /// Load factor the table never reaches after a `put`.
    pub const MAX_LOAD: f64 = 1.0;

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

    /// Number of slots whose chain is empty.
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.is_empty()).count()
    }

    fn slot_of(&self, key: &str) -> usize {
        ((self.hash_fn)(key) % self.capacity() as u64) as usize
    }

    /// Insert `key`, or replace its value when already present.
    ///
    /// Replacing moves the entry to the end of its chain and never grows the
    /// table.
    pub fn put<K: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let i = self.slot_of(&key);
        let chain = &mut self.buckets[i];
        if let Some(pos) = chain.iter().position(|e| e.key == key) {
            chain.remove(pos);
            chain.push(Entry { key, value });
            return;
        }

        if (self.size + 1) as f64 / self.capacity() as f64 >= Self::MAX_LOAD {
            let doubled = self.capacity() * 2;
            log::debug!(
                "chained table at {}/{} slots, growing to {}",
                self.size,
                self.capacity(),
                doubled
            );
            self.resize_table(doubled);
        }

        let i = self.slot_of(&key);
        self.buckets[i].push(Entry { key, value });
        self.size += 1;
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.buckets[self.slot_of(key)]
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let i = self.slot_of(key);
        self.buckets[i]
            .iter_mut()
            .find(|e| e.key == key)
            .map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key`, returning its value. Absent keys leave the table untouched.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let i = self.slot_of(key);
        let chain = &mut self.buckets[i];
        let pos = chain.iter().position(|e| e.key == key)?;
        self.size -= 1;
        Some(chain.remove(pos).value)
    }

    /// Drop every entry, keeping the capacity.
    pub fn clear(&mut self) {
        log::trace!("clearing chained table of {} entries", self.size);
        self.buckets = Buckets::new(self.capacity());
        self.size = 0;
    }

    /// Rehash into at least `new_capacity` slots, rounded up to a prime.
    ///
    /// A zero target is ignored. Entries are re-put in slot order, so a
    /// target too small for the current contents keeps growing as usual.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < 1 {
            log::trace!("ignoring resize of chained table to 0 slots");
            return;
        }
        rebuild(self, new_capacity);
    }

    /// Iterate `(key, value)` in slot order, then chain order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.buckets.iter().flatten(),
            remaining: self.size,
        }
    }

    /// Owned copies of every `(key, value)`, in [`iter`](Self::iter) order.
    pub fn keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter()
            .map(|(k, v)| (k.to_owned(), v.clone()))
            .collect()
    }
}

impl<V, F> Rebuild<V> for ChainedHashMap<V, F>
where
    F: Fn(&str) -> u64,
{
    fn take_live(&mut self, capacity: usize) -> Vec<(String, V)> {
        let old = std::mem::replace(&mut self.buckets, Buckets::new(capacity));
        self.size = 0;
        old.into_iter()
            .flatten()
            .map(|e| (e.key, e.value))
            .collect()
    }

    fn reinsert(&mut self, key: String, value: V) {
        self.put(key, value);
    }
}

impl<V, F> Table<V> for ChainedHashMap<V, F>
where
    F: Fn(&str) -> u64,
{
    fn put(&mut self, key: String, value: V) {
        ChainedHashMap::put(self, key, value)
    }
    fn get(&self, key: &str) -> Option<&V> {
        ChainedHashMap::get(self, key)
    }
    fn remove_key(&mut self, key: &str) -> bool {
        ChainedHashMap::remove(self, key).is_some()
    }
    fn len(&self) -> usize {
        self.size
    }
    fn capacity(&self) -> usize {
        ChainedHashMap::capacity(self)
    }
    fn empty_buckets(&self) -> usize {
        ChainedHashMap::empty_buckets(self)
    }
    fn clear(&mut self) {
        ChainedHashMap::clear(self)
    }
    fn resize_table(&mut self, new_capacity: usize) {
        ChainedHashMap::resize_table(self, new_capacity)
    }
    fn keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        ChainedHashMap::keys_and_values(self)
    }
}

/// Iterator over the entries of a [`ChainedHashMap`].
pub struct Iter<'a, V> {
    it: core::iter::Flatten<core::slice::Iter<'a, Vec<Entry<V>>>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.it.next()?;
        self.remaining -= 1;
        Some((e.key.as_str(), &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V, F> IntoIterator for &'a ChainedHashMap<V, F>
where
    F: Fn(&str) -> u64,
{
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Display, F> fmt::Display for ChainedHashMap<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chain) in self.buckets.iter().enumerate() {
            write!(f, "{i}: [")?;
            for (j, e) in chain.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: {}", e.key, e.value)?;
            }
            f.write_str("]\n")?;
        }
        Ok(())
    }
}

impl<V: fmt::Debug, F> fmt::Debug for ChainedHashMap<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedHashMap")
            .field("size", &self.size)
            .field("buckets", &self.buckets)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_fns::{hash_function_1, hash_function_2};
    use crate::prime::is_prime;

    fn constant_hash(_: &str) -> u64 {
        0
    }

    /// Invariant: requested capacity rounds up to a prime at construction.
    #[test]
    fn new_rounds_capacity_to_prime() {
        let m: ChainedHashMap<i32> = ChainedHashMap::new(4, hash_function_1 as HashFn);
        assert_eq!(m.capacity(), 5);
        assert_eq!(m.len(), 0);
        assert!(m.is_empty());
        assert_eq!(m.empty_buckets(), 5);
        assert_eq!(m.table_load(), 0.0);
    }

    /// Five distinct keys into 5 slots: the fifth insert would bring the load
    /// to 1.0, so the table grows to next_prime(10) = 11 first.
    #[test]
    fn fifth_insert_grows_to_eleven() {
        let mut m = ChainedHashMap::new(4, hash_function_1);
        for (i, k) in ["a", "b", "c", "d"].iter().enumerate() {
            m.put(*k, i);
        }
        assert_eq!(m.capacity(), 5);
        m.put("e", 4);
        assert_eq!(m.len(), 5);
        assert_eq!(m.capacity(), 11);
        assert!(m.table_load() < 1.0);
    }

    /// Invariant: putting an existing key replaces the value without
    /// changing the size.
    #[test]
    fn put_existing_key_updates() {
        let mut m = ChainedHashMap::new(101, hash_function_1);
        m.put("key1", 10);
        m.put("key2", 20);
        m.put("key1", 30);
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("key1"), Some(&30));
        assert_eq!(m.get("key2"), Some(&20));
        assert!((m.table_load() - 2.0 / 101.0).abs() < f64::EPSILON);
    }

    /// An update on a table one insert short of growing leaves the capacity
    /// alone; only a new key triggers the resize.
    #[test]
    fn update_at_threshold_does_not_grow() {
        let mut m = ChainedHashMap::new(5, hash_function_1);
        for (i, k) in ["a", "b", "c", "d"].iter().enumerate() {
            m.put(*k, i);
        }
        m.put("a", 2);
        assert_eq!(m.capacity(), 5);
        assert_eq!(m.len(), 4);
        assert_eq!(m.get("a"), Some(&2));

        m.put("e", 4);
        assert_eq!(m.capacity(), 11);
    }

    /// Updated entries move to the end of their chain.
    #[test]
    fn update_moves_entry_to_chain_tail() {
        let mut m = ChainedHashMap::new(7, constant_hash);
        m.put("a", 1);
        m.put("b", 2);
        m.put("a", 3);
        let kv = m.keys_and_values();
        assert_eq!(kv, vec![("b".to_string(), 2), ("a".to_string(), 3)]);
    }

    #[test]
    fn remove_present_and_absent() {
        let mut m = ChainedHashMap::new(53, hash_function_1);
        assert_eq!(m.get("key1"), None);
        m.put("key1", 10);
        assert_eq!(m.get("key1"), Some(&10));
        assert_eq!(m.remove("key1"), Some(10));
        assert_eq!(m.get("key1"), None);
        assert_eq!(m.len(), 0);
        assert_eq!(m.remove("key4"), None);
        assert_eq!(m.len(), 0);
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut m = ChainedHashMap::new(11, hash_function_2);
        m.put("count", 1);
        if let Some(v) = m.get_mut("count") {
            *v += 41;
        }
        assert_eq!(m.get("count"), Some(&42));
        assert!(m.get_mut("missing").is_none());
    }

    /// Invariant: clear empties every slot and keeps the capacity.
    #[test]
    fn clear_keeps_capacity() {
        let mut m = ChainedHashMap::new(53, hash_function_1);
        m.put("key1", 10);
        m.put("key2", 20);
        m.resize_table(100);
        assert_eq!(m.capacity(), 101);
        m.clear();
        assert_eq!(m.len(), 0);
        assert_eq!(m.capacity(), 101);
        assert_eq!(m.empty_buckets(), 101);
        assert!(!m.contains_key("key1"));
    }

    /// Invariant: resize keeps every live entry and the size, and the new
    /// capacity is prime.
    #[test]
    fn resize_preserves_contents() {
        let mut m = ChainedHashMap::new(79, hash_function_2);
        let keys: Vec<usize> = (1..1000).step_by(13).collect();
        for &k in &keys {
            m.put(k.to_string(), k * 42);
        }
        let size = m.len();
        for capacity in (111..1000).step_by(117) {
            m.resize_table(capacity);
            assert!(is_prime(m.capacity()));
            assert!(m.capacity() >= capacity);
            assert_eq!(m.len(), size);
            for &k in &keys {
                assert_eq!(m.get(&k.to_string()), Some(&(k * 42)));
                assert!(!m.contains_key(&(k + 1).to_string()));
            }
        }
    }

    /// A target smaller than the contents still ends below the load ceiling,
    /// because re-put grows the table as needed.
    #[test]
    fn resize_below_size_regrows() {
        let mut m = ChainedHashMap::new(11, hash_function_2);
        for i in 1..6 {
            m.put(i.to_string(), i * 10);
        }
        m.put("20", 200);
        m.remove("1");
        m.resize_table(2);
        assert_eq!(m.len(), 5);
        assert!(m.table_load() < 1.0);
        assert!(is_prime(m.capacity()));
        for i in 2..6 {
            assert_eq!(m.get(&i.to_string()), Some(&(i * 10)));
        }
        assert_eq!(m.get("20"), Some(&200));
    }

    #[test]
    fn resize_to_zero_is_ignored() {
        let mut m = ChainedHashMap::new(7, hash_function_1);
        m.put("a", 1);
        m.resize_table(0);
        assert_eq!(m.capacity(), 7);
        assert_eq!(m.get("a"), Some(&1));
    }

    /// Invariant: all keys in one chain remain individually addressable.
    #[test]
    fn collisions_share_a_chain() {
        let mut m = ChainedHashMap::new(31, constant_hash);
        for i in 0..10 {
            m.put(format!("k{i}"), i);
        }
        assert_eq!(m.len(), 10);
        assert_eq!(m.empty_buckets(), m.capacity() - 1);
        for i in 0..10 {
            assert_eq!(m.get(&format!("k{i}")), Some(&i));
        }
        assert_eq!(m.remove("k5"), Some(5));
        assert!(!m.contains_key("k5"));
        assert_eq!(m.len(), 9);
    }

    /// Iteration order is slot order, then chain order, and covers `len`
    /// entries.
    #[test]
    fn iter_matches_keys_and_values() {
        let mut m = ChainedHashMap::new(11, hash_function_1);
        for i in 0..8 {
            m.put(format!("str{i}"), i);
        }
        let it = m.iter();
        assert_eq!(it.len(), 8);
        let from_iter: Vec<(String, i32)> =
            it.map(|(k, v)| (k.to_string(), *v)).collect();
        assert_eq!(from_iter, m.keys_and_values());

        let slots: Vec<usize> = from_iter.iter().map(|(k, _)| m.slot_of(k)).collect();
        assert!(slots.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn display_lists_every_slot() {
        let mut m = ChainedHashMap::new(3, constant_hash);
        m.put("a", 1);
        m.put("b", 2);
        assert_eq!(m.to_string(), "0: [a: 1, b: 2]\n1: []\n2: []\n");
    }
}
