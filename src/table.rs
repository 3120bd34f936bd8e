//! Contract shared by both table variants, plus the rebuild routine they
//! use to resize.

use crate::prime::next_prime;
use thiserror::Error;

/// Plain function-pointer hash used as the default hash type parameter.
pub type HashFn = fn(&str) -> u64;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeError {
    /// The target cannot hold the live entries.
    #[error("cannot resize to {requested} slots while holding {len} live entries")]
    BelowSize { requested: usize, len: usize },
}

/// Operations common to [`ChainedHashMap`](crate::ChainedHashMap) and
/// [`ProbingHashMap`](crate::ProbingHashMap).
///
/// Both tables also expose these as inherent methods; the trait exists so
/// callers (and tests) can be written once against either collision
/// strategy.
pub trait Table<V> {
    /// Insert or overwrite `key`.
    fn put(&mut self, key: String, value: V);

    fn get(&self, key: &str) -> Option<&V>;

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key`, returning whether a live entry was removed.
    fn remove_key(&mut self, key: &str) -> bool;

    /// Number of live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots. Always prime.
    fn capacity(&self) -> usize;

    fn table_load(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    fn empty_buckets(&self) -> usize;

    fn clear(&mut self);

    fn resize_table(&mut self, new_capacity: usize);

    /// Owned `(key, value)` pairs in slot order.
    fn keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone;
}

/// Hooks for [`rebuild`].
pub(crate) trait Rebuild<V> {
    /// Replace the backing store with `capacity` empty slots, reset the
    /// size, and hand back the live entries of the old store in slot order.
    fn take_live(&mut self, capacity: usize) -> Vec<(String, V)>;

    /// Ordinary insertion against the new store. May grow it again.
    fn reinsert(&mut self, key: String, value: V);
}

/// Rehash every live entry of `table` into a fresh store of at least
/// `capacity` slots, rounded up to a prime.
pub(crate) fn rebuild<V, T>(table: &mut T, capacity: usize)
where
    T: Rebuild<V>,
{
    let capacity = next_prime(capacity);
    let live = table.take_live(capacity);
    log::debug!(
        "rebuilding table into {} slots with {} live entries",
        capacity,
        live.len()
    );
    for (key, value) in live {
        table.reinsert(key, value);
    }
}
