//! Buckets: the fixed-length slot array behind both table variants.

use core::ops::{Index, IndexMut};

/// A fixed-length sequence of slots indexed `0..len`.
///
/// The length never changes after construction; tables that need a different
/// capacity build a fresh `Buckets` and drop the old one.
#[derive(Debug, Clone)]
pub(crate) struct Buckets<T> {
    slots: Box<[T]>,
}

impl<T: Default> Buckets<T> {
    /// `len` slots, each holding `T::default()`.
    pub(crate) fn new(len: usize) -> Self {
        Self::from_fn(len, |_| T::default())
    }
}

impl<T> Buckets<T> {
    pub(crate) fn from_fn<F>(len: usize, f: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        Self {
            slots: (0..len).map(f).collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, T> {
        self.slots.iter()
    }
}

impl<T> Index<usize> for Buckets<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.slots[index]
    }
}

impl<T> IndexMut<usize> for Buckets<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.slots[index]
    }
}

impl<T> IntoIterator for Buckets<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_vec().into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Buckets<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Buckets;

    #[test]
    fn new_fills_with_default() {
        let b: Buckets<Option<u32>> = Buckets::new(7);
        assert_eq!(b.len(), 7);
        assert!(b.iter().all(Option::is_none));
    }

    #[test]
    fn index_and_mutate() {
        let mut b: Buckets<Vec<u32>> = Buckets::new(3);
        b[1].push(10);
        b[1].push(11);
        b[2].push(20);
        assert_eq!(b[0], Vec::<u32>::new());
        assert_eq!(b[1], vec![10, 11]);
        assert_eq!(b.get(2), Some(&vec![20]));
        assert_eq!(b.get(3), None);
    }

    /// Invariant: consuming iteration yields slots in index order.
    #[test]
    fn into_iter_in_slot_order() {
        let b = Buckets::from_fn(5, |i| i * 10);
        let v: Vec<usize> = b.into_iter().collect();
        assert_eq!(v, vec![0, 10, 20, 30, 40]);
    }

    #[test]
    fn zero_length() {
        let b: Buckets<Option<u8>> = Buckets::new(0);
        assert_eq!(b.len(), 0);
        assert_eq!(b.iter().count(), 0);
    }
}
