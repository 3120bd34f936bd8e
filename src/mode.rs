//! Mode finder: most frequent element(s) of a sequence, counted in a table.

use crate::chaining::ChainedHashMap;
use crate::hash_fns::hash_function_2;
use crate::table::Table;

/// Most frequent element(s) of `items` and their frequency.
///
/// Ties are reported in the order each element first reached the winning
/// count. An empty input yields `(vec![], 0)`.
pub fn find_mode<S: AsRef<str>>(items: &[S]) -> (Vec<String>, usize) {
    let mut counts = ChainedHashMap::new(items.len(), hash_function_2);
    find_mode_with(&mut counts, items)
}

/// [`find_mode`] over a caller-supplied counting table.
///
/// The table is used as-is, so existing counts participate.
pub fn find_mode_with<T, S>(counts: &mut T, items: &[S]) -> (Vec<String>, usize)
where
    T: Table<usize>,
    S: AsRef<str>,
{
    let mut modes = Vec::new();
    let mut frequency = 0;

    for item in items {
        let key = item.as_ref();
        let count = counts.get(key).copied().unwrap_or(0) + 1;
        counts.put(key.to_owned(), count);

        if count > frequency {
            modes.clear();
            modes.push(key.to_owned());
            frequency = count;
        } else if count == frequency {
            modes.push(key.to_owned());
        }
    }

    (modes, frequency)
}
