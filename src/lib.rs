//! prime-hashmap: string-keyed hash tables over prime-sized bucket arrays,
//! with two interchangeable collision strategies.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: two small tables with identical contracts whose only difference
//!   is how they resolve collisions, so each strategy's invariants can be
//!   checked side by side.
//! - Layers:
//!   - `prime`: capacity policy. Every capacity is the next prime at or
//!     above the request.
//!   - `Buckets<T>`: fixed-length slot array; replaced wholesale on resize
//!     and clear, never grown in place.
//!   - `ChainedHashMap<V, F>`: each slot is a chain of entries. Grows before
//!     an insert would bring the load factor to 1.0.
//!   - `ProbingHashMap<V, F>`: each slot holds at most one entry, found by
//!     quadratic probing. Removal leaves a tombstone. Grows before an insert
//!     would push the load factor past 0.5.
//!   - `Table<V>`: the shared contract both tables implement.
//!
//! Constraints
//! - Single-threaded; no interior mutability and no locking.
//! - Keys are `String`s; hashing is a caller-supplied `Fn(&str) -> u64`
//!   fixed at construction (`hash_fns` ships two reference functions).
//! - Lookups on absent keys return `None`/`false`; nothing here panics on
//!   ordinary misuse.
//! - Capacities are always prime and at least 2.
//!
//! Resizing
//! - Both tables resize through one routine: swap in an empty store of the
//!   target capacity, then re-put the old live entries in slot order. The
//!   re-puts go through the normal insert path, so a target that is too
//!   small for the contents keeps growing until the load bound holds.
//! - `ProbingHashMap::resize_table` refuses targets below `len()` without
//!   reporting; `try_resize_table` returns a `ResizeError` instead.
//! - Rebuilding drops tombstones.
//!
//! Iteration
//! - Iterators borrow the table, so mutation during iteration does not
//!   compile. Order is slot order (then chain order for chaining), not key
//!   order.
//!
//! Logging
//! - Growth and rebuilds are reported at `debug` through the `log` facade;
//!   clears and refused resizes at `trace`. No logger is installed here.

mod buckets;
pub mod chaining;
pub mod hash_fns;
pub mod mode;
pub mod open_addressing;
pub mod prime;
mod table;
mod table_proptest;

// Public surface
pub use chaining::ChainedHashMap;
pub use hash_fns::{hash_function_1, hash_function_2};
pub use mode::{find_mode, find_mode_with};
pub use open_addressing::ProbingHashMap;
pub use prime::{is_prime, next_prime};
pub use table::{HashFn, ResizeError, Table};
