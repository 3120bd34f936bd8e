//! Reference string hash functions.
//!
//! Both are deliberately weak (anagrams collide under `hash_function_1`),
//! which makes them useful for exercising collision handling.

/// Sum of the key's bytes.
pub fn hash_function_1(key: &str) -> u64 {
    key.bytes().fold(0u64, |acc, b| acc.wrapping_add(u64::from(b)))
}

/// Position-weighted byte sum: `sum((i + 1) * byte_i)`.
pub fn hash_function_2(key: &str) -> u64 {
    key.bytes().enumerate().fold(0u64, |acc, (i, b)| {
        acc.wrapping_add((i as u64 + 1).wrapping_mul(u64::from(b)))
    })
}
