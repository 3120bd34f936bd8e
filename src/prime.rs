//! Capacity policy: every table capacity is prime.

/// Returns `true` when `n` is prime.
///
/// Trial division by odd factors up to `sqrt(n)`.
pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 {
        return false;
    }

    let mut factor = 3;
    while factor <= n / factor {
        if n % factor == 0 {
            return false;
        }
        factor += 2;
    }
    true
}

/// Smallest prime `>= n`.
///
/// Primes come back unmodified. Otherwise an even `n` is bumped to the next
/// odd number and the search walks upward over odd candidates only, so the
/// result is never an even number `>= 4`.
pub fn next_prime(n: usize) -> usize {
    if is_prime(n) {
        return n;
    }

    let mut candidate = if n % 2 == 0 { n + 1 } else { n };
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}
