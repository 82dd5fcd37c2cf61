//! Arbitrary-precision numeric utilities
//!
//! Everything that touches an index or a formula value goes through `BigInt`:
//! - Integer square root and bit length for the lattice mappings
//! - Primality and factorization (trial division, bounded)
//! - Formula parsing/evaluation for user expressions in `n`

pub mod formula;
pub mod primes;

pub use formula::{Formula, FormulaError};
pub use primes::{distinct_factors, primality, Primality, Sieve};

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

/// Largest magnitude handed to the screen transform. Anything beyond is far
/// off-canvas anyway, and keeping it finite avoids NaN in later arithmetic.
const FLOAT_LIMIT: f64 = 1e300;

/// Floor of the square root. Values below 2 are returned as-is, negatives map to 0.
pub fn isqrt(n: &BigInt) -> BigInt {
    if n.is_negative() {
        return BigInt::zero();
    }
    n.sqrt()
}

/// Number of bits needed to represent `n` (0 for zero).
pub fn bit_length(n: &BigInt) -> u64 {
    n.bits()
}

/// Lossy conversion for screen-space use. Saturates instead of overflowing.
pub fn to_f64(n: &BigInt) -> f64 {
    match n.to_f64() {
        Some(v) if v.is_finite() => v.clamp(-FLOAT_LIMIT, FLOAT_LIMIT),
        _ if n.is_negative() => -FLOAT_LIMIT,
        _ => FLOAT_LIMIT,
    }
}

/// Shorten long decimal strings to `head…tail` for on-canvas labels.
pub fn abbreviate(n: &BigInt, max_digits: usize) -> String {
    let s = n.to_string();
    let digits = s.trim_start_matches('-').len();
    if digits <= max_digits || max_digits < 4 {
        return s;
    }
    let keep = max_digits / 2;
    let sign = if n.is_negative() { "-" } else { "" };
    let body = s.trim_start_matches('-');
    format!("{}{}…{}", sign, &body[..keep], &body[body.len() - keep..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isqrt_small_values() {
        assert_eq!(isqrt(&BigInt::from(0)), BigInt::from(0));
        assert_eq!(isqrt(&BigInt::from(1)), BigInt::from(1));
        assert_eq!(isqrt(&BigInt::from(3)), BigInt::from(1));
        assert_eq!(isqrt(&BigInt::from(4)), BigInt::from(2));
        assert_eq!(isqrt(&BigInt::from(10)), BigInt::from(3));
        assert_eq!(isqrt(&BigInt::from(-9)), BigInt::from(0));
    }

    #[test]
    fn test_isqrt_perfect_squares_beyond_f64() {
        let root = BigInt::from(2).pow(80) + 12345;
        let square = &root * &root;
        assert_eq!(isqrt(&square), root);
        assert_eq!(isqrt(&(square - 1)), root - 1);
    }

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(&BigInt::from(0)), 0);
        assert_eq!(bit_length(&BigInt::from(1)), 1);
        assert_eq!(bit_length(&BigInt::from(8)), 4);
        assert_eq!(bit_length(&BigInt::from(255)), 8);
    }

    #[test]
    fn test_to_f64_saturates() {
        assert_eq!(to_f64(&BigInt::from(42)), 42.0);
        let huge = BigInt::from(2).pow(2000);
        assert_eq!(to_f64(&huge), FLOAT_LIMIT);
        assert_eq!(to_f64(&-huge), -FLOAT_LIMIT);
    }

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbreviate(&BigInt::from(2047), 12), "2047");
        let m127 = BigInt::from(2).pow(127) - 1;
        let short = abbreviate(&m127, 12);
        assert!(short.starts_with("170141"));
        assert!(short.ends_with("884727"));
        assert!(short.contains('…'));
    }
}
