//! Primality and factorization by bounded trial division
//!
//! Small values are answered from a sieve. Larger values are trial-divided
//! with a mod-6 wheel up to `TRIAL_LIMIT`; a value with no factor below the
//! bound is reported as `ProbablePrime`.

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use std::sync::LazyLock;

/// Values below this are answered by the sieve.
pub const SIEVE_LIMIT: usize = 10_000;

/// Trial divisors stop here.
pub const TRIAL_LIMIT: u64 = 1_000_000;

static SMALL_SIEVE: LazyLock<Sieve> = LazyLock::new(|| Sieve::new(SIEVE_LIMIT));

/// Outcome of a bounded primality test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primality {
    Prime,
    /// No divisor found below the trial bound
    ProbablePrime,
    Composite,
}

impl Primality {
    /// True for both prime states.
    pub fn is_prime(self) -> bool {
        !matches!(self, Primality::Composite)
    }

    pub fn label(self) -> &'static str {
        match self {
            Primality::Prime => "prime",
            Primality::ProbablePrime => "prime?",
            Primality::Composite => "composite",
        }
    }
}

/// Sieve of Eratosthenes over `0..limit`.
#[derive(Debug, Clone)]
pub struct Sieve {
    flags: Vec<bool>,
}

impl Sieve {
    pub fn new(limit: usize) -> Self {
        let mut flags = vec![true; limit.max(2)];
        flags[0] = false;
        flags[1] = false;
        let mut p = 2;
        while p * p < flags.len() {
            if flags[p] {
                let mut i = p * p;
                while i < flags.len() {
                    flags[i] = false;
                    i += p;
                }
            }
            p += 1;
        }
        Self { flags }
    }

    /// `None` when `n` is outside the sieve.
    pub fn is_prime(&self, n: u64) -> Option<bool> {
        usize::try_from(n).ok().and_then(|i| self.flags.get(i).copied())
    }
}

/// Primality of a small index, for background decoration.
pub fn is_small_prime(n: u64) -> bool {
    SMALL_SIEVE.is_prime(n).unwrap_or(false)
}

/// Bounded primality test.
pub fn primality(n: &BigInt) -> Primality {
    if n < &BigInt::from(2) {
        return Primality::Composite;
    }
    if let Some(small) = n.to_u64().and_then(|v| SMALL_SIEVE.is_prime(v)) {
        return if small { Primality::Prime } else { Primality::Composite };
    }
    if let Some(v) = n.to_u128() {
        return primality_u128(v);
    }

    let two = BigInt::from(2u32);
    let three = BigInt::from(3u32);
    if (n % &two).is_zero() || (n % &three).is_zero() {
        return Primality::Composite;
    }
    let mut d = 5u64;
    while d < TRIAL_LIMIT {
        let d_big = BigInt::from(d);
        if &d_big * &d_big > *n {
            return Primality::Prime;
        }
        if (n % d).is_zero() || (n % (d + 2)).is_zero() {
            return Primality::Composite;
        }
        d += 6;
    }
    Primality::ProbablePrime
}

fn primality_u128(v: u128) -> Primality {
    if v % 2 == 0 || v % 3 == 0 {
        return Primality::Composite;
    }
    let mut d = 5u128;
    while d < TRIAL_LIMIT as u128 {
        if d * d > v {
            return Primality::Prime;
        }
        if v % d == 0 || v % (d + 2) == 0 {
            return Primality::Composite;
        }
        d += 6;
    }
    Primality::ProbablePrime
}

/// Distinct prime factors in ascending order, found by trial division below
/// `TRIAL_LIMIT`. A cofactor left over after the bound is appended as-is.
/// Returns an empty list for values below 2 and for primes.
pub fn distinct_factors(n: &BigInt) -> Vec<BigInt> {
    let mut factors: Vec<BigInt> = Vec::new();
    if n < &BigInt::from(2) {
        return factors;
    }

    let mut rest = n.clone();
    let push = |f: BigInt, factors: &mut Vec<BigInt>| {
        if factors.last() != Some(&f) {
            factors.push(f);
        }
    };

    for small in [2u64, 3] {
        while (&rest % small).is_zero() {
            push(BigInt::from(small), &mut factors);
            rest /= small;
        }
    }

    let mut d = 5u64;
    while d < TRIAL_LIMIT {
        let d_big = BigInt::from(d);
        if &d_big * &d_big > rest {
            break;
        }
        for step in [d, d + 2] {
            while (&rest % step).is_zero() {
                push(BigInt::from(step), &mut factors);
                rest /= step;
            }
        }
        d += 6;
    }

    if rest > BigInt::one() && rest != *n {
        push(rest, &mut factors);
    }
    factors
}
