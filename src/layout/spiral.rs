//! Ulam square spiral

use num_bigint::BigInt;
use num_traits::{One, Signed};

use super::LatticePosition;
use crate::numeric::isqrt;

/// Classic Ulam spiral centred on index 1.
///
/// Ring `k` ends at `(2k+1)^2` in its corner `(k, k)`. Walking back from that
/// corner the ring is split into four sides of length `2k`, each located by
/// comparing `n` against the running boundary `m`.
pub fn ulam(n: &BigInt) -> LatticePosition {
    if !n.is_positive() {
        return LatticePosition::origin();
    }
    let k: BigInt = (isqrt(&(n - 1)) + 1) / 2;
    let side: BigInt = &k * 2;
    let mut m: BigInt = (&side + 1) * (&side + 1);

    if n >= &(&m - &side) {
        return LatticePosition::grid(&k - (&m - n), k);
    }
    m -= &side;
    if n >= &(&m - &side) {
        return LatticePosition::grid(-&k, &k - (&m - n));
    }
    m -= &side;
    if n >= &(&m - &side) {
        return LatticePosition::grid(-&k + (&m - n), -k);
    }
    let col = k.clone();
    LatticePosition::grid(col, -k + (m - n - side))
}

/// Ring number (1 = the eight cells around the origin) of an index.
pub fn ring(n: &BigInt) -> BigInt {
    if n <= &BigInt::one() {
        return BigInt::from(0);
    }
    (isqrt(&(n - 1)) + 1) / 2
}
