//! Square-lattice layouts growing in one quadrant: binary, serpentine, shell

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use super::LatticePosition;
use crate::numeric::{bit_length, isqrt};

/// Binary tree grid. Row is the bit length minus one, column the offset from
/// the row's leading power of two. Non-positive indices sit at the origin.
pub fn binary(n: &BigInt) -> LatticePosition {
    if !n.is_positive() {
        return LatticePosition::origin();
    }
    let row = bit_length(n) - 1;
    let col = n - (BigInt::one() << row);
    LatticePosition::grid(col, BigInt::from(row))
}

/// Boustrophedon walk over square shells. Shell `r` holds `2r + 1` indices
/// starting at `r^2 + 1`; even shells run along the row then up the column,
/// odd shells down the column then back along the row, so consecutive
/// indices are always neighbours.
pub fn serpentine(n: &BigInt) -> LatticePosition {
    if !n.is_positive() {
        return LatticePosition::origin();
    }
    let r = isqrt(&(n - 1));
    let rem: BigInt = n - &r * &r;
    let edge = &r + 1;

    let (col, row) = if (&r % 2u32).is_zero() {
        if rem <= edge {
            (rem - 1, r)
        } else {
            let back = &rem - &edge;
            (r.clone(), r - back)
        }
    } else if rem <= edge {
        (r, rem - 1)
    } else {
        let back = &rem - &edge;
        (&r - back, r)
    };
    LatticePosition::grid(col, row)
}

/// Square shells, each filled down its outer column and then back along its
/// outer row. Index 1 is the origin.
pub fn shell(n: &BigInt) -> LatticePosition {
    if n <= &BigInt::one() {
        return LatticePosition::origin();
    }
    let k = isqrt(&(n - 1));
    let offset: BigInt = n - &k * &k;
    let edge = &k + 1;

    if offset <= edge {
        LatticePosition::grid(k, offset - 1)
    } else {
        let back = offset - edge;
        LatticePosition::grid(&k - back, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CellAddress;

    fn cell(pos: LatticePosition) -> (i64, i64) {
        match pos.cell {
            CellAddress::Grid { col, row } => (
                i64::try_from(col).unwrap(),
                i64::try_from(row).unwrap(),
            ),
            other => panic!("expected grid cell, got {:?}", other),
        }
    }

    fn at(f: fn(&BigInt) -> LatticePosition, n: u64) -> (i64, i64) {
        cell(f(&BigInt::from(n)))
    }

    #[test]
    fn binary_rows_follow_powers_of_two() {
        for r in 0..40u32 {
            let low = BigInt::one() << r;
            let high: BigInt = (BigInt::one() << (r + 1)) - 1;
            assert_eq!(cell(binary(&low)), (0, r as i64));
            assert_eq!(cell(binary(&high)), ((1i64 << r) - 1, r as i64));
        }
    }

    #[test]
    fn binary_handles_huge_and_non_positive() {
        let big: BigInt = (BigInt::one() << 521u32) + 5;
        match binary(&big).cell {
            CellAddress::Grid { col, row } => {
                assert_eq!(col, BigInt::from(5));
                assert_eq!(row, BigInt::from(521));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cell(binary(&BigInt::from(0))), (0, 0));
        assert_eq!(cell(binary(&BigInt::from(-7))), (0, 0));
    }

    #[test]
    fn serpentine_first_shells() {
        let got: Vec<_> = (1..=9).map(|n| at(serpentine, n)).collect();
        assert_eq!(
            got,
            vec![(0, 0), (1, 0), (1, 1), (0, 1), (0, 2), (1, 2), (2, 2), (2, 1), (2, 0)]
        );
    }

    #[test]
    fn serpentine_consecutive_indices_are_adjacent() {
        for n in 1..5000u64 {
            let (a, b) = (at(serpentine, n), at(serpentine, n + 1));
            let dist = (a.0 - b.0).abs() + (a.1 - b.1).abs();
            assert_eq!(dist, 1, "indices {} and {} at {:?} {:?}", n, n + 1, a, b);
        }
    }

    #[test]
    fn serpentine_crosses_shell_boundary_at_perfect_squares() {
        for k in 1..200u64 {
            let (a, b) = (at(serpentine, k * k), at(serpentine, k * k + 1));
            let k = k as i64;
            // shell k-1 ends on an axis, shell k starts on the same axis one step out
            if (k - 1) % 2 == 0 {
                assert_eq!((a, b), ((k - 1, 0), (k, 0)));
            } else {
                assert_eq!((a, b), ((0, k - 1), (0, k)));
            }
        }
    }

    #[test]
    fn shell_first_shells() {
        let got: Vec<_> = (1..=9).map(|n| at(shell, n)).collect();
        assert_eq!(
            got,
            vec![(0, 0), (1, 0), (1, 1), (0, 1), (2, 0), (2, 1), (2, 2), (1, 2), (0, 2)]
        );
    }

    #[test]
    fn shell_restarts_each_square_at_the_top_of_its_column() {
        for k in 2..200u64 {
            let (a, b) = (at(shell, k * k), at(shell, k * k + 1));
            let k = k as i64;
            // k^2 closes shell k-1 at the row's far edge, k^2+1 opens shell k
            assert_eq!(a, (0, k - 1));
            assert_eq!(b, (k, 0));
        }
    }

    #[test]
    fn shell_corner_sits_on_diagonal() {
        for k in 1..100u64 {
            // offset k+1 within shell k is the corner
            let corner = at(shell, k * k + k + 1);
            assert_eq!(corner, (k as i64, k as i64));
        }
    }

    #[test]
    fn large_index_stays_exact() {
        // (10^20)^2 + 1 starts a new shell at column 10^20
        let k = BigInt::from(10u32).pow(20);
        let n: BigInt = &k * &k + 1;
        match shell(&n).cell {
            CellAddress::Grid { col, row } => {
                assert_eq!(col, k);
                assert!(row.is_zero());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
