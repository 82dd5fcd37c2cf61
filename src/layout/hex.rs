//! Hexagonal rings in axial coordinates
//!
//! Ring 0 is the single origin cell (index 1). Ring `r > 0` holds `6r` cells,
//! so the last index of ring `r` is `1 + 3r(r+1)`. Each ring is walked along
//! its six edges starting from the corner `(0, -r)`.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

use super::{CellAddress, LatticePosition};
use crate::numeric::{isqrt, to_f64};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Edge directions, one per side of the ring.
const DIRECTIONS: [(i64, i64); 6] = [(1, 0), (0, 1), (-1, 1), (-1, 0), (0, -1), (1, -1)];

/// Corner at the start of each edge, in units of the ring number.
const CORNERS: [(i64, i64); 6] = [(0, -1), (1, -1), (1, 0), (0, 1), (-1, 1), (-1, 0)];

/// Total cells through ring `r` inclusive.
pub fn cells_through(ring: &BigInt) -> BigInt {
    ring * (ring + 1) * 3 + 1
}

/// Ring holding index `n` (1-based indices; anything below 2 is ring 0).
pub fn ring_of(n: &BigInt) -> BigInt {
    if n <= &BigInt::one() {
        return BigInt::zero();
    }
    // Positive root of 3r^2 + 3r + 1 = n, floored, then nudged up to the
    // first ring whose cumulative count reaches n.
    let disc: BigInt = n * 12 - 3;
    let mut ring: BigInt = (isqrt(&disc) - 3) / 6;
    while &cells_through(&ring) < n {
        ring += 1;
    }
    ring
}

/// Axial-to-Cartesian conversion for pointy-top hexagons of unit radius.
pub fn axial_to_cartesian(q: f64, r: f64) -> (f64, f64) {
    (SQRT_3 * q + SQRT_3 / 2.0 * r, 1.5 * r)
}

/// Map an index onto the hexagonal ring spiral.
pub fn hexagon(n: &BigInt) -> LatticePosition {
    if n <= &BigInt::one() {
        return LatticePosition {
            x: 0.0,
            y: 0.0,
            cell: CellAddress::Hex {
                q: BigInt::zero(),
                r: BigInt::zero(),
                ring: BigInt::zero(),
            },
        };
    }

    let ring = ring_of(n);
    let offset: BigInt = n - cells_through(&(&ring - 1)) - 1;
    let (side, steps) = offset.div_rem(&ring);
    // side is in 0..6 because offset < 6 * ring
    let side = side.to_usize().unwrap_or(0).min(5);

    let (cq, cr) = CORNERS[side];
    let (dq, dr) = DIRECTIONS[side];
    let q: BigInt = &ring * cq + &steps * dq;
    let r: BigInt = &ring * cr + &steps * dr;

    let (x, y) = axial_to_cartesian(to_f64(&q), to_f64(&r));
    LatticePosition {
        x,
        y,
        cell: CellAddress::Hex { q, r, ring },
    }
}
