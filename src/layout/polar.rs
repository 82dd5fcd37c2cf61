//! Modular "clock" layout
//!
//! Indices are dealt round a circle of `modulus` slots; every full turn moves
//! one ring outwards. Slot 1 points straight up.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::{CellAddress, LatticePosition};
use crate::numeric::to_f64;

/// Angle of a slot centre in radians, slot 1 at the top (screen y grows down).
pub fn slot_angle(slot: u32, modulus: u32) -> f64 {
    let modulus = modulus.max(1) as f64;
    (slot as f64 * 360.0 / modulus - 90.0).to_radians()
}

/// Angular width of one wedge in radians.
pub fn wedge_width(modulus: u32) -> f64 {
    std::f64::consts::TAU / modulus.max(1) as f64
}

/// Map an index onto the modular clock.
pub fn modular(n: &BigInt, modulus: u32) -> LatticePosition {
    let modulus = modulus.max(1);
    if !n.is_positive() {
        return LatticePosition {
            x: 0.0,
            y: 0.0,
            cell: CellAddress::Polar {
                ring: BigInt::zero(),
                slot: 0,
                angle: slot_angle(0, modulus),
            },
        };
    }

    let m = BigInt::from(modulus);
    let ring = n.div_ceil(&m);
    let slot = ((n - BigInt::one()).mod_floor(&m) + 1u32).to_u32().unwrap_or(1);
    let angle = slot_angle(slot, modulus);
    let radius = to_f64(&ring) - 0.5;

    LatticePosition {
        x: radius * angle.cos(),
        y: radius * angle.sin(),
        cell: CellAddress::Polar { ring, slot, angle },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polar(n: u64, modulus: u32) -> (u64, u32) {
        match modular(&BigInt::from(n), modulus).cell {
            CellAddress::Polar { ring, slot, .. } => (u64::try_from(ring).unwrap(), slot),
            other => panic!("expected polar cell, got {:?}", other),
        }
    }

    #[test]
    fn twelve_slot_clock() {
        assert_eq!(polar(1, 12), (1, 1));
        assert_eq!(polar(12, 12), (1, 12));
        assert_eq!(polar(13, 12), (2, 1));
        assert_eq!(polar(25, 12), (3, 1));
    }

    #[test]
    fn slot_angles_go_round_once() {
        // slot M lands at -90 + 360 degrees, i.e. straight up like slot 0
        let top = slot_angle(12, 12);
        assert!((top.cos()).abs() < 1e-9);
        assert!((top.sin() + 1.0).abs() < 1e-9);
        let quarter = slot_angle(3, 12);
        assert!(quarter.abs() < 1e-9);
    }

    #[test]
    fn radius_is_ring_minus_half() {
        for n in 1..=200u64 {
            let pos = modular(&BigInt::from(n), 7);
            let ring = n.div_ceil(7) as f64;
            assert!((pos.x.hypot(pos.y) - (ring - 0.5)).abs() < 1e-9);
        }
    }

    #[test]
    fn residues_share_a_spoke() {
        for n in 1..=100u64 {
            assert_eq!(polar(n, 12).1, polar(n + 12, 12).1);
        }
    }

    #[test]
    fn non_positive_is_origin() {
        let pos = modular(&BigInt::from(0), 12);
        assert_eq!((pos.x, pos.y), (0.0, 0.0));
    }
}
