//! Summary panel model
//!
//! One block per scene entry: a header, the resolved number and its factors,
//! each with a layout-specific position label. Numbers are never abbreviated
//! here.

use num_bigint::BigInt;
use std::fmt;

use crate::layout::{spiral, CellAddress, Lattice, Layout};
use crate::numeric::Primality;
use crate::scene::{Scene, SelectionEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRole {
    Number(Primality),
    Factor,
}

/// A clickable number in the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryItem {
    pub value: BigInt,
    pub role: ItemRole,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryBlock {
    pub header: String,
    pub p: u64,
    pub number: SummaryItem,
    pub factors: Vec<SummaryItem>,
}

/// Position of `n` in the words of the layout.
pub fn position_label(lattice: &Lattice, n: &BigInt) -> String {
    let pos = lattice.position(n);
    match (lattice.layout, &pos.cell) {
        (Layout::Binary, CellAddress::Grid { col, row }) => {
            format!("Bits {}, Offset {}", row + 1, col)
        }
        (Layout::Ulam, _) => format!("Shell {}", spiral::ring(n) + 1),
        (Layout::Hexagon, CellAddress::Hex { ring, .. }) => format!("Shell {}", ring + 1),
        (_, CellAddress::Grid { col, row }) => format!("Row {}, Col {}", row + 1, col + 1),
        (_, CellAddress::Polar { ring, slot, .. }) => format!("Ring {}, Slot {}", ring, slot),
        (_, CellAddress::Hex { q, r, .. }) => format!("Q {}, R {}", q, r),
    }
}

fn block(entry: &SelectionEntry, lattice: &Lattice) -> SummaryBlock {
    SummaryBlock {
        header: format!("SEQUENCE: {}", entry.label),
        p: entry.p,
        number: SummaryItem {
            value: entry.value.clone(),
            role: ItemRole::Number(entry.primality),
            position: position_label(lattice, &entry.value),
        },
        factors: entry
            .factors
            .iter()
            .map(|f| SummaryItem {
                value: f.clone(),
                role: ItemRole::Factor,
                position: position_label(lattice, f),
            })
            .collect(),
    }
}

pub fn summarize(scene: &Scene, lattice: &Lattice) -> Vec<SummaryBlock> {
    scene.entries.iter().map(|e| block(e, lattice)).collect()
}

impl fmt::Display for SummaryBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        let primality = match self.number.role {
            ItemRole::Number(p) => p.label(),
            ItemRole::Factor => "",
        };
        writeln!(f, "  Number: {} ({})  {}", self.number.value, primality, self.number.position)?;
        for item in &self.factors {
            writeln!(f, "  Factor: {}  {}", item.value, item.position)?;
        }
        Ok(())
    }
}
