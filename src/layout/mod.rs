//! Lattice layouts - index to 2D position mappings
//!
//! Each layout is a bijection from positive integers onto lattice cells:
//! - Binary: row = bit length - 1, column = offset from the row's power of two
//! - Ulam: classic square spiral around the origin
//! - Serpentine: boustrophedon walk over square shells in one quadrant
//! - Shell: square shells, always traversed column-then-row
//! - Hexagon: hexagonal rings in axial coordinates
//! - Modular: polar "clock" with `modulus` slots per ring
//!
//! All mappings take `BigInt` indices. Floating point only appears in the
//! Cartesian output of the hexagon and polar layouts.

pub mod grid;
pub mod hex;
pub mod polar;
pub mod spiral;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::numeric;

/// Default slot count of the modular layout.
pub const DEFAULT_MODULUS: u32 = 12;

/// Accepted modulus range.
pub const MODULUS_RANGE: std::ops::RangeInclusive<u32> = 2..=360;

/// Exact lattice address of a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellAddress {
    /// Square lattice cell (binary, Ulam, serpentine, shell)
    Grid { col: BigInt, row: BigInt },
    /// Axial hex coordinates plus ring number (0 = origin)
    Hex { q: BigInt, r: BigInt, ring: BigInt },
    /// Ring (1-based), slot (1..=modulus) and angle in radians
    Polar { ring: BigInt, slot: u32, angle: f64 },
}

impl CellAddress {
    /// Exact identity of the cell, used for uniqueness checks.
    pub fn key(&self) -> (BigInt, BigInt) {
        match self {
            CellAddress::Grid { col, row } => (col.clone(), row.clone()),
            CellAddress::Hex { q, r, .. } => (q.clone(), r.clone()),
            CellAddress::Polar { ring, slot, .. } => (ring.clone(), BigInt::from(*slot)),
        }
    }
}

impl std::fmt::Display for CellAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellAddress::Grid { col, row } => write!(f, "col {}, row {}", col, row),
            CellAddress::Hex { q, r, ring } => write!(f, "q {}, r {} (ring {})", q, r, ring),
            CellAddress::Polar { ring, slot, angle } => {
                write!(f, "ring {}, slot {} ({:.1} deg)", ring, slot, angle.to_degrees())
            }
        }
    }
}

/// Position of an index in layout-local units, before the camera transform.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticePosition {
    pub x: f64,
    pub y: f64,
    pub cell: CellAddress,
}

impl LatticePosition {
    /// Square-lattice cell; x/y follow column/row.
    pub fn grid(col: BigInt, row: BigInt) -> Self {
        Self {
            x: numeric::to_f64(&col),
            y: numeric::to_f64(&row),
            cell: CellAddress::Grid { col, row },
        }
    }

    pub fn origin() -> Self {
        Self::grid(BigInt::from(0), BigInt::from(0))
    }
}

/// Supported lattice layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Binary,
    Ulam,
    Serpentine,
    Shell,
    Hexagon,
    Modular,
}

/// How the background draws one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellShape {
    Square,
    Hexagon,
    Wedge,
}

/// Where the camera puts the lattice origin on recentre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Origin-symmetric layouts sit at the canvas centre
    Center,
    /// One-quadrant layouts sit at a fixed inset from the top-left corner
    TopLeftInset,
}

/// Per-layout data consulted by camera, renderer and controller.
#[derive(Debug)]
pub struct LayoutSpec {
    pub layout: Layout,
    pub key: &'static str,
    pub name: &'static str,
    pub shape: CellShape,
    pub anchor: Anchor,
    pub default_zoom: f32,
    /// Canvas width divided by this is the unzoomed pixel size of one
    /// lattice unit.
    pub step_divisor: f32,
    /// Whether connector lines start at the true canvas-space centre instead
    /// of the position of index 1.
    pub lines_from_center: bool,
    /// Whether the constant marker at index 1 is drawn.
    pub origin_marker: bool,
}

/// 2.5 times the integer square root of 10.
const SPIRAL_STEP_DIVISOR: f32 = 7.5;

static SPECS: [LayoutSpec; 6] = [
    LayoutSpec {
        layout: Layout::Binary,
        key: "binary",
        name: "Binary tree",
        shape: CellShape::Square,
        anchor: Anchor::TopLeftInset,
        default_zoom: 1.2,
        step_divisor: 40.0,
        lines_from_center: false,
        origin_marker: true,
    },
    LayoutSpec {
        layout: Layout::Ulam,
        key: "ulam",
        name: "Ulam spiral",
        shape: CellShape::Square,
        anchor: Anchor::Center,
        default_zoom: 0.3,
        step_divisor: SPIRAL_STEP_DIVISOR,
        lines_from_center: false,
        origin_marker: true,
    },
    LayoutSpec {
        layout: Layout::Serpentine,
        key: "serpentine",
        name: "Serpentine grid",
        shape: CellShape::Square,
        anchor: Anchor::TopLeftInset,
        default_zoom: 0.3,
        step_divisor: SPIRAL_STEP_DIVISOR,
        lines_from_center: false,
        origin_marker: true,
    },
    LayoutSpec {
        layout: Layout::Shell,
        key: "shell",
        name: "Square shells",
        shape: CellShape::Square,
        anchor: Anchor::TopLeftInset,
        default_zoom: 0.3,
        step_divisor: SPIRAL_STEP_DIVISOR,
        lines_from_center: false,
        origin_marker: true,
    },
    LayoutSpec {
        layout: Layout::Hexagon,
        key: "hexagon",
        name: "Hexagonal rings",
        shape: CellShape::Hexagon,
        anchor: Anchor::Center,
        default_zoom: 0.3,
        step_divisor: SPIRAL_STEP_DIVISOR,
        lines_from_center: false,
        origin_marker: true,
    },
    LayoutSpec {
        layout: Layout::Modular,
        key: "modular",
        name: "Modular clock",
        shape: CellShape::Wedge,
        anchor: Anchor::Center,
        default_zoom: 0.3,
        step_divisor: SPIRAL_STEP_DIVISOR,
        lines_from_center: true,
        origin_marker: false,
    },
];

impl Layout {
    pub const ALL: [Layout; 6] = [
        Layout::Binary,
        Layout::Ulam,
        Layout::Serpentine,
        Layout::Shell,
        Layout::Hexagon,
        Layout::Modular,
    ];

    pub fn spec(self) -> &'static LayoutSpec {
        // SPECS is ordered like the enum
        &SPECS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Look up a layout by key. Unknown keys fall back to the Ulam spiral so a
    /// renderer always has a usable mapping.
    pub fn from_key(key: &str) -> Layout {
        let key = key.trim().to_ascii_lowercase();
        let alias = match key.as_str() {
            "mod12" | "polar" | "clock" => "modular",
            "hex" => "hexagon",
            "spiral" => "ulam",
            other => other,
        };
        match SPECS.iter().find(|s| s.key == alias) {
            Some(spec) => spec.layout,
            None => {
                tracing::warn!(key = %key, "Unknown layout, falling back to Ulam spiral");
                Layout::Ulam
            }
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A layout bound to its parameters - the coordinate function of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lattice {
    pub layout: Layout,
    pub modulus: u32,
}

impl Lattice {
    pub fn new(layout: Layout, modulus: u32) -> Self {
        Self {
            layout,
            modulus: modulus.clamp(*MODULUS_RANGE.start(), *MODULUS_RANGE.end()),
        }
    }

    pub fn spec(&self) -> &'static LayoutSpec {
        self.layout.spec()
    }

    /// Map an index to its lattice position.
    pub fn position(&self, n: &BigInt) -> LatticePosition {
        match self.layout {
            Layout::Binary => grid::binary(n),
            Layout::Ulam => spiral::ulam(n),
            Layout::Serpentine => grid::serpentine(n),
            Layout::Shell => grid::shell(n),
            Layout::Hexagon => hex::hexagon(n),
            Layout::Modular => polar::modular(n, self.modulus),
        }
    }

    /// Convenience for small indices.
    pub fn position_of(&self, n: u64) -> LatticePosition {
        self.position(&BigInt::from(n))
    }
}

impl Default for Lattice {
    fn default() -> Self {
        Self::new(Layout::Ulam, DEFAULT_MODULUS)
    }
}
