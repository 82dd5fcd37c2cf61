//! Clickable marker regions, rebuilt every frame

use egui::Pos2;
use num_bigint::BigInt;

use crate::layout::Lattice;

#[derive(Debug, Clone, PartialEq)]
pub struct HitBox {
    pub value: BigInt,
    pub anchor: Pos2,
    pub radius: f32,
    /// Coordinate function that placed the marker
    pub lattice: Lattice,
}

impl HitBox {
    /// Square test: each axis is checked on its own.
    pub fn contains(&self, point: Pos2) -> bool {
        (point.x - self.anchor.x).abs() < self.radius && (point.y - self.anchor.y).abs() < self.radius
    }
}

#[derive(Debug, Clone, Default)]
pub struct HitRegistry {
    boxes: Vec<HitBox>,
}

impl HitRegistry {
    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    pub fn register(&mut self, hit: HitBox) {
        self.boxes.push(hit);
    }

    /// First box containing the point, in registration order.
    pub fn resolve(&self, point: Pos2) -> Option<&HitBox> {
        self.boxes.iter().find(|b| b.contains(point))
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HitBox> {
        self.boxes.iter()
    }
}
