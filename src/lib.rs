//! Prime Lattice
//!
//! Places integers on 2D lattices (binary rows, square spirals, hexagonal
//! rings, a modular clock) and marks numbers of the form 2^p ± 1 together
//! with their factors.

pub mod camera;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod gui;
pub mod layout;
pub mod logging;
pub mod numeric;
pub mod render;
pub mod scene;
pub mod stats;
