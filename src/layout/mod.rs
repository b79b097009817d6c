//! Dense 3-D layouts and per-layer canvas geometry.

pub mod planner;
pub mod slicer;

pub use planner::{plan, LayerGeometry};
pub use slicer::{slice, LayerSlice, Layout3D};
