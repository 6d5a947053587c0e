//! GUI data structures: geometry, controls and the control tree.
//!
//! - `geometry` contains rectangles, padding and the pixel-center rule
//! - `control` contains the control node, its widget trait and handler types
//! - `tree` holds the arena that owns every control and walks it

pub mod control;
pub mod geometry;
pub mod tree;
