//! flow-gui
//!
//! A retained-mode GUI core for hobby game engines. Controls form a tree
//! hanging off a stack of layers; the engine propagates clip rectangles,
//! hit-tests the pointer, bubbles pointer events from the hovered control up
//! to its layer and drives per-frame update and paint passes. A node-graph
//! editor panel is built on top of it.
//!
//! High-level modules
//! - `context`: host-window trait, winit host and configuration
//! - `data_structures`: geometry, controls and the control tree
//! - `editor`: node-graph editor panel and its widgets
//! - `engine`: layers, input dispatch and the frame loop
//! - `error`: error type for structural operations
//! - `events`: input, cursor, per-control and drag events
//! - `flow`: winit event loop driving the engine and application flows
//! - `native`: translation of abstract graphics handles to wgpu objects
//! - `pick`: pointer hit-testing
//! - `render`: paint recording into display lists
//!

pub mod context;
pub mod data_structures;
pub mod editor;
pub mod engine;
pub mod error;
pub mod events;
pub mod flow;
pub mod native;
pub mod pick;
pub mod render;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Point2, Vector2};
pub use winit::event::WindowEvent;
pub use winit::window::CursorIcon;
