//! Node-graph editor built on the GUI engine.
//!
//! - `node` contains the node, port and arrow widgets
//! - `panel` contains [`NodePanel`], which owns nodes and links and turns drag
//!   gestures into node moves, new links and view pans

pub mod node;
pub mod panel;

pub use node::{ArrowWidget, NodeWidget, PortDirection, PortWidget};
pub use panel::{LinkKey, NodeDesc, NodePanel};
