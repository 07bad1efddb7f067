//! GPU primitives
//!
//! The vertex-buffer manager and its attribute descriptors.

pub mod attribute;
pub mod buffer;

pub use attribute::{AttribKind, Attribute};
pub use buffer::{Topology, VertexBuffer};
