//! Glaze
//!
//! A thin, safe vertex-buffer and scene-camera layer over a GL-style
//! graphics context.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **context** - The [`GlContext`] trait (explicit GPU context), typed
//!    handles, the scoped bind guard, and a CPU-only [`MockContext`]
//! 2. **core** - The [`VertexBuffer`] manager and validated [`Attribute`]
//!    descriptors
//! 3. **scene** - The [`Camera`]
//!
//! The underlying API keeps its current program and current buffer binding
//! as global mutable state; here that state lives behind a context value
//! passed to every operation, so the dependency is visible and the whole
//! crate runs headless against [`MockContext`].
//!
//! # Example
//!
//! ```
//! use glaze::{AttribSize, DataType, MockContext, Topology, Usage, VertexBuffer};
//!
//! let ctx = MockContext::new();
//! let program = ctx.create_program(&["position"]);
//! ctx.use_program(Some(program));
//!
//! let mut buffer = VertexBuffer::new(
//!     &ctx,
//!     Topology::Triangles,
//!     Usage::StaticDraw,
//!     vec![0.0f32, 0.0, 1.0, 0.0, 0.0, 1.0],
//! )?;
//! buffer.add_attribute("position", AttribSize::One, DataType::Float, false, 0, 0)?;
//!
//! buffer.bind(&ctx)?;
//! assert_eq!(buffer.vertex_count(), 2); // six records, triangle list
//! buffer.unbind(&ctx);
//! buffer.delete(&ctx);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod context;
pub mod core;
pub mod error;
pub mod scene;

// Re-export commonly used types
pub use context::{
    AttribLocation, AttribSize, BufferHandle, ContextError, DataType, GlContext, MockContext,
    ProgramHandle, ScopedBind, Usage,
};

pub use core::{AttribKind, Attribute, Topology, VertexBuffer};

pub use error::{AttributeSpecError, BufferError};

pub use scene::Camera;

// Re-export glam for convenience
pub use glam;
