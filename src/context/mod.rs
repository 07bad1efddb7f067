//! GlContext - explicit GPU context abstraction
//!
//! A GL-style API keeps the current program and the current array-buffer
//! binding as hidden global state. This crate makes that dependency explicit:
//! every operation takes a [`GlContext`], and the trait exposes exactly the
//! primitives the vertex-buffer layer needs (buffer lifecycle, bind/query,
//! upload, error query, attribute lookup and configuration).
//!
//! The context is assumed to be owned by a single thread, as is standard for
//! this class of API; implementations are not required to be `Sync`.

pub mod mock;

pub use mock::MockContext;

/// Opaque handle to a GPU buffer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(u64);

impl BufferHandle {
    /// Wrap a backend-assigned raw buffer name.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the backend-assigned raw buffer name.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Opaque handle to a linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(u64);

impl ProgramHandle {
    /// Wrap a backend-assigned raw program name.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the backend-assigned raw program name.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A program-assigned vertex attribute slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttribLocation(u32);

impl AttribLocation {
    /// Wrap a backend-assigned slot index.
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// Get the slot index.
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Reason reported by the context's error query for the last failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// The backend could not allocate memory for the last operation.
    OutOfMemory,
    /// The last operation was not legal in the current state.
    InvalidOperation,
    /// An argument of the last operation was out of range.
    InvalidValue,
}

/// Intended usage pattern for a buffer's data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    StreamDraw,
    StreamRead,
    StreamCopy,
    StaticDraw,
    StaticRead,
    StaticCopy,
    DynamicDraw,
    DynamicRead,
    DynamicCopy,
}

/// Component count of a vertex attribute.
///
/// `Bgra` is the packed-order marker: four components stored BGRA, only legal
/// with the packed byte/2-10-10-10 types and normalized access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttribSize {
    One,
    Two,
    Three,
    Four,
    Bgra,
}

impl AttribSize {
    /// Number of components extracted per vertex.
    pub fn components(self) -> u32 {
        match self {
            AttribSize::One => 1,
            AttribSize::Two => 2,
            AttribSize::Three => 3,
            AttribSize::Four | AttribSize::Bgra => 4,
        }
    }
}

/// Component data type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    HalfFloat,
    Float,
    Double,
    Fixed,
    /// Four signed components packed 2-10-10-10, reversed order.
    Int2_10_10_10Rev,
    /// Four unsigned components packed 2-10-10-10, reversed order.
    UnsignedInt2_10_10_10Rev,
    /// Three unsigned floats packed 10F-11F-11F, reversed order.
    UnsignedInt10F11F11FRev,
}

impl DataType {
    /// Whether this is one of the exact-integer types accepted by the
    /// integer attribute family.
    pub fn is_exact_integer(self) -> bool {
        matches!(
            self,
            DataType::Byte
                | DataType::UnsignedByte
                | DataType::Short
                | DataType::UnsignedShort
                | DataType::Int
                | DataType::UnsignedInt
        )
    }

    /// Whether this is one of the packed 2-10-10-10 types.
    pub fn is_packed_2_10_10_10(self) -> bool {
        matches!(
            self,
            DataType::Int2_10_10_10Rev | DataType::UnsignedInt2_10_10_10Rev
        )
    }
}

/// The GPU context primitives consumed by this crate.
///
/// Methods mirror the underlying API one-to-one; implementations hold the
/// mutable context state behind `&self` (the real API is a thread-bound
/// global, the mock uses interior mutability).
pub trait GlContext {
    /// Reserve a new buffer object name.
    fn create_buffer(&self) -> BufferHandle;

    /// Release a buffer object. Releasing the currently bound buffer clears
    /// the binding.
    fn delete_buffer(&self, buffer: BufferHandle);

    /// Make `buffer` the current array buffer, or clear the binding.
    fn bind_array_buffer(&self, buffer: Option<BufferHandle>);

    /// Query the current array-buffer binding.
    fn array_buffer_binding(&self) -> Option<BufferHandle>;

    /// Upload `data` into the currently bound array buffer, replacing its
    /// data store. Failure is reported through [`GlContext::take_error`].
    fn buffer_data(&self, data: &[u8], usage: Usage);

    /// Pop the reason for the last failed call, if any.
    fn take_error(&self) -> Option<ContextError>;

    /// Query the currently active program.
    fn current_program(&self) -> Option<ProgramHandle>;

    /// Resolve an attribute name to its slot in `program`. `None` if the
    /// name has no active binding there.
    fn attrib_location(&self, program: ProgramHandle, name: &str) -> Option<AttribLocation>;

    /// Number of attribute slots the context supports.
    fn max_vertex_attribs(&self) -> u32;

    /// Enable an attribute slot.
    fn enable_vertex_attrib(&self, location: AttribLocation);

    /// Disable an attribute slot.
    fn disable_vertex_attrib(&self, location: AttribLocation);

    /// Configure a slot for floating-point (optionally normalized) access
    /// into the currently bound array buffer.
    fn vertex_attrib_pointer(
        &self,
        location: AttribLocation,
        size: AttribSize,
        ty: DataType,
        normalized: bool,
        stride: i32,
        offset: usize,
    );

    /// Configure a slot for exact-integer access into the currently bound
    /// array buffer.
    fn vertex_attrib_i_pointer(
        &self,
        location: AttribLocation,
        size: AttribSize,
        ty: DataType,
        stride: i32,
        offset: usize,
    );

    /// Configure a slot for double-precision access into the currently bound
    /// array buffer.
    fn vertex_attrib_l_pointer(
        &self,
        location: AttribLocation,
        size: AttribSize,
        stride: i32,
        offset: usize,
    );
}

/// Scoped array-buffer bind.
///
/// Saves the ambient binding, binds `target`, and restores the saved binding
/// when dropped, on every exit path. Used around uploads so that mutating a
/// buffer never leaks a changed global binding to the caller.
pub struct ScopedBind<'a, C: GlContext> {
    ctx: &'a C,
    saved: Option<BufferHandle>,
}

impl<'a, C: GlContext> ScopedBind<'a, C> {
    /// Bind `target`, remembering the previous binding.
    pub fn new(ctx: &'a C, target: BufferHandle) -> Self {
        let saved = ctx.array_buffer_binding();
        ctx.bind_array_buffer(Some(target));
        Self { ctx, saved }
    }
}

impl<C: GlContext> Drop for ScopedBind<'_, C> {
    fn drop(&mut self) {
        self.ctx.bind_array_buffer(self.saved);
    }
}
