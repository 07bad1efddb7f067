//! Vertex attribute descriptors
//!
//! An [`Attribute`] describes how one named shader input is extracted from a
//! buffer's byte layout. The three GL attribute-pointer families collapse
//! into the closed [`AttribKind`] variant set, each carrying the parameters
//! its entry point takes; the family decides which configure call is issued
//! at bind time.
//!
//! Every rule the underlying API documents as a draw-time error is checked
//! here, at registration, so a stored descriptor is always valid to apply.

use crate::context::{AttribLocation, AttribSize, DataType, GlContext};
use crate::error::AttributeSpecError;

/// Attribute interpretation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttribKind {
    /// Floating-point access, with optional integer normalization.
    Float { ty: DataType, normalized: bool },
    /// Exact-integer access, no conversion.
    Integer { ty: DataType },
    /// Double-precision access. The component type is always
    /// [`DataType::Double`].
    Double,
}

/// A validated descriptor for one shader input bound to a vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    size: AttribSize,
    kind: AttribKind,
    stride: i32,
    offset: usize,
}

impl Attribute {
    /// Descriptor for the floating-point family. Accepts every component
    /// type; packed types are constrained against `size` and `normalized`.
    pub fn float(
        name: impl Into<String>,
        size: AttribSize,
        ty: DataType,
        normalized: bool,
        stride: i32,
        offset: usize,
    ) -> Result<Self, AttributeSpecError> {
        validate_layout(size, ty, normalized, stride)?;
        Ok(Self {
            name: name.into(),
            size,
            kind: AttribKind::Float { ty, normalized },
            stride,
            offset,
        })
    }

    /// Descriptor for the exact-integer family. Accepts only the
    /// exact-integer component types.
    pub fn integer(
        name: impl Into<String>,
        size: AttribSize,
        ty: DataType,
        stride: i32,
        offset: usize,
    ) -> Result<Self, AttributeSpecError> {
        validate_layout(size, ty, false, stride)?;
        if !ty.is_exact_integer() {
            return Err(AttributeSpecError::IntegerType(ty));
        }
        Ok(Self {
            name: name.into(),
            size,
            kind: AttribKind::Integer { ty },
            stride,
            offset,
        })
    }

    /// Descriptor for the double-precision family. The component type is
    /// fixed to [`DataType::Double`].
    pub fn double(
        name: impl Into<String>,
        size: AttribSize,
        stride: i32,
        offset: usize,
    ) -> Result<Self, AttributeSpecError> {
        validate_layout(size, DataType::Double, false, stride)?;
        Ok(Self {
            name: name.into(),
            size,
            kind: AttribKind::Double,
            stride,
            offset,
        })
    }

    /// The shader input name this descriptor resolves against.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> AttribSize {
        self.size
    }

    pub fn kind(&self) -> AttribKind {
        self.kind
    }

    pub fn stride(&self) -> i32 {
        self.stride
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Issue the family-appropriate configure call for a resolved slot.
    /// All preconditions were checked at registration.
    pub(crate) fn apply<C: GlContext>(&self, ctx: &C, location: AttribLocation) {
        match self.kind {
            AttribKind::Float { ty, normalized } => {
                ctx.vertex_attrib_pointer(location, self.size, ty, normalized, self.stride, self.offset)
            }
            AttribKind::Integer { ty } => {
                ctx.vertex_attrib_i_pointer(location, self.size, ty, self.stride, self.offset)
            }
            AttribKind::Double => {
                ctx.vertex_attrib_l_pointer(location, self.size, self.stride, self.offset)
            }
        }
    }
}

/// The layout rules shared by all three families, in the order the
/// underlying API documents them.
fn validate_layout(
    size: AttribSize,
    ty: DataType,
    normalized: bool,
    stride: i32,
) -> Result<(), AttributeSpecError> {
    if stride < 0 {
        return Err(AttributeSpecError::NegativeStride(stride));
    }
    if size == AttribSize::Bgra && ty != DataType::UnsignedByte && !ty.is_packed_2_10_10_10() {
        return Err(AttributeSpecError::BgraType(ty));
    }
    if ty.is_packed_2_10_10_10() && size != AttribSize::Four && size != AttribSize::Bgra {
        return Err(AttributeSpecError::PackedIntSize { ty, size });
    }
    if ty == DataType::UnsignedInt10F11F11FRev && size != AttribSize::Three {
        return Err(AttributeSpecError::PackedFloatSize(size));
    }
    if size == AttribSize::Bgra && !normalized {
        return Err(AttributeSpecError::BgraNotNormalized);
    }
    Ok(())
}
