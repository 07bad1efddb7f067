//! Error types
//!
//! All preconditions are checked up front at the call that can detect them;
//! violations surface as typed errors, never as deferred driver errors.

use crate::context::{AttribSize, DataType};
use thiserror::Error;

/// A rejected attribute registration.
///
/// Each variant corresponds to one of the precondition rules the underlying
/// API documents for its attribute-pointer calls, and names the offending
/// argument and value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeSpecError {
    #[error("stride must be non-negative, but {0} was provided")]
    NegativeStride(i32),

    #[error(
        "type must be UnsignedByte, Int2_10_10_10Rev, or UnsignedInt2_10_10_10Rev \
         when size is BGRA, but {0:?} was provided"
    )]
    BgraType(DataType),

    #[error("normalized must be true when size is BGRA")]
    BgraNotNormalized,

    #[error("size must be 4 or BGRA when type is {ty:?}, but {size:?} was provided")]
    PackedIntSize { ty: DataType, size: AttribSize },

    #[error("size must be 3 when type is UnsignedInt10F11F11FRev, but {0:?} was provided")]
    PackedFloatSize(AttribSize),

    #[error(
        "type must be one of Byte, UnsignedByte, Short, UnsignedShort, Int, or \
         UnsignedInt for an integer attribute, but {0:?} was provided"
    )]
    IntegerType(DataType),
}

/// A failed vertex-buffer operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The context reported out-of-memory while uploading. Any partially
    /// allocated handle has already been released.
    #[error("unable to allocate GPU memory for vertex buffer")]
    ResourceExhausted,

    /// Re-upload was attempted while this buffer is the currently bound
    /// array buffer.
    #[error("unable to rebuffer vertex data while the buffer is actively bound")]
    ActivelyBound,

    /// Bind was attempted with no program current in the context.
    #[error("a program must be bound before binding a vertex buffer")]
    NoProgramBound,

    /// A registered attribute name has no active binding in the current
    /// program.
    #[error("the attribute {0:?} does not exist in the current program")]
    AttributeNotFound(String),

    #[error(transparent)]
    InvalidAttributeSpec(#[from] AttributeSpecError),
}
