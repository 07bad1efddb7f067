//! GPU vertex buffer manager
//!
//! [`VertexBuffer`] owns one GPU buffer object plus a CPU-side mirror of the
//! uploaded vertex records, and the ordered attribute descriptors bound to
//! that buffer. Every operation takes the [`GlContext`] it acts on; the
//! manager never caches ambient context state.

use bytemuck::Pod;

use crate::context::{
    AttribLocation, AttribSize, BufferHandle, ContextError, DataType, GlContext, ScopedBind, Usage,
};
use crate::core::attribute::Attribute;
use crate::error::{AttributeSpecError, BufferError};

/// Primitive topology the vertex records are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Points,
    Lines,
    Triangles,
    Quads,
}

impl Topology {
    /// Vertices consumed per primitive.
    pub fn vertices_per_primitive(self) -> usize {
        match self {
            Topology::Points => 1,
            Topology::Lines => 2,
            Topology::Triangles => 3,
            Topology::Quads => 4,
        }
    }
}

/// A GPU buffer of fixed-size vertex records with its attribute bindings.
///
/// The CPU mirror and GPU contents are identical after every successful
/// upload. Re-upload goes through a fresh handle (allocate-new, swap,
/// free-old), so a failed upload leaves the original buffer intact and no
/// partially valid handle is ever observable.
///
/// The manager does not own its context, so releasing the GPU handle is the
/// explicit [`VertexBuffer::delete`]; dropping an undeleted buffer logs a
/// leak warning.
pub struct VertexBuffer<V> {
    handle: BufferHandle,
    data: Vec<V>,
    attributes: Vec<Attribute>,
    /// Slots enabled by the last `bind`, replayed by `unbind`.
    bound_locations: Vec<AttribLocation>,
    topology: Topology,
    usage: Usage,
    deleted: bool,
}

impl<V: Pod> VertexBuffer<V> {
    /// Allocate a buffer object and upload `data` into it.
    ///
    /// `data` may be a `Vec<V>` (moved) or a `&[V]` (copied). The ambient
    /// array-buffer binding is restored before returning. On out-of-memory
    /// the fresh handle is released and `ResourceExhausted` is returned.
    pub fn new<C: GlContext>(
        ctx: &C,
        topology: Topology,
        usage: Usage,
        data: impl Into<Vec<V>>,
    ) -> Result<Self, BufferError> {
        let data = data.into();
        let handle = upload(ctx, bytemuck::cast_slice(&data), usage)?;
        tracing::debug!(
            handle = handle.raw(),
            records = data.len(),
            "created vertex buffer"
        );
        Ok(Self {
            handle,
            data,
            attributes: Vec::new(),
            bound_locations: Vec::new(),
            topology,
            usage,
            deleted: false,
        })
    }

    /// The handle of the live buffer object.
    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    /// The CPU mirror of the uploaded records.
    pub fn data(&self) -> &[V] {
        &self.data
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    /// Number of primitives the buffer holds under its topology.
    pub fn vertex_count(&self) -> usize {
        self.data.len() / self.topology.vertices_per_primitive()
    }

    /// Replace the buffer's contents.
    ///
    /// Fails with [`BufferError::ActivelyBound`] if this buffer is the
    /// current array buffer; rebinding underneath an active binding would
    /// invalidate in-flight draw state. Otherwise the new data goes into a
    /// brand-new handle which is swapped in only after the upload succeeds,
    /// then the old handle is released. A failed upload leaves the buffer
    /// exactly as it was.
    pub fn set_vertex_data<C: GlContext>(
        &mut self,
        ctx: &C,
        data: impl Into<Vec<V>>,
    ) -> Result<(), BufferError> {
        if ctx.array_buffer_binding() == Some(self.handle) {
            return Err(BufferError::ActivelyBound);
        }
        let data = data.into();
        let new_handle = upload(ctx, bytemuck::cast_slice(&data), self.usage)?;
        let old_handle = std::mem::replace(&mut self.handle, new_handle);
        self.data = data;
        ctx.delete_buffer(old_handle);
        tracing::debug!(
            old = old_handle.raw(),
            new = new_handle.raw(),
            records = self.data.len(),
            "rebuffered vertex data"
        );
        Ok(())
    }

    /// Register a floating-point (optionally normalized) attribute.
    pub fn add_attribute(
        &mut self,
        name: impl Into<String>,
        size: AttribSize,
        ty: DataType,
        normalized: bool,
        stride: i32,
        offset: usize,
    ) -> Result<(), AttributeSpecError> {
        self.attributes
            .push(Attribute::float(name, size, ty, normalized, stride, offset)?);
        Ok(())
    }

    /// Register an exact-integer attribute.
    pub fn add_attribute_i(
        &mut self,
        name: impl Into<String>,
        size: AttribSize,
        ty: DataType,
        stride: i32,
        offset: usize,
    ) -> Result<(), AttributeSpecError> {
        self.attributes
            .push(Attribute::integer(name, size, ty, stride, offset)?);
        Ok(())
    }

    /// Register a double-precision attribute.
    pub fn add_attribute_l(
        &mut self,
        name: impl Into<String>,
        size: AttribSize,
        stride: i32,
        offset: usize,
    ) -> Result<(), AttributeSpecError> {
        self.attributes
            .push(Attribute::double(name, size, stride, offset)?);
        Ok(())
    }

    /// The registered attribute descriptors, in registration order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Make this buffer the current array buffer and apply every registered
    /// attribute against the current program.
    ///
    /// Requires a current program. Each attribute name is resolved in that
    /// program; the slot is enabled, configured for its family, and recorded
    /// so that [`VertexBuffer::unbind`] can disable exactly these slots.
    pub fn bind<C: GlContext>(&mut self, ctx: &C) -> Result<(), BufferError> {
        let program = ctx.current_program().ok_or(BufferError::NoProgramBound)?;
        ctx.bind_array_buffer(Some(self.handle));
        self.bound_locations.clear();
        for attribute in &self.attributes {
            let location = ctx
                .attrib_location(program, attribute.name())
                .ok_or_else(|| BufferError::AttributeNotFound(attribute.name().to_owned()))?;
            // A resolved location past the slot limit is a contract violation
            // in the context itself.
            debug_assert!(
                location.index() < ctx.max_vertex_attribs(),
                "attribute location out of range for this context"
            );
            ctx.enable_vertex_attrib(location);
            attribute.apply(ctx, location);
            self.bound_locations.push(location);
        }
        Ok(())
    }

    /// Clear the array-buffer binding and disable the slots enabled by the
    /// last `bind`.
    ///
    /// Slots are replayed from the locations resolved at bind time, so a
    /// program swap between bind and unbind cannot redirect the disables.
    pub fn unbind<C: GlContext>(&mut self, ctx: &C) {
        ctx.bind_array_buffer(None);
        for location in self.bound_locations.drain(..) {
            ctx.disable_vertex_attrib(location);
        }
    }

    /// Drop every registered attribute descriptor. GPU state is untouched;
    /// a subsequent bind applies no attributes.
    pub fn reset_attributes(&mut self) {
        self.attributes.clear();
        self.bound_locations.clear();
    }

    /// Release the GPU handle.
    pub fn delete<C: GlContext>(mut self, ctx: &C) {
        ctx.delete_buffer(self.handle);
        self.deleted = true;
        tracing::debug!(handle = self.handle.raw(), "deleted vertex buffer");
    }
}

/// Allocate a fresh handle and upload `bytes` into it, restoring the ambient
/// binding on every path. On out-of-memory the handle is released before the
/// error propagates.
fn upload<C: GlContext>(ctx: &C, bytes: &[u8], usage: Usage) -> Result<BufferHandle, BufferError> {
    let handle = ctx.create_buffer();
    {
        let _bind = ScopedBind::new(ctx, handle);
        ctx.buffer_data(bytes, usage);
    }
    if ctx.take_error() == Some(ContextError::OutOfMemory) {
        ctx.delete_buffer(handle);
        return Err(BufferError::ResourceExhausted);
    }
    Ok(handle)
}

impl<V> Drop for VertexBuffer<V> {
    fn drop(&mut self) {
        if !self.deleted {
            tracing::warn!(
                handle = self.handle.raw(),
                "vertex buffer dropped without delete; GPU handle leaked"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::mock::{MockContext, PointerFamily};
    use crate::context::ProgramHandle;

    fn triangle_buffer(ctx: &MockContext) -> VertexBuffer<f32> {
        VertexBuffer::new(
            ctx,
            Topology::Triangles,
            Usage::StaticDraw,
            vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0],
        )
        .unwrap()
    }

    fn program_with(ctx: &MockContext, attributes: &[&str]) -> ProgramHandle {
        let program = ctx.create_program(attributes);
        ctx.use_program(Some(program));
        program
    }

    #[test]
    fn construction_uploads_and_mirrors() {
        let ctx = MockContext::new();
        let buffer = triangle_buffer(&ctx);

        assert_eq!(buffer.data(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(
            ctx.buffer_contents(buffer.handle()),
            Some(bytemuck::cast_slice(buffer.data()).to_vec())
        );
        // Six records of a triangle list are two primitives.
        assert_eq!(buffer.vertex_count(), 2);
    }

    #[test]
    fn vertex_count_follows_topology() {
        let ctx = MockContext::new();
        let data = vec![0.0f32; 12];
        for (topology, expected) in [
            (Topology::Points, 12),
            (Topology::Lines, 6),
            (Topology::Triangles, 4),
            (Topology::Quads, 3),
        ] {
            let buffer =
                VertexBuffer::new(&ctx, topology, Usage::StaticDraw, data.clone()).unwrap();
            assert_eq!(buffer.vertex_count(), expected);
            buffer.delete(&ctx);
        }
    }

    #[test]
    fn construction_restores_ambient_binding() {
        let ctx = MockContext::new();
        let ambient = ctx.create_buffer();
        ctx.bind_array_buffer(Some(ambient));

        let buffer = triangle_buffer(&ctx);
        assert_eq!(ctx.array_buffer_binding(), Some(ambient));
        buffer.delete(&ctx);
    }

    #[test]
    fn construction_oom_releases_the_handle() {
        let ctx = MockContext::new();
        ctx.fail_next_upload();
        let result = VertexBuffer::<f32>::new(
            &ctx,
            Topology::Triangles,
            Usage::StaticDraw,
            vec![0.0f32; 6],
        );
        assert_eq!(result.err(), Some(BufferError::ResourceExhausted));
        assert_eq!(ctx.live_buffers(), 0);
        assert_eq!(ctx.array_buffer_binding(), None);
    }

    #[test]
    fn reupload_while_bound_fails_and_changes_nothing() {
        let ctx = MockContext::new();
        let mut buffer = triangle_buffer(&ctx);
        let handle = buffer.handle();
        ctx.bind_array_buffer(Some(handle));

        let err = buffer.set_vertex_data(&ctx, vec![9.0f32; 3]).unwrap_err();
        assert_eq!(err, BufferError::ActivelyBound);
        assert_eq!(buffer.handle(), handle);
        assert_eq!(buffer.data(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(ctx.is_live(handle));
    }

    #[test]
    fn reupload_swaps_to_a_fresh_handle() {
        let ctx = MockContext::new();
        let mut buffer = triangle_buffer(&ctx);
        let old = buffer.handle();

        buffer.set_vertex_data(&ctx, vec![9.0f32, 8.0, 7.0]).unwrap();
        assert_ne!(buffer.handle(), old);
        assert!(!ctx.is_live(old));
        assert_eq!(buffer.data(), &[9.0, 8.0, 7.0]);
        assert_eq!(
            ctx.buffer_contents(buffer.handle()),
            Some(bytemuck::cast_slice(buffer.data()).to_vec())
        );
        assert_eq!(buffer.vertex_count(), 1);
    }

    #[test]
    fn reupload_oom_leaves_the_buffer_intact() {
        let ctx = MockContext::new();
        let mut buffer = triangle_buffer(&ctx);
        let handle = buffer.handle();

        ctx.fail_next_upload();
        let err = buffer.set_vertex_data(&ctx, vec![9.0f32; 3]).unwrap_err();
        assert_eq!(err, BufferError::ResourceExhausted);
        assert_eq!(buffer.handle(), handle);
        assert!(ctx.is_live(handle));
        assert_eq!(buffer.data(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(ctx.live_buffers(), 1);
    }

    #[test]
    fn reupload_restores_ambient_binding() {
        let ctx = MockContext::new();
        let mut buffer = triangle_buffer(&ctx);
        let ambient = ctx.create_buffer();
        ctx.bind_array_buffer(Some(ambient));

        buffer.set_vertex_data(&ctx, vec![1.0f32; 3]).unwrap();
        assert_eq!(ctx.array_buffer_binding(), Some(ambient));
    }

    #[test]
    fn bind_requires_a_current_program() {
        let ctx = MockContext::new();
        let mut buffer = triangle_buffer(&ctx);
        assert_eq!(buffer.bind(&ctx).unwrap_err(), BufferError::NoProgramBound);
        assert_eq!(ctx.array_buffer_binding(), None);
    }

    #[test]
    fn bind_fails_on_unknown_attribute_name() {
        let ctx = MockContext::new();
        let mut buffer = triangle_buffer(&ctx);
        buffer
            .add_attribute("normal", AttribSize::Three, DataType::Float, false, 0, 0)
            .unwrap();
        program_with(&ctx, &["position"]);

        assert_eq!(
            buffer.bind(&ctx).unwrap_err(),
            BufferError::AttributeNotFound("normal".to_owned())
        );
    }

    #[test]
    fn bind_enables_and_configures_each_attribute_in_order() {
        let ctx = MockContext::new();
        let mut buffer = triangle_buffer(&ctx);
        buffer
            .add_attribute("position", AttribSize::Three, DataType::Float, false, 24, 0)
            .unwrap();
        buffer
            .add_attribute_i("bone", AttribSize::One, DataType::UnsignedInt, 24, 12)
            .unwrap();
        buffer.add_attribute_l("weight", AttribSize::One, 24, 16).unwrap();
        program_with(&ctx, &["position", "bone", "weight"]);

        buffer.bind(&ctx).unwrap();
        assert_eq!(ctx.array_buffer_binding(), Some(buffer.handle()));
        assert_eq!(ctx.enabled_attribs(), vec![0, 1, 2]);

        let calls = ctx.pointer_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].family, PointerFamily::Float);
        assert_eq!(calls[0].location.index(), 0);
        assert_eq!(calls[0].stride, 24);
        assert_eq!(calls[1].family, PointerFamily::Integer);
        assert_eq!(calls[1].ty, DataType::UnsignedInt);
        assert_eq!(calls[1].offset, 12);
        assert_eq!(calls[2].family, PointerFamily::Double);
        assert_eq!(calls[2].ty, DataType::Double);
    }

    #[test]
    fn unbind_disables_the_slots_bind_enabled() {
        let ctx = MockContext::new();
        let mut buffer = triangle_buffer(&ctx);
        buffer
            .add_attribute("position", AttribSize::Three, DataType::Float, false, 0, 0)
            .unwrap();
        program_with(&ctx, &["position"]);

        buffer.bind(&ctx).unwrap();
        assert_eq!(ctx.enabled_attribs(), vec![0]);

        buffer.unbind(&ctx);
        assert_eq!(ctx.array_buffer_binding(), None);
        assert!(ctx.enabled_attribs().is_empty());
    }

    #[test]
    fn unbind_targets_bind_time_locations_across_a_program_swap() {
        let ctx = MockContext::new();
        let mut buffer = triangle_buffer(&ctx);
        buffer
            .add_attribute("color", AttribSize::Four, DataType::Float, false, 0, 0)
            .unwrap();
        program_with(&ctx, &["position", "color"]);
        buffer.bind(&ctx).unwrap();
        assert_eq!(ctx.enabled_attribs(), vec![1]);

        // Swap to a program where "color" lives elsewhere (or nowhere).
        program_with(&ctx, &["color"]);
        buffer.unbind(&ctx);
        assert!(ctx.enabled_attribs().is_empty());
    }

    #[test]
    fn unbind_without_bind_disables_nothing() {
        let ctx = MockContext::new();
        let mut buffer = triangle_buffer(&ctx);
        ctx.enable_vertex_attrib(crate::context::AttribLocation::from_index(5));

        buffer.unbind(&ctx);
        assert_eq!(ctx.enabled_attribs(), vec![5]);
    }

    #[test]
    fn reset_attributes_then_bind_enables_no_slots() {
        let ctx = MockContext::new();
        let mut buffer = triangle_buffer(&ctx);
        buffer
            .add_attribute("position", AttribSize::Three, DataType::Float, false, 0, 0)
            .unwrap();
        program_with(&ctx, &["position"]);

        buffer.reset_attributes();
        buffer.bind(&ctx).unwrap();
        assert!(ctx.enabled_attribs().is_empty());
        assert!(ctx.pointer_calls().is_empty());
    }

    #[test]
    fn attribute_registration_order_is_preserved() {
        let ctx = MockContext::new();
        let mut buffer = triangle_buffer(&ctx);
        buffer
            .add_attribute("b", AttribSize::One, DataType::Float, false, 0, 0)
            .unwrap();
        buffer
            .add_attribute("a", AttribSize::One, DataType::Float, false, 0, 4)
            .unwrap();
        let names: Vec<&str> = buffer.attributes().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn invalid_attribute_spec_is_rejected_at_registration() {
        let ctx = MockContext::new();
        let mut buffer = triangle_buffer(&ctx);
        let err = buffer
            .add_attribute("a", AttribSize::Bgra, DataType::Float, true, 0, 0)
            .unwrap_err();
        assert_eq!(err, AttributeSpecError::BgraType(DataType::Float));
        assert!(buffer.attributes().is_empty());
    }

    #[test]
    fn delete_releases_the_handle() {
        let ctx = MockContext::new();
        let buffer = triangle_buffer(&ctx);
        let handle = buffer.handle();
        buffer.delete(&ctx);
        assert!(!ctx.is_live(handle));
        assert_eq!(ctx.live_buffers(), 0);
    }

    #[test]
    fn construct_from_slice_copies() {
        let ctx = MockContext::new();
        let source = [1.0f32, 2.0, 3.0];
        let buffer =
            VertexBuffer::new(&ctx, Topology::Points, Usage::DynamicDraw, &source[..]).unwrap();
        assert_eq!(buffer.data(), &source);
        buffer.delete(&ctx);
    }
}
