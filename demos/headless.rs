//! Headless walkthrough of the vertex-buffer lifecycle against the mock
//! context: upload, attribute setup, bind/unbind, re-upload, delete.
//!
//! Run with `cargo run --example headless`.

use anyhow::Result;
use glaze::glam::Vec3;
use glaze::{AttribSize, Camera, DataType, MockContext, Topology, Usage, VertexBuffer};

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 4],
}

const STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;

fn triangle(z: f32) -> Vec<Vertex> {
    let color = [0.8, 0.3, 0.2, 1.0];
    vec![
        Vertex { position: [-0.5, -0.5, z], color },
        Vertex { position: [0.5, -0.5, z], color },
        Vertex { position: [0.0, 0.5, z], color },
    ]
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let ctx = MockContext::new();
    let program = ctx.create_program(&["position", "color"]);
    ctx.use_program(Some(program));

    let mut buffer = VertexBuffer::new(&ctx, Topology::Triangles, Usage::StaticDraw, triangle(0.0))?;
    buffer.add_attribute("position", AttribSize::Three, DataType::Float, false, STRIDE, 0)?;
    buffer.add_attribute("color", AttribSize::Four, DataType::Float, false, STRIDE, 12)?;

    buffer.bind(&ctx)?;
    tracing::info!(
        primitives = buffer.vertex_count(),
        enabled = ?ctx.enabled_attribs(),
        "buffer bound"
    );
    for call in ctx.pointer_calls() {
        tracing::info!(?call, "attribute configured");
    }
    buffer.unbind(&ctx);

    buffer.set_vertex_data(&ctx, triangle(0.25))?;
    tracing::info!(handle = buffer.handle().raw(), "rebuffered to a fresh handle");

    let mut camera = Camera::new(60.0, 16.0 / 9.0, 0.1, 100.0);
    camera.set_position(Vec3::new(0.0, 0.0, 3.0));
    camera.rotate_axis_angle(Vec3::Y, 0.3);
    tracing::info!(view = ?camera.view_matrix(), projection = ?camera.projection(), "camera ready");

    buffer.delete(&ctx);
    tracing::info!(live_buffers = ctx.live_buffers(), "done");
    Ok(())
}
