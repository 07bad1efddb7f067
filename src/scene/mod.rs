//! Scene-side primitives
//!
//! Currently just the camera.

pub mod camera;

pub use camera::Camera;
