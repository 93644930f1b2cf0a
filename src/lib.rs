//! Software triangle rasterizer
//!
//! Turns a triangle mesh, a camera and a set of surface textures into a color
//! image entirely on the CPU:
//! - Vertex transformation to clip space and perspective divide
//! - Coarse frustum and behind-camera rejects
//! - Edge-function rasterization with perspective-correct interpolation
//! - Depth-buffered visibility (nearest fragment wins)
//! - Phong shading with tangent-space normal maps

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod rasterizer;
pub mod renderer;
pub mod scene;

pub use error::{Error, Result};
pub use renderer::Renderer;
