//! Software rasterizer
//!
//! Features:
//! - Perspective-correct attribute interpolation
//! - Edge-function coverage with strip winding alternation
//! - Strictly-nearer Z-buffer
//! - Phong shading with tangent-space normal maps

mod camera;
mod classify;
mod math;
mod render;
mod shading;
mod texture;
mod transform;
mod types;

pub use camera::*;
pub use classify::*;
pub use math::*;
pub use render::*;
pub use shading::*;
pub use texture::*;
pub use transform::*;
pub use types::*;

/// Default output dimensions
pub const WIDTH: usize = 640;
pub const HEIGHT: usize = 480;
