//! Scene setup: render settings and built-in meshes
//!
//! Stands in for the model loader and settings UI of a full viewer.

mod presets;
mod settings;

pub use presets::*;
pub use settings::*;
