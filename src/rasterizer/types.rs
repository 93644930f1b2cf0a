//! Core types for the rasterizer

use std::ops::{Add, Mul};
use serde::{Serialize, Deserialize};

use super::math::{Matrix, Vec2, Vec3, Vec4};
use crate::error::{Error, Result};

/// RGBA color (0-255 per channel), the frame buffer's storage format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const GRAY: Color = Color { r: 100, g: 100, b: 100, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to u32 (RGBA, red in the high byte)
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | (self.a as u32)
    }

    pub fn from_u32(packed: u32) -> Self {
        Self {
            r: (packed >> 24) as u8,
            g: (packed >> 16) as u8,
            b: (packed >> 8) as u8,
            a: packed as u8,
        }
    }

    /// Convert to [u8; 4] for export
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Linear floating point color used during shading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorRGB {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ColorRGB {
    pub const BLACK: ColorRGB = ColorRGB { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: ColorRGB = ColorRGB { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn gray(v: f32) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Scale down uniformly so the brightest channel is at most 1
    pub fn max_to_one(self) -> Self {
        let max = self.r.max(self.g).max(self.b);
        if max > 1.0 {
            self * (1.0 / max)
        } else {
            self
        }
    }

    /// Quantize to 8-bit, clamping every channel to [0, 1]
    pub fn to_color(self) -> Color {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
        Color::new(q(self.r), q(self.g), q(self.b))
    }
}

impl From<Color> for ColorRGB {
    fn from(c: Color) -> Self {
        ColorRGB::new(c.r as f32 / 255.0, c.g as f32 / 255.0, c.b as f32 / 255.0)
    }
}

impl Add for ColorRGB {
    type Output = ColorRGB;
    fn add(self, other: ColorRGB) -> ColorRGB {
        ColorRGB::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

impl Mul<f32> for ColorRGB {
    type Output = ColorRGB;
    fn mul(self, s: f32) -> ColorRGB {
        ColorRGB::new(self.r * s, self.g * s, self.b * s)
    }
}

/// Input mesh vertex in model space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,
    pub color: ColorRGB,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, uv: Vec2, normal: Vec3, tangent: Vec3) -> Self {
        Self {
            position,
            color: ColorRGB::WHITE,
            uv,
            normal,
            tangent,
        }
    }

    pub fn from_pos(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            color: ColorRGB::WHITE,
            uv: Vec2::default(),
            normal: Vec3::ZERO,
            tangent: Vec3::ZERO,
        }
    }

    pub fn with_color(mut self, color: ColorRGB) -> Self {
        self.color = color;
        self
    }
}

/// Transformed vertex, one per index entry.
///
/// `position` holds NDC x, y, z after the perspective divide and the
/// untouched clip-space w.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VertexOut {
    pub position: Vec4,
    pub color: ColorRGB,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub view_direction: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
}

/// Triangle mesh: owns its vertices, index sequence and world transform
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub world: Matrix,
    pub topology: PrimitiveTopology,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, topology: PrimitiveTopology) -> Result<Self> {
        let count_ok = match topology {
            PrimitiveTopology::TriangleList => indices.len() % 3 == 0,
            PrimitiveTopology::TriangleStrip => indices.len() >= 3,
        };
        if !count_ok {
            return Err(Error::InvalidMesh(format!(
                "{} indices is not valid for {:?}",
                indices.len(),
                topology
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(Error::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                bad,
                vertices.len()
            )));
        }
        Ok(Self {
            vertices,
            indices,
            world: Matrix::IDENTITY,
            topology,
        })
    }

    pub fn with_world(mut self, world: Matrix) -> Self {
        self.world = world;
        self
    }

    /// Number of triangles the index sequence describes (degenerates included)
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            PrimitiveTopology::TriangleList => self.indices.len() / 3,
            PrimitiveTopology::TriangleStrip => self.indices.len().saturating_sub(2),
        }
    }

    /// Iterate the triangles as index-list positions with their winding
    pub fn triangles(&self) -> impl Iterator<Item = TriangleRef> + '_ {
        let topology = self.topology;
        (0..self.triangle_count()).map(move |i| match topology {
            PrimitiveTopology::TriangleList => TriangleRef {
                corners: [3 * i, 3 * i + 1, 3 * i + 2],
                winding: Winding::Standard,
            },
            PrimitiveTopology::TriangleStrip => TriangleRef {
                corners: [i, i + 1, i + 2],
                winding: if i % 2 == 1 { Winding::Flipped } else { Winding::Standard },
            },
        })
    }
}

/// Whether a triangle's second and third corners are swapped before edge testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Standard,
    Flipped,
}

/// One triangle: positions into the index list (and thus into the
/// per-index transformed vertex arrays)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleRef {
    pub corners: [usize; 3],
    pub winding: Winding,
}

impl TriangleRef {
    /// Corners in edge-test order
    pub fn ordered(&self) -> [usize; 3] {
        let [a, b, c] = self.corners;
        match self.winding {
            Winding::Standard => [a, b, c],
            Winding::Flipped => [a, c, b],
        }
    }
}

/// Which lighting terms end up in the final color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadingMode {
    ObservedArea,
    Diffuse,
    Specular,
    #[default]
    Combined,
}

impl ShadingMode {
    pub fn next(self) -> Self {
        match self {
            ShadingMode::ObservedArea => ShadingMode::Diffuse,
            ShadingMode::Diffuse => ShadingMode::Specular,
            ShadingMode::Specular => ShadingMode::Combined,
            ShadingMode::Combined => ShadingMode::ObservedArea,
        }
    }
}

/// Rasterizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    /// Lighting terms to combine
    pub shading: ShadingMode,
    /// Perturb normals with the tangent-space normal map
    pub use_normal_map: bool,
    /// Output remapped depth instead of the shaded color
    pub show_depth: bool,
    /// Depth range stretched to black..white when `show_depth` is on
    pub depth_remap: (f32, f32),
    /// Slack added to the NDC bounds of the coarse frustum reject
    pub frustum_margin: f32,
    /// Color every pixel is cleared to at the start of a frame
    pub background: Color,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            shading: ShadingMode::Combined,
            use_normal_map: true,
            show_depth: false,
            depth_remap: (0.985, 1.0),
            frustum_margin: 0.0,
            background: Color::GRAY,
        }
    }
}
