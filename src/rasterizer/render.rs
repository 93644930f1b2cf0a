//! Core rendering functions
//! Screen-space conversion, edge-function rasterization, depth test and
//! perspective-correct attribute interpolation

use std::ops::{Add, Mul};
use std::path::Path;

use log::debug;

use super::camera::Camera;
use super::classify::{classify, Classification};
use super::math::{Matrix, Vec2, Vec3};
use super::shading::{depth_color, shade_pixel, ShadeOptions, SurfaceSample};
use super::texture::Materials;
use super::transform::transform_vertices;
use super::types::{Color, ColorRGB, Mesh, RasterSettings, VertexOut};
use crate::error::Result;

/// Pixels added around a triangle's bounding box to absorb rounding at shared edges
pub const BOUNDING_BOX_MARGIN: i32 = 1;

/// Color and depth buffers for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u32>,  // Packed RGBA, see `Color::to_u32`
    pub depth: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![Color::BLACK.to_u32(); width * height],
            depth: vec![f32::INFINITY; width * height],
            width,
            height,
        }
    }

    /// Reset for a new frame: background color, infinitely far depth
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_u32());
        self.depth.fill(f32::INFINITY);
    }

    /// Store a shaded fragment. Caller guarantees `x < width`, `y < height`.
    pub fn write(&mut self, x: usize, y: usize, depth: f32, color: ColorRGB) {
        debug_assert!(x < self.width && y < self.height, "pixel ({}, {}) out of bounds", x, y);
        let idx = x + y * self.width;
        self.depth[idx] = depth;
        self.pixels[idx] = color.to_color().to_u32();
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        Color::from_u32(self.pixels[x + y * self.width])
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[x + y * self.width]
    }

    /// Convert to RGBA bytes, row-major
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&p| Color::from_u32(p).to_bytes())
            .collect()
    }

    /// Write the color buffer to an image file; the format follows the extension
    pub fn save_image<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        image::save_buffer(
            path,
            &self.to_rgba_bytes(),
            self.width as u32,
            self.height as u32,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }
}

/// What the camera hands the pipeline for one frame
#[derive(Debug, Clone, Copy)]
pub struct ViewParams {
    pub view: Matrix,
    pub projection: Matrix,
    pub origin: Vec3,
}

impl ViewParams {
    /// Geometry is already in NDC
    pub fn identity() -> Self {
        Self {
            view: Matrix::IDENTITY,
            projection: Matrix::IDENTITY,
            origin: Vec3::ZERO,
        }
    }
}

impl From<&Camera> for ViewParams {
    fn from(camera: &Camera) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            origin: camera.origin,
        }
    }
}

/// Vertex position in pixel coordinates; z and w stay as NDC depth and clip w
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl ScreenVertex {
    fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Convert every transformed vertex to screen space, once, before rasterization
pub fn to_screen_space(vertices: &[VertexOut], width: usize, height: usize) -> Vec<ScreenVertex> {
    vertices
        .iter()
        .map(|v| ScreenVertex {
            x: (v.position.x + 1.0) / 2.0 * width as f32,
            y: (1.0 - v.position.y) / 2.0 * height as f32,
            z: v.position.z,
            w: v.position.w,
        })
        .collect()
}

/// Half-open pixel range a triangle may cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: usize,
    pub max_x: usize,
    pub min_y: usize,
    pub max_y: usize,
}

impl BoundingBox {
    pub fn of(tri: [&ScreenVertex; 3], width: usize, height: usize) -> Self {
        let (w, h) = (width as i32, height as i32);
        let xs = tri.map(|v| v.x);
        let ys = tri.map(|v| v.y);

        let lo = |vals: [f32; 3], limit: i32| {
            let m = vals.iter().copied().fold(f32::INFINITY, f32::min) as i32;
            (m.clamp(0, limit) - BOUNDING_BOX_MARGIN).clamp(0, limit)
        };
        let hi = |vals: [f32; 3], limit: i32| {
            let m = vals.iter().copied().fold(f32::NEG_INFINITY, f32::max).ceil() as i32;
            (m.clamp(0, limit) + BOUNDING_BOX_MARGIN).clamp(0, limit)
        };

        Self {
            min_x: lo(xs, w) as usize,
            max_x: hi(xs, w) as usize,
            min_y: lo(ys, h) as usize,
            max_y: hi(ys, h) as usize,
        }
    }
}

/// Signed area of (`p` relative to edge `a -> b`); non-negative on the inner side
pub fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).cross(p - a)
}

/// Normalized barycentric weights of `p`, or `None` when `p` is outside the
/// triangle or the triangle has no area
pub fn barycentric_weights(p: Vec2, [v0, v1, v2]: [Vec2; 3]) -> Option<[f32; 3]> {
    let e0 = edge_function(v1, v2, p);
    let e1 = edge_function(v2, v0, p);
    let e2 = edge_function(v0, v1, p);
    if e0 < 0.0 || e1 < 0.0 || e2 < 0.0 {
        return None;
    }

    let total = e0 + e1 + e2;
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    Some([e0 / total, e1 / total, e2 / total])
}

/// `(sum weight_i * attr_i / w_i) * interpolated_w`
pub fn interpolate<T>(attrs: [T; 3], weights: [f32; 3], ws: [f32; 3], interpolated_w: f32) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let [a0, a1, a2] = attrs;
    (a0 * (weights[0] / ws[0]) + a1 * (weights[1] / ws[1]) + a2 * (weights[2] / ws[2])) * interpolated_w
}

/// `1 / sum(weight_i / value_i)`, or `None` if not finite.
/// Expects every value > 0; a zero value collapses the result to 0.
fn harmonic(weights: [f32; 3], values: [f32; 3]) -> Option<f32> {
    let inv: f32 = (0..3).map(|i| weights[i] / values[i]).sum();
    let v = 1.0 / inv;
    v.is_finite().then_some(v)
}

/// Per-frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles: usize,
    pub degenerate: usize,
    pub behind_camera: usize,
    pub outside_frustum: usize,
    pub rasterized: usize,
    pub pixels_written: usize,
}

impl RenderStats {
    pub fn merge(&mut self, other: RenderStats) {
        self.triangles += other.triangles;
        self.degenerate += other.degenerate;
        self.behind_camera += other.behind_camera;
        self.outside_frustum += other.outside_frustum;
        self.rasterized += other.rasterized;
        self.pixels_written += other.pixels_written;
    }
}

/// Rasterize one accepted triangle whose corners are already in edge-test order
fn rasterize_triangle(
    fb: &mut Framebuffer,
    screen: [&ScreenVertex; 3],
    attrs: [&VertexOut; 3],
    materials: &Materials,
    settings: &RasterSettings,
) -> usize {
    let bbox = BoundingBox::of(screen, fb.width, fb.height);
    let corners = screen.map(|v| v.xy());
    let zs = screen.map(|v| v.z);
    let ws = screen.map(|v| v.w);

    let options = ShadeOptions {
        mode: settings.shading,
        use_normal_map: settings.use_normal_map,
    };

    let mut written = 0;
    for y in bbox.min_y..bbox.max_y {
        for x in bbox.min_x..bbox.max_x {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let Some(weights) = barycentric_weights(p, corners) else {
                continue;
            };

            let Some(depth) = harmonic(weights, zs) else {
                continue;
            };
            if fb.depth_at(x, y) <= depth {
                continue;
            }
            let Some(interpolated_w) = harmonic(weights, ws) else {
                continue;
            };

            let sample = SurfaceSample {
                depth,
                color: interpolate(attrs.map(|a| a.color), weights, ws, interpolated_w),
                uv: interpolate(attrs.map(|a| a.uv), weights, ws, interpolated_w),
                normal: interpolate(attrs.map(|a| a.normal), weights, ws, interpolated_w),
                tangent: interpolate(attrs.map(|a| a.tangent), weights, ws, interpolated_w),
                view_direction: interpolate(attrs.map(|a| a.view_direction), weights, ws, interpolated_w),
            };

            let color = if settings.show_depth {
                depth_color(depth, settings.depth_remap)
            } else {
                shade_pixel(&sample, materials, options)
            };

            fb.write(x, y, depth, color);
            written += 1;
        }
    }
    written
}

/// Render a mesh into the framebuffer (which the caller cleared for this frame)
pub fn render_mesh(
    fb: &mut Framebuffer,
    mesh: &Mesh,
    view: &ViewParams,
    materials: &Materials,
    settings: &RasterSettings,
) -> RenderStats {
    let vertices_out = transform_vertices(mesh, &view.view, &view.projection, view.origin);
    let screen = to_screen_space(&vertices_out, fb.width, fb.height);

    let mut stats = RenderStats::default();
    for tri in mesh.triangles() {
        stats.triangles += 1;

        let [a, b, c] = tri.corners;
        let indices = [mesh.indices[a], mesh.indices[b], mesh.indices[c]];
        let class = classify(
            indices,
            [&vertices_out[a], &vertices_out[b], &vertices_out[c]],
            settings.frustum_margin,
        );
        match class {
            Classification::Accepted => {}
            Classification::Degenerate => {
                stats.degenerate += 1;
                continue;
            }
            Classification::BehindCamera => {
                stats.behind_camera += 1;
                continue;
            }
            Classification::OutsideFrustum => {
                stats.outside_frustum += 1;
                continue;
            }
        }

        let [a, b, c] = tri.ordered();
        stats.rasterized += 1;
        stats.pixels_written += rasterize_triangle(
            fb,
            [&screen[a], &screen[b], &screen[c]],
            [&vertices_out[a], &vertices_out[b], &vertices_out[c]],
            materials,
            settings,
        );
    }

    debug!(
        "mesh: {} triangles, {} rasterized, {} degenerate, {} behind camera, {} outside frustum, {} pixels",
        stats.triangles,
        stats.rasterized,
        stats.degenerate,
        stats.behind_camera,
        stats.outside_frustum,
        stats.pixels_written
    );
    stats
}
