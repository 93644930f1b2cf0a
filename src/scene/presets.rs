//! Built-in meshes for the renderer
//!
//! Stand-ins for loaded model files: a single triangle, a 3x3-vertex quad as
//! list and as strip, and a unit cube with tangents for normal mapping.

use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::rasterizer::{ColorRGB, Matrix, Mesh, PrimitiveTopology, Vec2, Vec3, Vertex};

/// Which built-in mesh to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScenePreset {
    Triangle,
    QuadList,
    QuadStrip,
    #[default]
    Cube,
}

impl ScenePreset {
    pub fn build(self) -> Result<Mesh> {
        match self {
            ScenePreset::Triangle => create_triangle(),
            ScenePreset::QuadList => create_quad(PrimitiveTopology::TriangleList),
            ScenePreset::QuadStrip => create_quad(PrimitiveTopology::TriangleStrip),
            ScenePreset::Cube => create_cube(),
        }
    }
}

const FACING_CAMERA: Vec3 = Vec3 { x: 0.0, y: 0.0, z: -1.0 };

/// Single colored triangle in the z = 0 plane
pub fn create_triangle() -> Result<Mesh> {
    let vertices = vec![
        Vertex::new(Vec3::new(0.0, 2.0, 0.0), Vec2::new(0.5, 0.0), FACING_CAMERA, Vec3::UNIT_X)
            .with_color(ColorRGB::new(1.0, 0.0, 0.0)),
        Vertex::new(Vec3::new(2.0, -2.0, 0.0), Vec2::new(1.0, 1.0), FACING_CAMERA, Vec3::UNIT_X)
            .with_color(ColorRGB::new(0.0, 1.0, 0.0)),
        Vertex::new(Vec3::new(-2.0, -2.0, 0.0), Vec2::new(0.0, 1.0), FACING_CAMERA, Vec3::UNIT_X)
            .with_color(ColorRGB::new(0.0, 0.0, 1.0)),
    ];
    Mesh::new(vertices, vec![0, 1, 2], PrimitiveTopology::TriangleList)
}

/// 6x6 quad built from a 3x3 vertex grid.
///
/// The strip variant stitches its two rows together with degenerate
/// triangles (repeated indices), which the classifier skips.
pub fn create_quad(topology: PrimitiveTopology) -> Result<Mesh> {
    let mut vertices = Vec::with_capacity(9);
    for row in 0..3 {
        for col in 0..3 {
            let x = -3.0 + 3.0 * col as f32;
            let y = 3.0 - 3.0 * row as f32;
            let uv = Vec2::new(col as f32 * 0.5, row as f32 * 0.5);
            vertices.push(Vertex::new(Vec3::new(x, y, -2.0), uv, FACING_CAMERA, Vec3::UNIT_X));
        }
    }

    let indices = match topology {
        PrimitiveTopology::TriangleList => vec![
            3, 0, 1, 1, 4, 3, 4, 1, 2,
            2, 5, 4, 6, 3, 4, 4, 7, 6,
            7, 4, 5, 5, 8, 7,
        ],
        PrimitiveTopology::TriangleStrip => vec![
            3, 0, 4, 1, 5, 2,
            2, 6,
            6, 3, 7, 4, 8, 5,
        ],
    };
    Mesh::new(vertices, indices, topology)
}

/// Unit cube, four vertices per face so every face gets its own normal,
/// tangent and full 0..1 UV square
pub fn create_cube() -> Result<Mesh> {
    // (outward normal, face-up direction)
    let faces = [
        (Vec3::new(0.0, 0.0, -1.0), Vec3::UNIT_Y),
        (Vec3::new(0.0, 0.0, 1.0), Vec3::UNIT_Y),
        (Vec3::new(1.0, 0.0, 0.0), Vec3::UNIT_Y),
        (Vec3::new(-1.0, 0.0, 0.0), Vec3::UNIT_Y),
        (Vec3::new(0.0, 1.0, 0.0), Vec3::UNIT_Z),
        (Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, up) in faces {
        // Right-hand side of the face as seen from outside
        let right = normal.cross(up);
        let base = vertices.len() as u32;

        let corners = [
            (normal - right - up, Vec2::new(0.0, 1.0)),
            (normal - right + up, Vec2::new(0.0, 0.0)),
            (normal + right + up, Vec2::new(1.0, 0.0)),
            (normal + right - up, Vec2::new(1.0, 1.0)),
        ];
        for (pos, uv) in corners {
            vertices.push(Vertex::new(pos, uv, normal, right));
        }

        // Two triangles per face, clockwise as seen from outside
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Ok(Mesh::new(vertices, indices, PrimitiveTopology::TriangleList)?
        .with_world(Matrix::rotation_y(0.6) * Matrix::rotation_x(-0.4)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{Camera, Classification, classify, transform_vertices};

    #[test]
    fn test_all_presets_build() {
        for preset in [ScenePreset::Triangle, ScenePreset::QuadList, ScenePreset::QuadStrip, ScenePreset::Cube] {
            assert!(preset.build().is_ok(), "{:?}", preset);
        }
    }

    #[test]
    fn test_strip_connectors_are_degenerate() {
        let mesh = create_quad(PrimitiveTopology::TriangleStrip).unwrap();
        let degenerate = mesh
            .triangles()
            .filter(|t| {
                let [a, b, c] = t.corners.map(|k| mesh.indices[k]);
                a == b || b == c || a == c
            })
            .count();
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(degenerate, 4);
    }

    #[test]
    fn test_cube_faces_are_unit_and_tangent_orthogonal() {
        let mesh = create_cube().unwrap();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        for v in &mesh.vertices {
            assert!(v.normal.dot(v.tangent).abs() < 0.001);
            assert!((v.position.x.abs() - 1.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_quad_visible_from_default_camera() {
        let mesh = create_quad(PrimitiveTopology::TriangleList).unwrap();
        let mut cam = Camera::default();
        cam.aspect_ratio = 4.0 / 3.0;
        let out = transform_vertices(&mesh, &cam.view_matrix(), &cam.projection_matrix(), cam.origin);
        for t in mesh.triangles() {
            let [a, b, c] = t.corners;
            let class = classify(
                [mesh.indices[a], mesh.indices[b], mesh.indices[c]],
                [&out[a], &out[b], &out[c]],
                0.0,
            );
            assert_eq!(class, Classification::Accepted);
        }
    }
}
