//! Vertex stage: model space to NDC, one output per index entry

use super::math::{Matrix, Vec3};
use super::types::{Mesh, VertexOut};

/// Transform every index entry of `mesh`.
///
/// Attributes are duplicated per index entry rather than per unique vertex,
/// so `out[k]` always belongs to `mesh.indices[k]`. Positions are divided by
/// w (x, y, z only); w is kept for perspective-correct interpolation.
pub fn transform_vertices(mesh: &Mesh, view: &Matrix, projection: &Matrix, camera_origin: Vec3) -> Vec<VertexOut> {
    let world_view_projection = mesh.world * *view * *projection;

    mesh.indices
        .iter()
        .map(|&index| {
            let v = &mesh.vertices[index as usize];

            let mut position = world_view_projection.transform_point(v.position);
            let world_position = mesh.world.transform_point(v.position).xyz();

            position.x /= position.w;
            position.y /= position.w;
            position.z /= position.w;

            VertexOut {
                position,
                color: v.color,
                uv: v.uv,
                normal: mesh.world.transform_vector(v.normal).normalize(),
                tangent: mesh.world.transform_vector(v.tangent).normalize(),
                view_direction: world_position - camera_origin,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::Vec2;
    use crate::rasterizer::types::{PrimitiveTopology, Vertex};

    fn mesh() -> Mesh {
        let vertices = vec![
            Vertex::new(Vec3::new(0.0, 1.0, 2.0), Vec2::new(0.5, 0.0), Vec3::UNIT_Y, Vec3::UNIT_X),
            Vertex::new(Vec3::new(1.0, 0.0, 2.0), Vec2::new(1.0, 1.0), Vec3::UNIT_Y, Vec3::UNIT_X),
            Vertex::new(Vec3::new(-1.0, 0.0, 2.0), Vec2::new(0.0, 1.0), Vec3::UNIT_Y, Vec3::UNIT_X),
        ];
        Mesh::new(vertices, vec![0, 1, 2, 2, 1, 0], PrimitiveTopology::TriangleList).unwrap()
    }

    #[test]
    fn test_one_output_per_index() {
        let m = mesh();
        let out = transform_vertices(&m, &Matrix::IDENTITY, &Matrix::IDENTITY, Vec3::ZERO);
        assert_eq!(out.len(), m.indices.len());
        assert_eq!(out[0], out[5]);
        assert_eq!(out[3].uv, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_divide_keeps_w() {
        let m = mesh();
        // Projection that copies z into w
        let mut proj = Matrix::IDENTITY;
        proj.rows[2][3] = 1.0;
        proj.rows[3][3] = 0.0;
        let out = transform_vertices(&m, &Matrix::IDENTITY, &proj, Vec3::ZERO);
        assert!((out[0].position.w - 2.0).abs() < 0.001);
        assert!((out[0].position.y - 0.5).abs() < 0.001);
        assert!((out[0].position.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_world_rotates_normals_and_offsets_view_direction() {
        let m = mesh()
            .with_world(Matrix::rotation_x(std::f32::consts::FRAC_PI_2) * Matrix::translation(Vec3::new(0.0, 0.0, 3.0)));
        let origin = Vec3::new(0.0, 0.0, -1.0);
        let out = transform_vertices(&m, &Matrix::IDENTITY, &Matrix::IDENTITY, origin);
        // +Y rotates onto +Z about X
        assert!((out[0].normal.z - 1.0).abs() < 0.001);
        assert!((out[0].tangent.x - 1.0).abs() < 0.001);
        // Vertex 0 lands at (0, -2, 4) in world space
        let world = m.world.transform_point(m.vertices[0].position).xyz();
        assert!((world.y + 2.0).abs() < 0.001);
        let expected = world - origin;
        assert!((out[0].view_direction - expected).len() < 0.001);
    }
}
