//! Primitive classification: cheap per-triangle rejects before any pixel work.
//!
//! The frustum test is a per-vertex reject, not clipping: a triangle with
//! any corner outside the NDC volume is dropped whole.

use super::types::VertexOut;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Accepted,
    /// Two corners share an index
    Degenerate,
    /// A corner has w <= 0
    BehindCamera,
    /// A corner lies outside the NDC volume
    OutsideFrustum,
}

/// Classify one triangle from its three indices and transformed corners
pub fn classify(indices: [u32; 3], corners: [&VertexOut; 3], frustum_margin: f32) -> Classification {
    let [i0, i1, i2] = indices;
    if i0 == i1 || i1 == i2 || i0 == i2 {
        return Classification::Degenerate;
    }

    if corners.iter().any(|v| v.position.w <= 0.0) {
        return Classification::BehindCamera;
    }

    if !corners.iter().all(|v| in_frustum(v, frustum_margin)) {
        return Classification::OutsideFrustum;
    }

    Classification::Accepted
}

fn in_frustum(v: &VertexOut, margin: f32) -> bool {
    let p = v.position;
    let xy = -1.0 - margin..=1.0 + margin;
    let z = -margin..=1.0 + margin;
    xy.contains(&p.x) && xy.contains(&p.y) && z.contains(&p.z)
}
