//! Pixel shading: observed area, Lambert diffuse and Phong specular under a
//! single directional light, with optional tangent-space normal mapping.

use std::f32::consts::PI;

use super::math::{Vec2, Vec3};
use super::texture::Materials;
use super::types::{ColorRGB, ShadingMode};

/// Direction the light travels in (world space, normalized on use)
pub const LIGHT_DIRECTION: Vec3 = Vec3 { x: 0.577, y: -0.577, z: 0.577 };
/// Diffuse reflectance (light intensity folded in)
pub const DIFFUSE_REFLECTANCE: f32 = 7.0;
/// Scales the glossiness map into a Phong exponent
pub const SHININESS: f32 = 25.0;
pub const AMBIENT: ColorRGB = ColorRGB { r: 0.025, g: 0.025, b: 0.025 };

/// Interpolated surface attributes at one pixel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceSample {
    pub depth: f32,
    pub color: ColorRGB,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub view_direction: Vec3,
}

/// Per-frame shading switches, passed in explicitly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadeOptions {
    pub mode: ShadingMode,
    pub use_normal_map: bool,
}

/// Compute the final color of one surface sample
pub fn shade_pixel(sample: &SurfaceSample, materials: &Materials, options: ShadeOptions) -> ColorRGB {
    let light = LIGHT_DIRECTION.normalize();
    let normal = shading_normal(sample, materials, options.use_normal_map);

    let observed_area = observed_area(normal, light);

    let lit = match options.mode {
        ShadingMode::ObservedArea => ColorRGB::gray(observed_area),
        ShadingMode::Diffuse => diffuse(sample, materials) * observed_area,
        ShadingMode::Specular => phong(sample, materials, normal, light) * observed_area,
        ShadingMode::Combined => {
            (diffuse(sample, materials) + phong(sample, materials, normal, light)) * observed_area
        }
    };

    (lit + AMBIENT).max_to_one()
}

/// Lambert cosine term: how directly the surface faces the light
pub fn observed_area(normal: Vec3, light_direction: Vec3) -> f32 {
    normal.dot(-light_direction).max(0.0)
}

fn shading_normal(sample: &SurfaceSample, materials: &Materials, use_normal_map: bool) -> Vec3 {
    let normal = sample.normal.normalize();
    let map = match (use_normal_map, &materials.normal) {
        (true, Some(map)) => map,
        _ => return normal,
    };

    let tangent = sample.tangent.normalize();
    let bitangent = normal.cross(tangent);

    let texel = map.sample(sample.uv);
    let local = Vec3::new(2.0 * texel.r - 1.0, 2.0 * texel.g - 1.0, 2.0 * texel.b - 1.0);

    (tangent * local.x + bitangent * local.y + normal * local.z).normalize()
}

fn diffuse(sample: &SurfaceSample, materials: &Materials) -> ColorRGB {
    let albedo = materials
        .diffuse
        .as_ref()
        .map_or(sample.color, |tex| tex.sample(sample.uv));
    albedo * (DIFFUSE_REFLECTANCE / PI)
}

fn phong(sample: &SurfaceSample, materials: &Materials, normal: Vec3, light: Vec3) -> ColorRGB {
    let to_eye = -sample.view_direction.normalize();
    let cos_alpha = light.reflect(normal).dot(to_eye);
    if cos_alpha < 0.0 {
        return ColorRGB::BLACK;
    }

    let gloss = materials.gloss.as_ref().map_or(1.0, |tex| tex.sample(sample.uv).r);
    let specular = materials
        .specular
        .as_ref()
        .map_or(sample.color, |tex| tex.sample(sample.uv));

    specular * cos_alpha.powf(gloss * SHININESS)
}

/// Grey level for the depth visualization, `near..far` stretched to `0..1`
pub fn depth_color(depth: f32, (near, far): (f32, f32)) -> ColorRGB {
    let t = ((depth - near) / (far - near)).clamp(0.0, 1.0);
    ColorRGB::gray(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::texture::Texture;
    use crate::rasterizer::types::Color;

    fn options(mode: ShadingMode) -> ShadeOptions {
        ShadeOptions { mode, use_normal_map: false }
    }

    fn glossy_materials() -> Materials {
        Materials {
            diffuse: Some(Texture::solid(1, 1, Color::new(40, 40, 40))),
            normal: None,
            gloss: Some(Texture::solid(1, 1, Color::new(255, 255, 255))),
            specular: Some(Texture::solid(1, 1, Color::new(255, 255, 255))),
        }
    }

    /// Surface facing straight back at the light, viewed along the mirror direction
    fn lit_sample() -> SurfaceSample {
        let light = LIGHT_DIRECTION.normalize();
        SurfaceSample {
            depth: 0.5,
            color: ColorRGB::WHITE,
            uv: Vec2::new(0.5, 0.5),
            normal: -light,
            tangent: Vec3::UNIT_Y.cross(-light).normalize(),
            view_direction: light,
        }
    }

    fn unlit_sample() -> SurfaceSample {
        SurfaceSample {
            normal: LIGHT_DIRECTION.normalize(),
            ..lit_sample()
        }
    }

    #[test]
    fn test_observed_area_clamps_at_zero() {
        let light = LIGHT_DIRECTION.normalize();
        assert!((observed_area(-light, light) - 1.0).abs() < 0.001);
        assert_eq!(observed_area(light, light), 0.0);
    }

    #[test]
    fn test_modes_differ_on_lit_glossy_surface() {
        let m = glossy_materials();
        let s = lit_sample();
        let diffuse = shade_pixel(&s, &m, options(ShadingMode::Diffuse));
        let specular = shade_pixel(&s, &m, options(ShadingMode::Specular));
        assert_ne!(diffuse, specular);
        // Head-on highlight saturates
        assert!((specular.r - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_unlit_surface_is_ambient_in_every_mode() {
        let m = glossy_materials();
        let s = unlit_sample();
        for mode in [ShadingMode::ObservedArea, ShadingMode::Diffuse, ShadingMode::Specular, ShadingMode::Combined] {
            assert_eq!(shade_pixel(&s, &m, options(mode)), AMBIENT);
        }
    }

    #[test]
    fn test_channels_never_exceed_one() {
        let m = glossy_materials();
        let c = shade_pixel(&lit_sample(), &m, options(ShadingMode::Combined));
        assert!(c.r <= 1.0 && c.g <= 1.0 && c.b <= 1.0);
    }

    #[test]
    fn test_missing_diffuse_uses_vertex_color() {
        let m = Materials::default();
        let s = SurfaceSample { color: ColorRGB::new(0.1, 0.0, 0.0), ..lit_sample() };
        let c = shade_pixel(&s, &m, options(ShadingMode::Diffuse));
        assert!(c.r > c.g);
        assert!((c.g - AMBIENT.g).abs() < 0.001);
    }

    #[test]
    fn test_flat_normal_map_matches_geometric_normal() {
        // (128, 128, 255) encodes the unperturbed tangent-space normal
        let mut m = glossy_materials();
        m.normal = Some(Texture::solid(1, 1, Color::new(128, 128, 255)));
        let s = lit_sample();
        let with_map = shade_pixel(&s, &m, ShadeOptions { mode: ShadingMode::ObservedArea, use_normal_map: true });
        let without = shade_pixel(&s, &m, options(ShadingMode::ObservedArea));
        assert!((with_map.r - without.r).abs() < 0.01);
    }

    #[test]
    fn test_tilted_normal_map_darkens() {
        let mut m = glossy_materials();
        m.normal = Some(Texture::solid(1, 1, Color::new(255, 128, 128)));
        let s = lit_sample();
        let with_map = shade_pixel(&s, &m, ShadeOptions { mode: ShadingMode::ObservedArea, use_normal_map: true });
        assert!(with_map.r < 0.1);
    }

    #[test]
    fn test_depth_color_remap() {
        assert_eq!(depth_color(0.9, (0.985, 1.0)), ColorRGB::BLACK);
        assert!((depth_color(0.9925, (0.985, 1.0)).r - 0.5).abs() < 0.01);
    }
}
