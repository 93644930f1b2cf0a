//! Per-frame orchestration
//!
//! Owns the frame buffer, camera, meshes and materials. `update` advances
//! animation between frames; `render` runs the whole pipeline for every mesh
//! on the calling thread and leaves a complete frame in the buffer.

use std::path::Path;

use log::{debug, info};

use crate::error::Result;
use crate::rasterizer::{
    render_mesh, Camera, Framebuffer, Materials, Matrix, Mesh, RasterSettings, RenderStats, ShadingMode, ViewParams,
};
use crate::scene::Settings;

/// A mesh plus the world transform it was given, which rotation is applied on top of
struct Model {
    mesh: Mesh,
    base_world: Matrix,
}

pub struct Renderer {
    framebuffer: Framebuffer,
    pub camera: Camera,
    pub settings: RasterSettings,
    pub materials: Materials,
    models: Vec<Model>,
    rotating: bool,
    /// Radians per second
    rotation_speed: f32,
    rotation: f32,
}

impl Renderer {
    pub fn new(width: usize, height: usize, settings: RasterSettings) -> Self {
        let mut camera = Camera::default();
        camera.aspect_ratio = width as f32 / height as f32;
        Self {
            framebuffer: Framebuffer::new(width, height),
            camera,
            settings,
            materials: Materials::default(),
            models: Vec::new(),
            rotating: false,
            rotation_speed: 1.0,
            rotation: 0.0,
        }
    }

    /// Build a renderer from loaded settings: preset mesh, textures, camera
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;

        let mut renderer = Self::new(settings.width, settings.height, settings.raster.clone());
        renderer.camera = settings.camera.clone();
        renderer.camera.aspect_ratio = settings.aspect_ratio();
        renderer.rotating = settings.rotate;
        renderer.rotation_speed = settings.rotation_speed;

        let t = &settings.textures;
        renderer.materials = Materials::load(
            t.diffuse.as_deref(),
            t.normal.as_deref(),
            t.gloss.as_deref(),
            t.specular.as_deref(),
        );

        renderer.add_mesh(settings.scene.build()?);
        info!(
            "Renderer ready: {}x{}, scene {:?}, shading {:?}",
            settings.width, settings.height, settings.scene, settings.raster.shading
        );
        Ok(renderer)
    }

    pub fn add_mesh(&mut self, mesh: Mesh) {
        let base_world = mesh.world;
        self.models.push(Model { mesh, base_world });
    }

    /// Advance animation by `delta_seconds`. Never called mid-frame.
    pub fn update(&mut self, delta_seconds: f32) {
        if self.rotating {
            self.rotation = (self.rotation + self.rotation_speed * delta_seconds) % std::f32::consts::TAU;
        }
        let spin = Matrix::rotation_y(self.rotation);
        for model in &mut self.models {
            model.mesh.world = spin * model.base_world;
        }
    }

    /// Clear both buffers and render every mesh
    pub fn render(&mut self) -> RenderStats {
        self.framebuffer.clear(self.settings.background);

        let view = ViewParams::from(&self.camera);
        let mut stats = RenderStats::default();
        for model in &self.models {
            stats.merge(render_mesh(
                &mut self.framebuffer,
                &model.mesh,
                &view,
                &self.materials,
                &self.settings,
            ));
        }

        debug!("frame: {} of {} triangles drawn, {} pixels", stats.rasterized, stats.triangles, stats.pixels_written);
        stats
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn save_buffer_to_image<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.framebuffer.save_image(path)?;
        info!("Saved color buffer to {}", path.display());
        Ok(())
    }

    pub fn toggle_depth_visuals(&mut self) {
        self.settings.show_depth = !self.settings.show_depth;
        info!("Depth buffer visuals: {}", self.settings.show_depth);
    }

    pub fn toggle_normal_map(&mut self) {
        self.settings.use_normal_map = !self.settings.use_normal_map;
        info!("Normal map: {}", self.settings.use_normal_map);
    }

    pub fn toggle_rotation(&mut self) {
        self.rotating = !self.rotating;
        info!("Rotation: {}", self.rotating);
    }

    pub fn cycle_shading_mode(&mut self) -> ShadingMode {
        self.settings.shading = self.settings.shading.next();
        info!("Shading mode: {:?}", self.settings.shading);
        self.settings.shading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{Color, Texture};
    use crate::scene::ScenePreset;

    fn small_settings(scene: ScenePreset) -> Settings {
        Settings {
            width: 64,
            height: 48,
            scene,
            ..Default::default()
        }
    }

    #[test]
    fn test_list_and_strip_quads_render_identically() {
        let mut list = Renderer::from_settings(&small_settings(ScenePreset::QuadList)).unwrap();
        let mut strip = Renderer::from_settings(&small_settings(ScenePreset::QuadStrip)).unwrap();

        let list_stats = list.render();
        let strip_stats = strip.render();

        assert_eq!(list_stats.rasterized, 8);
        assert_eq!(strip_stats.rasterized, 8);
        assert_eq!(strip_stats.degenerate, 4);

        // The two index orders split the cells along different diagonals, so
        // values may differ by rounding but coverage must match
        let (a, b) = (list.framebuffer(), strip.framebuffer());
        for i in 0..a.depth.len() {
            assert_eq!(a.depth[i].is_finite(), b.depth[i].is_finite(), "pixel {}", i);
            if a.depth[i].is_finite() {
                assert!((a.depth[i] - b.depth[i]).abs() < 1e-4);
                let (ca, cb) = (Color::from_u32(a.pixels[i]), Color::from_u32(b.pixels[i]));
                assert!((ca.r as i32 - cb.r as i32).abs() <= 2);
                assert!((ca.g as i32 - cb.g as i32).abs() <= 2);
            }
        }
    }

    #[test]
    fn test_render_resets_buffers_each_frame() {
        let mut r = Renderer::from_settings(&small_settings(ScenePreset::Cube)).unwrap();
        r.render();
        let first = r.framebuffer().pixels.clone();

        // Pointing away from the cube leaves only background
        r.camera.rotate(0.0, std::f32::consts::PI);
        let stats = r.render();
        assert_eq!(stats.pixels_written, 0);
        assert!(r.framebuffer().pixels.iter().all(|&p| p == r.settings.background.to_u32()));
        assert!(r.framebuffer().depth.iter().all(|d| *d == f32::INFINITY));
        assert_ne!(first, r.framebuffer().pixels);
    }

    #[test]
    fn test_rotation_only_when_enabled() {
        let mut r = Renderer::from_settings(&small_settings(ScenePreset::Cube)).unwrap();
        r.update(0.5);
        r.render();
        let still = r.framebuffer().pixels.clone();

        r.toggle_rotation();
        r.update(0.5);
        r.render();
        assert_ne!(still, r.framebuffer().pixels);
    }

    #[test]
    fn test_shading_mode_cycle_and_toggles() {
        let mut r = Renderer::new(8, 8, RasterSettings::default());
        assert_eq!(r.cycle_shading_mode(), ShadingMode::ObservedArea);
        assert_eq!(r.cycle_shading_mode(), ShadingMode::Diffuse);
        r.toggle_depth_visuals();
        assert!(r.settings.show_depth);
        r.toggle_normal_map();
        assert!(!r.settings.use_normal_map);
    }

    #[test]
    fn test_diffuse_texture_changes_output() {
        let mut plain = Renderer::from_settings(&small_settings(ScenePreset::QuadList)).unwrap();
        let mut textured = Renderer::from_settings(&small_settings(ScenePreset::QuadList)).unwrap();
        textured.materials.diffuse = Some(Texture::solid(4, 4, Color::new(10, 200, 10)));

        plain.render();
        textured.render();
        let (w, h) = (64, 48);
        let center_plain = plain.framebuffer().pixel(w / 2, h / 2);
        let center_textured = textured.framebuffer().pixel(w / 2, h / 2);
        assert_ne!(center_plain, center_textured);
        assert!(center_textured.g > center_textured.r);
    }
}
