/// Frame driver
///
/// [`RenderContext`] owns the camera, mesh, texture and depth buffer for a
/// session. The frame loop owns the color buffer and calls, per tick,
/// [`RenderContext::update`] followed by [`RenderContext::render`] (or the
/// explicit `begin_frame` / `draw` / `end_frame` sequence).
use nalgebra::{Point2, Point3, Vector3};

use crate::assets;
use crate::buffer::{ColorBuffer, DepthBuffer};
use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::controls::{apply_controls, KeyState};
use crate::geometry::Mesh;
use crate::raster::{fill_triangle, ScreenTriangle, TriangleOutcome};
use crate::texture::Texture;

/// Depth buffer value for "nothing drawn here yet"
pub const FAR_DEPTH: f32 = f32::INFINITY;

/// Counters for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Complete triangles in the mesh
    pub triangles: usize,
    /// Triangles that reached the pixel loop
    pub drawn: usize,
    /// Degenerate projections, zero-area and full-extent triangles
    pub skipped: usize,
    /// Fragments that passed the depth test
    pub pixels: usize,
}

pub struct RenderContext {
    config: RenderConfig,
    camera: Camera,
    mesh: Mesh,
    texture: Texture,
    depth_buffer: DepthBuffer,
}

impl RenderContext {
    pub fn new(config: RenderConfig, mesh: Mesh, texture: Texture) -> Self {
        let mut camera = Camera::new();
        let initial = &config.camera;

        // Failures are logged by the camera, which keeps its defaults
        let _ = camera.look_at(
            Point3::from(initial.eye),
            Point3::from(initial.center),
            Vector3::from(initial.up),
        );
        let _ = camera.perspective(initial.fov, config.aspect(), initial.near, initial.far);

        let depth_buffer = DepthBuffer::new(config.width, config.height, FAR_DEPTH);

        Self {
            config,
            camera,
            mesh,
            texture,
            depth_buffer,
        }
    }

    /// Load the configured mesh and texture.
    ///
    /// Missing or invalid assets are logged and replaced by an empty mesh or
    /// texture; the context still renders, just without geometry.
    pub fn load(config: RenderConfig) -> Self {
        let mesh = assets::load_obj(&config.assets.mesh).unwrap_or_else(|err| {
            log::error!("Mesh {:?} not loaded: {}", config.assets.mesh, err);
            Mesh::new()
        });
        let texture = assets::load_texture(&config.assets.texture).unwrap_or_else(|err| {
            log::error!("Texture {:?} not loaded: {}", config.assets.texture, err);
            Texture::empty()
        });

        Self::new(config, mesh, texture)
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth_buffer
    }

    /// Clear `color` to the background and prepare a matching, empty depth buffer
    pub fn begin_frame(&mut self, color: &mut ColorBuffer) {
        color.fill(self.config.background);

        if self.depth_buffer.width() != color.width()
            || self.depth_buffer.height() != color.height()
        {
            self.depth_buffer
                .resize(color.width(), color.height(), FAR_DEPTH);
        } else {
            self.depth_buffer.fill(FAR_DEPTH);
        }
    }

    /// Project and rasterize every triangle of the mesh into `color`
    pub fn draw(&mut self, color: &mut ColorBuffer) -> FrameStats {
        let mut stats = FrameStats {
            triangles: self.mesh.triangle_count(),
            ..FrameStats::default()
        };

        if self.texture.is_empty() {
            stats.skipped = stats.triangles;
            return stats;
        }

        let (width, height) = (color.width() as f32, color.height() as f32);
        let (texture_width, texture_height) =
            (self.texture.width() as f32, self.texture.height() as f32);

        for (positions, uvs) in self.mesh.triangles() {
            let projected = positions.map(|p| self.camera.project_vector(&p));
            let [Some(p0), Some(p1), Some(p2)] = projected else {
                stats.skipped += 1;
                continue;
            };

            let triangle = ScreenTriangle {
                positions: [p0, p1, p2]
                    .map(|ndc| ndc_to_screen(&ndc, width, height, self.config.flip_y)),
                uvs: uvs.map(|uv| Point2::new(uv.x * texture_width, uv.y * texture_height)),
            };

            match fill_triangle(color, &triangle, &self.texture, &mut self.depth_buffer) {
                TriangleOutcome::Drawn { pixels } => {
                    stats.drawn += 1;
                    stats.pixels += pixels;
                }
                _ => stats.skipped += 1,
            }
        }

        stats
    }

    /// Reset the depth buffer for the next frame
    pub fn end_frame(&mut self) {
        self.depth_buffer.fill(FAR_DEPTH);
    }

    /// Draw one complete frame into `color`
    pub fn render(&mut self, color: &mut ColorBuffer) -> FrameStats {
        self.begin_frame(color);
        let stats = self.draw(color);
        self.end_frame();

        log::debug!(
            "Frame: {}/{} triangles drawn, {} skipped, {} pixels",
            stats.drawn,
            stats.triangles,
            stats.skipped,
            stats.pixels
        );
        stats
    }

    /// Apply keyboard controls for `seconds` of elapsed time, then rebuild
    /// both camera matrices
    pub fn update(&mut self, seconds: f32, keys: &KeyState) {
        apply_controls(&mut self.camera, keys, seconds, &self.config.controls);

        // On failure the camera logs and keeps its previous matrices
        let _ = self.camera.update_view_matrix();
        let _ = self.camera.update_projection_matrix();
    }

    /// Match a new color buffer size: depth buffer dimensions and camera aspect
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return;
        }

        log::info!("Resizing render target to {}x{}", width, height);
        self.config.width = width;
        self.config.height = height;
        self.depth_buffer.resize(width, height, FAR_DEPTH);
        let _ = self.camera.set_aspect(self.config.aspect());
    }
}

/// Map NDC x,y in [-1, 1] to pixel coordinates; z passes through.
///
/// Without `flip_y`, NDC -1 maps to row 0.
fn ndc_to_screen(ndc: &Point3<f32>, width: f32, height: f32, flip_y: bool) -> Point3<f32> {
    let x = (ndc.x + 1.0) * width / 2.0;
    let y = if flip_y {
        (1.0 - ndc.y) * height / 2.0
    } else {
        (ndc.y + 1.0) * height / 2.0
    };
    Point3::new(x, y, ndc.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Color;
    use crate::controls::Key;
    use crate::geometry::Vertex;
    use approx::assert_relative_eq;

    /// 10x10 target, camera at the origin looking down -z, depth -2 maps to NDC 0.5
    fn test_config(flip_y: bool) -> RenderConfig {
        let mut config = RenderConfig {
            width: 10,
            height: 10,
            flip_y,
            ..RenderConfig::default()
        };
        config.camera.eye = [0.0, 0.0, 0.0];
        config.camera.center = [0.0, 0.0, -1.0];
        config.camera.fov = 90.0;
        config.camera.near = 1.0;
        config.camera.far = 3.0;
        config
    }

    fn right_triangle(z: f32) -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_triangle(
            Vertex::new(-1.2, -1.2, z, 0.0, 0.0),
            Vertex::new(1.2, -1.2, z, 1.0, 0.0),
            Vertex::new(-1.2, 1.2, z, 0.0, 1.0),
        );
        mesh
    }

    #[test]
    fn test_ndc_to_screen() {
        let ndc = Point3::new(-1.0, 1.0, 0.25);
        assert_eq!(ndc_to_screen(&ndc, 800.0, 600.0, false), Point3::new(0.0, 600.0, 0.25));
        assert_eq!(ndc_to_screen(&ndc, 800.0, 600.0, true), Point3::new(0.0, 0.0, 0.25));
    }

    #[test]
    fn test_empty_scene_only_clears() {
        let config = RenderConfig::default();
        let background = config.background;
        let mut context = RenderContext::new(config, Mesh::new(), Texture::solid(Color::RED));
        let mut color = ColorBuffer::new(16, 9, Color::WHITE);

        let stats = context.render(&mut color);
        assert_eq!(stats, FrameStats::default());
        assert!(color.as_slice().iter().all(|c| *c == background));
        assert_eq!(context.depth_buffer().width(), 16);
        assert_eq!(context.depth_buffer().height(), 9);
    }

    #[test]
    fn test_y_orientation() {
        for flip_y in [false, true] {
            let mut context = RenderContext::new(
                test_config(flip_y),
                right_triangle(-2.0),
                Texture::solid(Color::GREEN),
            );
            let mut color = ColorBuffer::new(10, 10, Color::BLACK);
            context.render(&mut color);

            assert_eq!(color.get(2, 5), Some(Color::GREEN));
            let lower_right = color.get(6, 2);
            if flip_y {
                assert_ne!(lower_right, Some(Color::GREEN));
            } else {
                assert_eq!(lower_right, Some(Color::GREEN));
            }
        }
    }

    #[test]
    fn test_render_resets_depth_at_end_of_frame() {
        let mut context = RenderContext::new(
            test_config(false),
            right_triangle(-2.0),
            Texture::solid(Color::GREEN),
        );
        let mut color = ColorBuffer::new(10, 10, Color::BLACK);

        context.begin_frame(&mut color);
        let stats = context.draw(&mut color);
        assert_eq!(stats.drawn, 1);
        assert_relative_eq!(context.depth_buffer().get(3, 3).unwrap(), 0.5, epsilon = 1e-4);

        context.end_frame();
        assert!(context.depth_buffer().as_slice().iter().all(|d| *d == FAR_DEPTH));
    }

    #[test]
    fn test_triangle_through_eye_is_skipped() {
        let mut mesh = Mesh::new();
        mesh.add_triangle(
            Vertex::new(0.0, 0.0, 0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, -2.0, 1.0, 0.0),
            Vertex::new(0.0, 1.0, -2.0, 0.0, 1.0),
        );
        let mut context = RenderContext::new(test_config(false), mesh, Texture::solid(Color::RED));
        let mut color = ColorBuffer::new(10, 10, Color::BLACK);

        let stats = context.render(&mut color);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.pixels, 0);
    }

    #[test]
    fn test_missing_assets_degrade_to_empty_frame() {
        let mut config = test_config(true);
        config.assets.mesh = "does/not/exist.obj".into();
        config.assets.texture = "does/not/exist.tga".into();

        let mut context = RenderContext::load(config);
        assert!(context.mesh().is_empty());
        assert!(context.texture().is_empty());

        let mut color = ColorBuffer::new(10, 10, Color::BLACK);
        let stats = context.render(&mut color);
        assert_eq!(stats.pixels, 0);
    }

    #[test]
    fn test_empty_texture_draws_nothing() {
        let mut context =
            RenderContext::new(test_config(false), right_triangle(-2.0), Texture::empty());
        let mut color = ColorBuffer::new(10, 10, Color::BLACK);

        let stats = context.render(&mut color);
        assert_eq!(stats.triangles, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.drawn, 0);
    }

    #[test]
    fn test_update_moves_camera_and_rebuilds_matrices() {
        let mut context =
            RenderContext::new(RenderConfig::default(), Mesh::new(), Texture::empty());
        let view_before = *context.camera().view_matrix();
        let projection_before = *context.camera().projection_matrix();

        let keys: KeyState = [Key::Up, Key::F].into_iter().collect();
        context.update(0.5, &keys);

        let camera = context.camera();
        assert_relative_eq!(camera.eye.y, 12.5);
        assert_relative_eq!(camera.fov, 62.5);
        assert_ne!(*camera.view_matrix(), view_before);
        assert_ne!(*camera.projection_matrix(), projection_before);
        assert_relative_eq!(
            *camera.viewprojection_matrix(),
            camera.projection_matrix() * camera.view_matrix()
        );
    }

    #[test]
    fn test_resize_updates_depth_and_aspect() {
        let mut context =
            RenderContext::new(RenderConfig::default(), Mesh::new(), Texture::empty());

        context.resize(320, 160);
        assert_eq!(context.depth_buffer().width(), 320);
        assert_eq!(context.depth_buffer().height(), 160);
        assert_relative_eq!(context.camera().aspect, 2.0);

        context.resize(0, 50);
        assert_eq!(context.depth_buffer().width(), 320);
    }
}
