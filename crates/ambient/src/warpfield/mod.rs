//! Rotating, pointer-warped bands blending up to eight colors.

mod shade;
mod shader;

use glam::Vec2;
use renderer::{ShaderProgram, SurfaceOptions, SurfaceSize, UniformTable};
use scheduler::{FrameClock, FrameTime};

use crate::color::{ColorList, Rgb, MAX_COLORS};
use crate::config::WarpFieldConfig;
use crate::effect::Effect;
use crate::mount::{Bounds, ClientPoint, Viewport};
use crate::pointer::{DeltaSmoother, WARPFIELD_POINTER_RATE};

pub use shade::{color_masks, shade};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpFieldUniforms {
    pub canvas: [f32; 2],
    pub time: f32,
    pub speed: f32,
    /// `(cos, sin)` of the current rotation.
    pub rot: [f32; 2],
    pub color_count: i32,
    pub colors: [Rgb; MAX_COLORS],
    pub transparent: i32,
    pub scale: f32,
    pub frequency: f32,
    pub warp_strength: f32,
    /// Smoothed pointer in normalized device coordinates.
    pub pointer: [f32; 2],
    pub mouse_influence: f32,
    pub parallax: f32,
    pub noise: f32,
}

impl WarpFieldUniforms {
    pub fn to_table(&self) -> UniformTable {
        UniformTable::new()
            .vec2("uCanvas", self.canvas)
            .float("uTime", self.time)
            .float("uSpeed", self.speed)
            .vec2("uRot", self.rot)
            .int("uColorCount", self.color_count)
            .vec3_array("uColors", self.colors.to_vec())
            .int("uTransparent", self.transparent)
            .float("uScale", self.scale)
            .float("uFrequency", self.frequency)
            .float("uWarpStrength", self.warp_strength)
            .vec2("uPointer", self.pointer)
            .float("uMouseInfluence", self.mouse_influence)
            .float("uParallax", self.parallax)
            .float("uNoise", self.noise)
    }
}

/// Rotation in degrees at `elapsed` seconds. The base angle is reduced with
/// a sign-preserving modulo before the continuous term is added.
pub fn rotation_degrees(base: f32, auto_rotate: f32, elapsed: f32) -> f32 {
    (base % 360.0) + auto_rotate * elapsed
}

fn rotation_basis(degrees: f32) -> [f32; 2] {
    let radians = degrees.to_radians();
    [radians.cos(), radians.sin()]
}

pub struct WarpField {
    config: WarpFieldConfig,
    colors: ColorList,
    canvas: [f32; 2],
    surface: SurfaceSize,
    clock: FrameClock,
    elapsed: f32,
    rot: [f32; 2],
    pointer: DeltaSmoother,
}

impl WarpField {
    pub fn colors(&self) -> &ColorList {
        &self.colors
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn snapshot(&self) -> WarpFieldUniforms {
        let config = &self.config;
        WarpFieldUniforms {
            canvas: self.canvas,
            time: self.elapsed,
            speed: config.speed,
            rot: self.rot,
            color_count: self.colors.count() as i32,
            colors: *self.colors.slots(),
            transparent: i32::from(config.transparent),
            scale: config.scale,
            frequency: config.frequency,
            warp_strength: config.warp_strength,
            pointer: self.pointer.current().to_array(),
            mouse_influence: config.mouse_influence,
            parallax: config.parallax,
            noise: config.noise,
        }
    }
}

impl Effect for WarpField {
    type Config = WarpFieldConfig;

    const NAME: &'static str = "WarpField";

    fn new(config: WarpFieldConfig) -> Self {
        let colors = ColorList::from_hex(&config.colors);
        tracing::debug!(colors = colors.count(), "warp field colors parsed");
        Self {
            rot: rotation_basis(rotation_degrees(config.rotation, config.auto_rotate, 0.0)),
            pointer: DeltaSmoother::new(Vec2::ZERO, WARPFIELD_POINTER_RATE),
            config,
            colors,
            canvas: [1.0, 1.0],
            surface: SurfaceSize::default(),
            clock: FrameClock::new(),
            elapsed: 0.0,
        }
    }

    fn config(&self) -> &WarpFieldConfig {
        &self.config
    }

    fn program(&self) -> ShaderProgram {
        ShaderProgram::new("warpfield", self.uniforms().layout(), shader::FRAGMENT_BODY)
    }

    fn surface_options(&self) -> SurfaceOptions {
        if self.config.transparent {
            SurfaceOptions::transparent()
        } else {
            SurfaceOptions::default()
        }
    }

    fn resize(&mut self, viewport: Viewport) -> SurfaceSize {
        self.canvas = viewport.css_size_or_unit();
        self.surface = viewport.surface_size();
        self.surface
    }

    fn pointer_moved(&mut self, client: ClientPoint, bounds: Bounds) {
        let local = bounds.normalize(client);
        self.pointer
            .set_target(Vec2::new(local.x * 2.0 - 1.0, -(local.y * 2.0 - 1.0)));
    }

    fn advance(&mut self, now: FrameTime) {
        let sample = self.clock.tick(now);
        self.elapsed = sample.elapsed;
        let degrees = rotation_degrees(self.config.rotation, self.config.auto_rotate, sample.elapsed);
        self.rot = rotation_basis(degrees);
        self.pointer.step(sample.delta);
    }

    fn uniforms(&self) -> UniformTable {
        self.snapshot().to_table()
    }

    fn shade(&self, frag_coord: [f32; 2]) -> [f32; 4] {
        let [width, height] = self.surface.as_f32();
        let uv = [frag_coord[0] / width, 1.0 - frag_coord[1] / height];
        shade(&self.snapshot(), uv, frag_coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::UniformValue;

    fn mounted(config: WarpFieldConfig) -> WarpField {
        let mut effect = WarpField::new(config);
        effect.resize(Viewport::new(400.0, 300.0, 2.0));
        effect
    }

    #[test]
    fn rotation_modulo_preserves_sign() {
        assert_eq!(rotation_degrees(370.0, 0.0, 5.0), 10.0);
        assert_eq!(rotation_degrees(-372.0, 0.0, 0.0), -12.0);
        assert_eq!(rotation_degrees(45.0, 10.0, 2.0), 65.0);
    }

    #[test]
    fn first_frame_has_zero_time_and_rotation_basis() {
        let mut effect = mounted(WarpFieldConfig {
            rotation: 90.0,
            auto_rotate: 30.0,
            ..WarpFieldConfig::default()
        });
        effect.advance(FrameTime::from_millis(12_345.0));
        let snapshot = effect.snapshot();
        assert_eq!(snapshot.time, 0.0);
        assert!(snapshot.rot[0].abs() < 1e-6);
        assert!((snapshot.rot[1] - 1.0).abs() < 1e-6);

        effect.advance(FrameTime::from_millis(13_345.0));
        let snapshot = effect.snapshot();
        assert!((snapshot.time - 1.0).abs() < 1e-6);
        let expected = rotation_basis(120.0);
        assert!((snapshot.rot[0] - expected[0]).abs() < 1e-5);
        assert!((snapshot.rot[1] - expected[1]).abs() < 1e-5);
    }

    #[test]
    fn canvas_uses_css_size_and_surface_uses_device_pixels() {
        let mut effect = WarpField::new(WarpFieldConfig::default());
        let size = effect.resize(Viewport::new(400.0, 300.0, 2.0));
        assert_eq!(size, SurfaceSize::new(800, 600));
        assert_eq!(effect.snapshot().canvas, [400.0, 300.0]);

        let size = effect.resize(Viewport::new(0.0, 0.0, 2.0));
        assert_eq!(size, SurfaceSize::new(1, 1));
        assert_eq!(effect.snapshot().canvas, [1.0, 1.0]);
    }

    #[test]
    fn pointer_maps_to_ndc_and_smooths_by_delta() {
        let mut effect = mounted(WarpFieldConfig::default());
        let bounds = Bounds::new(0.0, 0.0, 400.0, 300.0);
        effect.pointer_moved(ClientPoint::new(400.0, 0.0), bounds);
        effect.advance(FrameTime::from_millis(0.0));
        assert_eq!(effect.snapshot().pointer, [0.0, 0.0]);

        effect.advance(FrameTime::from_millis(62.5));
        let [x, y] = effect.snapshot().pointer;
        assert!((x - 0.5).abs() < 1e-5, "x={x}");
        assert!((y - 0.5).abs() < 1e-5, "y={y}");

        effect.advance(FrameTime::from_millis(1_000.0));
        assert_eq!(effect.snapshot().pointer, [1.0, 1.0]);
    }

    #[test]
    fn colors_fill_fixed_slots() {
        let effect = mounted(WarpFieldConfig {
            colors: vec!["#ff5c7a".into(), "#8a5cff".into(), "#00ffd1".into()],
            ..WarpFieldConfig::default()
        });
        let table = effect.uniforms();
        assert_eq!(table.get("uColorCount"), Some(&UniformValue::Int(3)));
        let slots = table.get("uColors").and_then(UniformValue::as_vec3_array).unwrap();
        assert_eq!(slots.len(), MAX_COLORS);
        assert_eq!(slots[1], [138.0 / 255.0, 92.0 / 255.0, 1.0]);
        assert!(slots[3..].iter().all(|slot| *slot == [0.0, 0.0, 0.0]));
    }

    fn single_color(transparent: bool) -> WarpField {
        let mut effect = mounted(WarpFieldConfig {
            colors: vec!["#40c0ff".into()],
            transparent,
            noise: 0.0,
            ..WarpFieldConfig::default()
        });
        effect.advance(FrameTime::from_millis(0.0));
        effect.advance(FrameTime::from_millis(750.0));
        effect
    }

    #[test]
    fn transparent_alpha_is_max_mask() {
        let effect = single_color(true);
        let uniforms = effect.snapshot();
        for (x, y) in [(0.5, 0.5), (100.5, 40.5), (799.5, 599.5), (400.5, 300.5)] {
            let uv = [x / 800.0, 1.0 - y / 600.0];
            let masks = color_masks(&uniforms, uv);
            assert_eq!(masks.len(), 1);
            let pixel = effect.shade([x, y]);
            assert!((pixel[3] - masks[0]).abs() < 1e-6);
            // Premultiplied: no channel brighter than coverage.
            assert!(pixel[..3].iter().all(|c| *c <= pixel[3] + 1e-6));
        }
    }

    #[test]
    fn opaque_alpha_is_one() {
        let effect = single_color(false);
        for (x, y) in [(0.5, 0.5), (100.5, 40.5), (799.5, 599.5)] {
            assert_eq!(effect.shade([x, y])[3], 1.0);
        }
        assert_eq!(effect.surface_options(), SurfaceOptions::default());
    }

    #[test]
    fn no_colors_uses_three_channel_fallback() {
        let mut effect = mounted(WarpFieldConfig {
            noise: 0.0,
            ..WarpFieldConfig::default()
        });
        effect.advance(FrameTime::from_millis(0.0));
        let uniforms = effect.snapshot();
        let masks = color_masks(&uniforms, [0.3, 0.7]);
        assert_eq!(masks.len(), 3);
        let pixel = shade(&uniforms, [0.3, 0.7], [240.5, 180.5]);
        let coverage = masks.iter().copied().fold(0.0f32, f32::max);
        assert!((pixel[3] - coverage).abs() < 1e-6);
        assert!((pixel[0] - masks[0] * coverage).abs() < 1e-6);
    }
}
