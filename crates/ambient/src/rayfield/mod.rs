//! Light rays fanning down from an anchor above the viewport.

mod shade;
mod shader;

use glam::Vec2;
use renderer::{ShaderProgram, SurfaceOptions, SurfaceSize, UniformTable};
use scheduler::FrameTime;

use crate::color::{parse_hex_or, Rgb, WHITE};
use crate::config::{RayFieldConfig, RaysOrigin};
use crate::effect::Effect;
use crate::mount::{Bounds, ClientPoint, Viewport};
use crate::pointer::{FixedFractionSmoother, RAYFIELD_POINTER_FRACTION};

pub use shade::shade;

/// How far above the viewport the light source sits, as a fraction of height.
const ANCHOR_OUTSIDE: f32 = 0.2;

/// Source point and unit direction of the ray bundle, in top-left-origin
/// device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayAnchor {
    pub position: Vec2,
    pub direction: Vec2,
}

impl RayAnchor {
    pub fn for_origin(origin: RaysOrigin, width: f32, height: f32) -> Self {
        match origin {
            RaysOrigin::TopCenter => Self::top_center(width, height),
            other => {
                tracing::trace!(?other, "rays origin has no dedicated anchor; using top-center");
                Self::top_center(width, height)
            }
        }
    }

    fn top_center(width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(0.5 * width, -ANCHOR_OUTSIDE * height),
            direction: Vec2::new(0.0, 1.0),
        }
    }
}

/// Every RayField uniform, in upload order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayFieldUniforms {
    pub i_time: f32,
    pub i_resolution: [f32; 2],
    pub ray_pos: [f32; 2],
    pub ray_dir: [f32; 2],
    pub rays_color: Rgb,
    pub rays_speed: f32,
    pub light_spread: f32,
    pub ray_length: f32,
    pub pulsating: f32,
    pub fade_distance: f32,
    pub saturation: f32,
    pub mouse_pos: [f32; 2],
    pub mouse_influence: f32,
    pub noise_amount: f32,
    pub distortion: f32,
}

impl RayFieldUniforms {
    pub fn to_table(&self) -> UniformTable {
        UniformTable::new()
            .float("iTime", self.i_time)
            .vec2("iResolution", self.i_resolution)
            .vec2("rayPos", self.ray_pos)
            .vec2("rayDir", self.ray_dir)
            .vec3("raysColor", self.rays_color)
            .float("raysSpeed", self.rays_speed)
            .float("lightSpread", self.light_spread)
            .float("rayLength", self.ray_length)
            .float("pulsating", self.pulsating)
            .float("fadeDistance", self.fade_distance)
            .float("saturation", self.saturation)
            .vec2("mousePos", self.mouse_pos)
            .float("mouseInfluence", self.mouse_influence)
            .float("noiseAmount", self.noise_amount)
            .float("distortion", self.distortion)
    }
}

pub struct RayField {
    config: RayFieldConfig,
    color: Rgb,
    resolution: SurfaceSize,
    anchor: RayAnchor,
    pointer: FixedFractionSmoother,
    time: f32,
}

impl RayField {
    /// Direction the rays actually point this frame: the anchor direction
    /// bent toward the smoothed pointer by `mouseInfluence`.
    pub fn ray_direction(&self) -> Vec2 {
        let base = self.anchor.direction;
        let influence = self.config.mouse_influence;
        if influence <= 0.0 {
            return base;
        }
        let [width, height] = self.resolution.as_f32();
        let pointer = self.pointer.current() * Vec2::new(width, height);
        let offset = pointer - self.anchor.position;
        if offset.length() <= 0.001 {
            return base;
        }
        let Some(toward) = offset.try_normalize() else {
            return base;
        };
        let bent = base.lerp(toward, influence);
        if bent.length() <= 1e-6 {
            return base;
        }
        bent.normalize()
    }

    pub fn anchor(&self) -> RayAnchor {
        self.anchor
    }

    pub fn snapshot(&self) -> RayFieldUniforms {
        let config = &self.config;
        RayFieldUniforms {
            i_time: self.time,
            i_resolution: self.resolution.as_f32(),
            ray_pos: self.anchor.position.to_array(),
            ray_dir: self.ray_direction().to_array(),
            rays_color: self.color,
            rays_speed: config.rays_speed,
            light_spread: config.light_spread,
            ray_length: config.ray_length,
            pulsating: if config.pulsating { 1.0 } else { 0.0 },
            fade_distance: config.fade_distance,
            saturation: config.saturation,
            mouse_pos: self.pointer.current().to_array(),
            mouse_influence: config.mouse_influence,
            noise_amount: config.noise_amount,
            distortion: config.distortion,
        }
    }
}

impl Effect for RayField {
    type Config = RayFieldConfig;

    const NAME: &'static str = "RayField";

    fn new(config: RayFieldConfig) -> Self {
        let color = parse_hex_or(&config.rays_color, WHITE);
        let resolution = SurfaceSize::default();
        let [width, height] = resolution.as_f32();
        Self {
            anchor: RayAnchor::for_origin(config.rays_origin, width, height),
            pointer: FixedFractionSmoother::new(
                Vec2::new(0.5, 0.5),
                RAYFIELD_POINTER_FRACTION,
            ),
            config,
            color,
            resolution,
            time: 0.0,
        }
    }

    fn config(&self) -> &RayFieldConfig {
        &self.config
    }

    fn program(&self) -> ShaderProgram {
        ShaderProgram::new("rayfield", self.uniforms().layout(), shader::FRAGMENT_BODY)
    }

    fn surface_options(&self) -> SurfaceOptions {
        SurfaceOptions::transparent()
    }

    fn resize(&mut self, viewport: Viewport) -> SurfaceSize {
        self.resolution = viewport.surface_size();
        let [width, height] = self.resolution.as_f32();
        self.anchor = RayAnchor::for_origin(self.config.rays_origin, width, height);
        self.resolution
    }

    fn pointer_moved(&mut self, client: ClientPoint, bounds: Bounds) {
        let local = bounds.normalize(client);
        self.pointer.set_target(Vec2::new(local.x, 1.0 - local.y));
    }

    fn advance(&mut self, now: FrameTime) {
        self.time = (now.millis() * 0.001) as f32;
        self.pointer.step();
    }

    fn uniforms(&self) -> UniformTable {
        self.snapshot().to_table()
    }

    fn shade(&self, frag_coord: [f32; 2]) -> [f32; 4] {
        shade(&self.snapshot(), frag_coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::UniformValue;

    fn mounted(config: RayFieldConfig) -> RayField {
        let mut effect = RayField::new(config);
        effect.resize(Viewport::new(800.0, 600.0, 1.0));
        effect
    }

    #[test]
    fn top_center_anchor_sits_above_viewport() {
        let effect = mounted(RayFieldConfig::default());
        assert_eq!(effect.anchor().position, Vec2::new(400.0, -120.0));
        assert_eq!(effect.anchor().direction, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn other_origins_fall_back_to_top_center() {
        for origin in [RaysOrigin::BottomRight, RaysOrigin::Left, RaysOrigin::Other] {
            let effect = mounted(RayFieldConfig {
                rays_origin: origin,
                ..RayFieldConfig::default()
            });
            assert_eq!(effect.anchor().position, Vec2::new(400.0, -120.0));
        }
    }

    #[test]
    fn zero_influence_keeps_direction_for_any_pointer() {
        let mut effect = mounted(RayFieldConfig {
            mouse_influence: 0.0,
            ..RayFieldConfig::default()
        });
        let bounds = Bounds::new(0.0, 0.0, 800.0, 600.0);
        for (x, y) in [(0.0, 0.0), (799.0, 10.0), (-500.0, 4000.0), (400.0, 300.0)] {
            effect.pointer_moved(ClientPoint::new(x, y), bounds);
            for frame in 0..5 {
                effect.advance(FrameTime::from_millis(frame as f64 * 16.0));
                assert_eq!(effect.snapshot().ray_dir, [0.0, 1.0]);
            }
        }
    }

    #[test]
    fn influence_bends_rays_toward_pointer() {
        let mut effect = mounted(RayFieldConfig {
            mouse_influence: 1.0,
            ..RayFieldConfig::default()
        });
        effect.pointer_moved(
            ClientPoint::new(800.0, 0.0),
            Bounds::new(0.0, 0.0, 800.0, 600.0),
        );
        for frame in 0..200 {
            effect.advance(FrameTime::from_millis(frame as f64 * 16.0));
        }
        let [x, y] = effect.snapshot().ray_dir;
        assert!(x > 0.0, "rays should lean right, got {x}");
        assert!(((x * x + y * y).sqrt() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn cancelling_bend_keeps_anchor_direction() {
        let mut effect = mounted(RayFieldConfig {
            mouse_influence: 0.5,
            ..RayFieldConfig::default()
        });
        // Straight above the anchor: the bend target is exactly opposite.
        effect.pointer_moved(
            ClientPoint::new(400.0, 900.0),
            Bounds::new(0.0, 0.0, 800.0, 600.0),
        );
        for frame in 0..400 {
            effect.advance(FrameTime::from_millis(frame as f64 * 16.0));
        }
        assert_eq!(effect.ray_direction(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn pointer_on_the_anchor_keeps_anchor_direction() {
        let mut effect = mounted(RayFieldConfig {
            mouse_influence: 1.0,
            ..RayFieldConfig::default()
        });
        effect.pointer_moved(
            ClientPoint::new(400.0, 720.0),
            Bounds::new(0.0, 0.0, 800.0, 600.0),
        );
        for frame in 0..400 {
            effect.advance(FrameTime::from_millis(frame as f64 * 16.0));
        }
        assert_eq!(effect.ray_direction(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn pointer_is_flipped_and_smoothed() {
        let mut effect = mounted(RayFieldConfig::default());
        effect.pointer_moved(
            ClientPoint::new(200.0, 150.0),
            Bounds::new(0.0, 0.0, 800.0, 600.0),
        );
        effect.advance(FrameTime::from_millis(0.0));
        let [x, y] = effect.snapshot().mouse_pos;
        assert!((x - (0.5 + (0.25 - 0.5) * 0.1)).abs() < 1e-6);
        assert!((y - (0.5 + (0.75 - 0.5) * 0.1)).abs() < 1e-6);
    }

    #[test]
    fn resolution_uses_capped_pixel_ratio() {
        let mut effect = RayField::new(RayFieldConfig::default());
        let size = effect.resize(Viewport::new(640.0, 360.0, 3.0));
        assert_eq!(size, SurfaceSize::new(1280, 720));
        assert_eq!(
            effect.uniforms().get("iResolution"),
            Some(&UniformValue::Vec2([1280.0, 720.0]))
        );
        assert_eq!(effect.anchor().position, Vec2::new(640.0, -144.0));
    }

    #[test]
    fn malformed_color_falls_back_to_white() {
        let effect = RayField::new(RayFieldConfig {
            rays_color: "not-a-color".into(),
            ..RayFieldConfig::default()
        });
        assert_eq!(effect.snapshot().rays_color, WHITE);
    }

    #[test]
    fn shading_is_brighter_near_the_source() {
        let mut effect = mounted(RayFieldConfig {
            noise_amount: 0.0,
            pulsating: false,
            mouse_influence: 0.0,
            ..RayFieldConfig::default()
        });
        effect.advance(FrameTime::from_secs(1.0));
        let near = effect.shade([400.5, 20.5]);
        let far_side = effect.shade([5.5, 590.5]);
        assert!(near[3] > far_side[3]);
        for channel in near {
            assert!((0.0..=1.0).contains(&channel));
        }
        // Premultiplied output never exceeds its alpha.
        assert!(near[0] <= near[3] + 1e-6);
    }
}
