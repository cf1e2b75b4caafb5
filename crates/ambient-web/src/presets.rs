//! The backgrounds the site mounts on load.

use ambient::{RayFieldConfig, RaysOrigin, WarpFieldConfig};

pub const LIGHT_RAYS_CONTAINER: &str = "light-rays-container";
pub const COLOR_BENDS_CONTAINER: &str = "colorbends-container";

/// White rays from the top edge, lightly following the pointer.
pub fn light_rays() -> RayFieldConfig {
    RayFieldConfig {
        rays_origin: RaysOrigin::TopCenter,
        rays_color: "#ffffff".into(),
        rays_speed: 0.2,
        light_spread: 0.2,
        ray_length: 5.0,
        mouse_influence: 0.5,
        ..RayFieldConfig::default()
    }
}

/// Pink, violet and cyan bands on a transparent canvas.
pub fn color_bends() -> WarpFieldConfig {
    WarpFieldConfig {
        colors: vec!["#ff5c7a".into(), "#8a5cff".into(), "#00ffd1".into()],
        rotation: -12.0,
        speed: 0.2,
        scale: 1.0,
        frequency: 1.0,
        warp_strength: 1.0,
        mouse_influence: 1.0,
        parallax: 0.5,
        noise: 0.1,
        transparent: true,
        auto_rotate: 0.0,
    }
}
