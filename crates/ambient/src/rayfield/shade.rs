use glam::Vec2;

use crate::math::{hash, luminance};

use super::RayFieldUniforms;

fn ray_strength(
    u: &RayFieldUniforms,
    source: Vec2,
    reference: Vec2,
    coord: Vec2,
    seed_a: f32,
    seed_b: f32,
    speed: f32,
) -> f32 {
    let resolution = Vec2::from_array(u.i_resolution);
    let source_to_coord = coord - source;
    let cos_angle = source_to_coord.normalize_or_zero().dot(reference);
    let dist = source_to_coord.length();

    let distorted = cos_angle + u.distortion * (u.i_time * 2.0 + dist * 0.01).sin() * 0.2;

    let spread = u.light_spread.max(0.001);
    let spread_factor = distorted.max(0.0).powf(1.0 / spread);

    let max_distance = resolution.x * u.ray_length;
    let length_falloff = ((max_distance - dist) / max_distance).clamp(0.0, 1.0);

    let fade_reach = resolution.x * u.fade_distance;
    let fade_falloff = ((fade_reach - dist) / fade_reach).clamp(0.5, 1.0);
    let pulse = if u.pulsating > 0.5 {
        0.8 + 0.2 * (u.i_time * speed * 3.0).sin()
    } else {
        1.0
    };

    let base = ((0.45 + 0.15 * (distorted * seed_a + u.i_time * speed).sin())
        + (0.3 + 0.2 * (-distorted * seed_b + u.i_time * speed).cos()))
    .clamp(0.0, 1.0);

    base * length_falloff * fade_falloff * spread_factor * pulse
}

/// CPU twin of the RayField fragment shader. Returns premultiplied RGBA.
pub fn shade(u: &RayFieldUniforms, frag_coord: [f32; 2]) -> [f32; 4] {
    let coord = Vec2::from_array(frag_coord);
    let source = Vec2::from_array(u.ray_pos);
    let direction = Vec2::from_array(u.ray_dir);

    let rays1 = ray_strength(u, source, direction, coord, 36.2214, 21.11349, 1.5 * u.rays_speed);
    let rays2 = ray_strength(u, source, direction, coord, 22.3991, 18.0234, 1.1 * u.rays_speed);
    let strength = rays1 * 0.5 + rays2 * 0.4;

    let mut color = [strength; 3];
    if u.noise_amount > 0.0 {
        let n = hash(coord * 0.01 + u.i_time * 0.1);
        let factor = 1.0 - u.noise_amount + u.noise_amount * n;
        color.iter_mut().for_each(|c| *c *= factor);
    }

    let brightness = 1.0 - coord.y / u.i_resolution[1];
    let tint = [
        0.1 + brightness * 0.8,
        0.3 + brightness * 0.6,
        0.5 + brightness * 0.5,
    ];
    for (c, t) in color.iter_mut().zip(tint) {
        *c *= t;
    }

    if u.saturation != 1.0 {
        let gray = luminance(color);
        for c in &mut color {
            *c = gray + (*c - gray) * u.saturation;
        }
    }

    let [r, g, b] = color;
    let [tr, tg, tb] = u.rays_color;
    [r * tr * strength, g * tg * strength, b * tb * strength, strength]
}
