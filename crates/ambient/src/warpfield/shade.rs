use glam::{Vec2, Vec2Swizzles};

use crate::color::MAX_COLORS;
use crate::math::hash;

use super::WarpFieldUniforms;

fn ring_mask(u: &WarpFieldUniforms, s: Vec2, t: f32, index: f32) -> f32 {
    let f = u.frequency;
    let a = s.yx() * f * 1.5 + Vec2::new((s.x * f).cos(), (s.y * f).cos()) * 2.0;
    let r = Vec2::new(a.x.sin(), a.y.sin());
    let m0 = (r + Vec2::splat((5.0 * r.y * f - 3.0 * t + index).sin() / 4.0)).length();
    let k_below = u.warp_strength.clamp(0.0, 1.0);
    let k_mix = k_below.powf(0.3);
    let gain = 1.0 + (u.warp_strength - 1.0).max(0.0);
    let disp = (r - s) * k_below;
    let warped = s + disp * gain;
    let m1 = (warped + Vec2::splat((5.0 * warped.y * f - 3.0 * t + index).sin() / 4.0)).length();
    let m = m0 + (m1 - m0) * k_mix;
    1.0 - (-6.0 / (6.0 * m).exp()).exp()
}

/// The warped field coordinate and shader time for a pixel.
fn field_coord(u: &WarpFieldUniforms, uv: Vec2) -> (Vec2, f32) {
    let t = u.time * u.speed;
    let pointer = Vec2::from_array(u.pointer);
    let [cos, sin] = u.rot;
    let p = uv * 2.0 - Vec2::splat(1.0) + pointer * (u.parallax * 0.1);
    let rp = Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos);
    let mut q = Vec2::new(rp.x * (u.canvas[0] / u.canvas[1]), rp.y);
    q = q * (1.0 / u.scale.max(0.0001));
    q = q * (1.0 / (0.5 + 0.2 * q.dot(q)));
    q = q + (0.2 * t.cos() - 7.56);
    q += (pointer - rp) * (u.mouse_influence * 0.2);
    (q, t)
}

/// Ring mask of every active color at `uv` (bottom-left origin, `[0, 1]`).
/// With no active colors, the three per-channel masks of the fallback field.
pub fn color_masks(u: &WarpFieldUniforms, uv: [f32; 2]) -> Vec<f32> {
    let (q, t) = field_coord(u, Vec2::from_array(uv));
    let iterations = if u.color_count > 0 {
        (u.color_count as usize).min(MAX_COLORS)
    } else {
        3
    };
    let mut s = q;
    (0..iterations)
        .map(|i| {
            s -= 0.01;
            ring_mask(u, s, t, i as f32)
        })
        .collect()
}

/// CPU twin of the WarpField fragment shader. Returns premultiplied RGBA when
/// transparent, opaque RGBA otherwise.
pub fn shade(u: &WarpFieldUniforms, uv: [f32; 2], frag_coord: [f32; 2]) -> [f32; 4] {
    let masks = color_masks(u, uv);
    let coverage = masks.iter().copied().fold(0.0f32, f32::max);
    let transparent = u.transparent > 0;

    let mut col = if u.color_count > 0 {
        let mut sum = [0.0f32; 3];
        for (color, w) in u.colors.iter().zip(&masks) {
            for (acc, channel) in sum.iter_mut().zip(color) {
                *acc += channel * w;
            }
        }
        sum.map(|c| c.clamp(0.0, 1.0))
    } else {
        [masks[0], masks[1], masks[2]]
    };
    let alpha = if transparent { coverage } else { 1.0 };

    if u.noise > 0.0001 {
        let n = hash(Vec2::from_array(frag_coord) + u.time);
        col = col.map(|c| (c + (n - 0.5) * u.noise).clamp(0.0, 1.0));
    }

    if transparent {
        col = col.map(|c| c * alpha);
    }
    [col[0], col[1], col[2], alpha]
}
