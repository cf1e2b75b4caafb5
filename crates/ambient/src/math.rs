//! Scalar helpers mirroring the GLSL built-ins the effect shaders use, so the
//! CPU reference shading reads like the shader source. Vector math is glam's.

use glam::Vec2;

pub fn fract(value: f32) -> f32 {
    value - value.floor()
}

/// The classic `fract(sin(dot(st, k)) * 43758.5453)` hash both shaders use.
pub fn hash(st: Vec2) -> f32 {
    fract(st.dot(Vec2::new(12.9898, 78.233)).sin() * 43758.547)
}

pub fn luminance(rgb: [f32; 3]) -> f32 {
    rgb[0] * 0.299 + rgb[1] * 0.587 + rgb[2] * 0.114
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_stays_in_unit_interval() {
        for i in 0..64 {
            let value = hash(Vec2::new(i as f32 * 3.7, i as f32 * -1.3));
            assert!((0.0..1.0).contains(&value), "hash={value}");
        }
    }

    #[test]
    fn fract_wraps_negative_values_upward() {
        assert_eq!(fract(2.25), 0.25);
        assert_eq!(fract(-0.25), 0.75);
    }

    #[test]
    fn luminance_weights_sum_to_one() {
        assert!((luminance([1.0, 1.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!(luminance([0.0, 1.0, 0.0]) > luminance([1.0, 0.0, 0.0]));
    }
}
