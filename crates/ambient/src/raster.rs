use renderer::SurfaceSize;

use crate::effect::Effect;

/// Evaluates the effect's CPU reference shader over a whole surface and
/// returns straight (non-premultiplied) RGBA8 rows, top row first.
pub fn rasterize<E: Effect>(effect: &E, size: SurfaceSize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(size.width as usize * size.height as usize * 4);
    for y in 0..size.height {
        for x in 0..size.width {
            let rgba = effect.shade([x as f32 + 0.5, y as f32 + 0.5]);
            pixels.extend_from_slice(&to_straight_rgba8(rgba));
        }
    }
    pixels
}

fn to_straight_rgba8([r, g, b, a]: [f32; 4]) -> [u8; 4] {
    let alpha = a.clamp(0.0, 1.0);
    let unpremultiply = |c: f32| {
        if alpha > 0.0 {
            (c / alpha).clamp(0.0, 1.0)
        } else {
            0.0
        }
    };
    let quantize = |c: f32| (c * 255.0).round() as u8;
    [
        quantize(unpremultiply(r)),
        quantize(unpremultiply(g)),
        quantize(unpremultiply(b)),
        quantize(alpha),
    ]
}
