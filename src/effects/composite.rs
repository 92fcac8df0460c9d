use crate::foundation::error::{TwainError, TwainResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Linear blend `(1 - t) * a + t * b`, with `t` quantized to 1/255 steps.
///
/// `t = 0` returns `a` and `t = 1` returns `b` exactly.
pub fn crossfade(a: PremulRgba8, b: PremulRgba8, t: f32) -> PremulRgba8 {
    let t = t.clamp(0.0, 1.0);
    let tt = ((t * 255.0).round() as i32).clamp(0, 255) as u16;
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255_u8(u16::from(a[i]), it);
        let bv = mul_div255_u8(u16::from(b[i]), tt);
        out[i] = av.saturating_add(bv);
    }
    out
}

/// Write the crossfade of two equal-length RGBA8 buffers into `dst`.
pub fn crossfade_into(dst: &mut [u8], a: &[u8], b: &[u8], t: f32) -> TwainResult<()> {
    if dst.len() != a.len() || dst.len() != b.len() || !dst.len().is_multiple_of(4) {
        return Err(TwainError::validation(
            "crossfade_into expects equal-length rgba8 buffers",
        ));
    }
    for ((d, a), b) in dst
        .chunks_exact_mut(4)
        .zip(a.chunks_exact(4))
        .zip(b.chunks_exact(4))
    {
        let out = crossfade([a[0], a[1], a[2], a[3]], [b[0], b[1], b[2], b[3]], t);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
