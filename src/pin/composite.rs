use crate::foundation::error::{FamapError, FamapResult};
use crate::foundation::math::{div_alpha_u8, mul_div255_u8};

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

pub fn premultiply(px: [u8; 4]) -> PremulRgba8 {
    let a = u16::from(px[3]);
    [
        mul_div255_u8(u16::from(px[0]), a),
        mul_div255_u8(u16::from(px[1]), a),
        mul_div255_u8(u16::from(px[2]), a),
        px[3],
    ]
}

pub fn unpremultiply(px: PremulRgba8) -> [u8; 4] {
    let a = px[3];
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    [
        div_alpha_u8(px[0], a),
        div_alpha_u8(px[1], a),
        div_alpha_u8(px[2], a),
        a,
    ]
}

/// Straight-alpha RGBA8 buffer to premultiplied.
pub fn premultiply_buffer(straight: &[u8]) -> Vec<u8> {
    straight
        .chunks_exact(4)
        .flat_map(|p| premultiply([p[0], p[1], p[2], p[3]]))
        .collect()
}

/// Premultiplied RGBA8 buffer back to straight alpha.
pub fn unpremultiply_buffer(premul: &[u8]) -> Vec<u8> {
    premul
        .chunks_exact(4)
        .flat_map(|p| unpremultiply([p[0], p[1], p[2], p[3]]))
        .collect()
}

fn check_pair(dst: &[u8], src: &[u8], op: &str) -> FamapResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(FamapError::validation(format!(
            "{op} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

/// Scale every premultiplied pixel of `dst` by the alpha of the matching `mask` pixel.
pub fn mask_in_place(dst: &mut [u8], mask: &[u8]) -> FamapResult<()> {
    check_pair(dst, mask, "mask_in_place")?;
    for (d, m) in dst.chunks_exact_mut(4).zip(mask.chunks_exact(4)) {
        let w = u16::from(m[3]);
        for c in d.iter_mut() {
            *c = mul_div255_u8(u16::from(*c), w);
        }
    }
    Ok(())
}

/// Composite premultiplied `src` over premultiplied `dst`, in place.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> FamapResult<()> {
    check_pair(dst, src, "over_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}
