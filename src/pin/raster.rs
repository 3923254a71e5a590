//! Shapes rasterized on the CPU renderer.
//!
//! Every helper returns a premultiplied RGBA8 buffer of `size * size * 4` bytes with anti-aliased
//! edges. The renderer is single-threaded, so the same inputs always give the same bytes.

use kurbo::Shape;
use vello_cpu::peniko::Color;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{FamapError, FamapResult};

const PATH_TOLERANCE: f64 = 0.1;

pub(crate) fn to_cpu_path(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    let mut p = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(PATH_TOLERANCE) {
        p.push(el);
    }
    p
}

/// Run `draw` on a transparent `size`×`size` context and return the rendered pixels.
pub(crate) fn render(
    size: u32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> FamapResult<Vec<u8>> {
    let side: u16 = size
        .try_into()
        .map_err(|_| FamapError::validation(format!("canvas size {size} exceeds u16")))?;

    let mut ctx = vello_cpu::RenderContext::new(side, side);
    draw(&mut ctx);
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(side, side);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

fn inscribed_circle(size: u32, inset: f64) -> kurbo::Circle {
    let c = f64::from(size) / 2.0;
    kurbo::Circle::new((c, c), (c - inset).max(0.0))
}

/// Opaque white disc inscribed in the canvas; its alpha is the clip coverage.
pub fn disc_mask(size: u32) -> FamapResult<Vec<u8>> {
    let disc = to_cpu_path(&inscribed_circle(size, 0.0));
    render(size, |ctx| {
        ctx.set_paint(Color::from_rgba8(255, 255, 255, 255));
        ctx.fill_path(&disc);
    })
}

/// Transparent layer with a `width`-pixel ring of `color` just inside the canvas edge.
pub fn ring_layer(size: u32, width: u32, color: Rgb8) -> FamapResult<Vec<u8>> {
    let width = f64::from(width);
    let ring = to_cpu_path(&inscribed_circle(size, width / 2.0));
    render(size, |ctx| {
        ctx.set_paint(Color::from_rgba8(color.r, color.g, color.b, 255));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        ctx.stroke_path(&ring);
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pin/raster.rs"]
mod tests;
