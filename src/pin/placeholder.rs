use image::RgbImage;
use vello_cpu::peniko::Color;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{FamapError, FamapResult};
use crate::pin::composite::unpremultiply;
use crate::pin::{PIN_SIZE, raster};

/// Background of a synthesized avatar.
pub const PLACEHOLDER_BG: Rgb8 = Rgb8::new(200, 200, 200);
/// Initials ink.
pub const PLACEHOLDER_INK: Rgb8 = Rgb8::BLACK;
/// Top-left corner of the text layout box.
pub const TEXT_ORIGIN: (f64, f64) = (7.0, 10.0);
/// Initials font size, pixels per em.
pub const TEXT_SIZE_PX: f32 = 11.0;

const FONT_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

type InkBrush = [u8; 4];

/// First character of every whitespace-separated token, upper-cased.
///
/// `"Ada Lovelace"` becomes `"AL"`; an empty or blank name yields `""`.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

fn layout_initials(text: &str) -> FamapResult<parley::Layout<InkBrush>> {
    let mut font_ctx = parley::FontContext::default();
    let mut layout_ctx = parley::LayoutContext::<InkBrush>::new();

    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(FONT_TTF.to_vec()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| FamapError::validation("embedded font registered no families"))?;
    let family_name = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| FamapError::validation("embedded font family has no name"))?
        .to_string();

    let mut builder = layout_ctx.ranged_builder(&mut font_ctx, text, 1.0, true);
    builder.push_default(parley::style::StyleProperty::FontStack(
        parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
    ));
    builder.push_default(parley::style::StyleProperty::FontSize(TEXT_SIZE_PX));
    builder.push_default(parley::style::StyleProperty::Brush(PLACEHOLDER_INK.to_rgba()));

    let mut layout: parley::Layout<InkBrush> = builder.build(text);
    layout.break_all_lines(None);
    Ok(layout)
}

/// Flat grey square with `name`'s initials, used when an avatar file is missing.
///
/// Text is laid out with the embedded font from [`TEXT_ORIGIN`] and clipped to the canvas.
pub fn placeholder_image(name: &str) -> FamapResult<RgbImage> {
    let text = initials(name);
    let layout = if text.is_empty() {
        None
    } else {
        Some(layout_initials(&text)?)
    };
    let font =
        vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(FONT_TTF.to_vec()), 0);
    let side = f64::from(PIN_SIZE);

    let premul = raster::render(PIN_SIZE, |ctx| {
        let bg = PLACEHOLDER_BG;
        ctx.set_paint(Color::from_rgba8(bg.r, bg.g, bg.b, 255));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, side, side));

        let Some(layout) = &layout else {
            return;
        };
        ctx.set_transform(vello_cpu::kurbo::Affine::translate(TEXT_ORIGIN));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let [r, g, b, a] = run.style().brush;
                ctx.set_paint(Color::from_rgba8(r, g, b, a));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    })?;

    let rgb: Vec<u8> = premul
        .chunks_exact(4)
        .flat_map(|p| {
            let [r, g, b, _] = unpremultiply([p[0], p[1], p[2], p[3]]);
            [r, g, b]
        })
        .collect();
    RgbImage::from_raw(PIN_SIZE, PIN_SIZE, rgb)
        .ok_or_else(|| FamapError::validation("placeholder buffer size mismatch"))
}

#[cfg(test)]
#[path = "../../tests/unit/pin/placeholder.rs"]
mod tests;
