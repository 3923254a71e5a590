use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage, imageops::FilterType};

use crate::foundation::error::{FamapError, FamapResult};
use crate::pin::palette::BorderPalette;
use crate::pin::{PIN_SIZE, RING_WIDTH, composite, placeholder, raster};

/// Turns avatars into circular, color-ringed map pins.
#[derive(Clone, Debug)]
pub struct IconCompositor {
    pins_dir: PathBuf,
    palette: BorderPalette,
}

impl IconCompositor {
    /// Compositor writing into `pins_dir` with ring colors from `palette`.
    pub fn new(pins_dir: impl Into<PathBuf>, palette: BorderPalette) -> Self {
        Self {
            pins_dir: pins_dir.into(),
            palette,
        }
    }

    /// Output directory.
    pub fn pins_dir(&self) -> &Path {
        &self.pins_dir
    }

    /// Ring color table.
    pub fn palette(&self) -> &BorderPalette {
        &self.palette
    }

    /// Where the pin for `source` is written: `<pins_dir>/<stem>_pin.png`.
    ///
    /// Only the file stem is used, so sources sharing a basename share a pin.
    pub fn pin_path_for(&self, source: &Path) -> FamapResult<PathBuf> {
        let stem = source.file_stem().ok_or_else(|| {
            FamapError::validation(format!(
                "image path '{}' has no file name",
                source.display()
            ))
        })?;
        Ok(self
            .pins_dir
            .join(format!("{}_pin.png", stem.to_string_lossy())))
    }

    /// Build and write the pin for `entity`, returning its path.
    ///
    /// A missing `source` falls back to an initials placeholder; an existing file that does not
    /// decode is an error.
    #[tracing::instrument(skip(self, source), fields(source = %source.display()))]
    pub fn make_pin(&self, source: &Path, entity: &str) -> FamapResult<PathBuf> {
        let out = self.pin_path_for(source)?;
        let avatar = load_avatar(source, entity)?;
        let pin = self.render_pin(&avatar, entity)?;

        pin.save_with_format(&out, image::ImageFormat::Png)
            .map_err(|e| match e {
                image::ImageError::IoError(io) => FamapError::io(&out, io),
                other => FamapError::Other(
                    anyhow::Error::new(other).context(format!("encode pin '{}'", out.display())),
                ),
            })?;
        tracing::info!(pin = %out.display(), "wrote pin");
        Ok(out)
    }

    /// Pure part of [`IconCompositor::make_pin`]: resize, clip to a disc and draw the ring.
    ///
    /// Works on premultiplied pixels throughout; the disc and ring edges are anti-aliased.
    pub fn render_pin(&self, avatar: &DynamicImage, entity: &str) -> FamapResult<RgbaImage> {
        let rgba = avatar.to_rgba8();
        let resized = if rgba.dimensions() == (PIN_SIZE, PIN_SIZE) {
            rgba
        } else {
            image::imageops::resize(&rgba, PIN_SIZE, PIN_SIZE, FilterType::CatmullRom)
        };

        let mut pin = composite::premultiply_buffer(resized.as_raw());
        composite::mask_in_place(&mut pin, &raster::disc_mask(PIN_SIZE)?)?;

        let ring = raster::ring_layer(PIN_SIZE, RING_WIDTH, self.palette.color_for(entity))?;
        composite::over_in_place(&mut pin, &ring)?;

        RgbaImage::from_raw(PIN_SIZE, PIN_SIZE, composite::unpremultiply_buffer(&pin))
            .ok_or_else(|| FamapError::validation("pin buffer size mismatch"))
    }
}

fn load_avatar(source: &Path, entity: &str) -> FamapResult<DynamicImage> {
    let bytes = match std::fs::read(source) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                source = %source.display(),
                entity,
                "avatar missing, using initials placeholder"
            );
            return Ok(DynamicImage::ImageRgb8(placeholder::placeholder_image(
                entity,
            )?));
        }
        Err(e) => return Err(FamapError::io(source, e)),
    };

    image::load_from_memory(&bytes).map_err(|e| FamapError::decode(source, e.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/pin/compositor.rs"]
mod tests;
