use crate::foundation::error::{FamapError, FamapResult};

/// Geographic position in decimal degrees (WGS84).
///
/// Deserialization goes through [`Coordinates::new`], so out-of-range values never load.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    /// Latitude, `[-90, 90]`.
    pub lat: f64,
    /// Longitude, `[-180, 180]`.
    pub lon: f64,
}

impl Coordinates {
    /// Create validated coordinates.
    pub fn new(lat: f64, lon: f64) -> FamapResult<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(FamapError::validation(format!(
                "coordinates must be finite, got ({lat}, {lon})"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(FamapError::validation(format!(
                "latitude {lat} is outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(FamapError::validation(format!(
                "longitude {lon} is outside [-180, 180]"
            )));
        }
        Ok(Self { lat, lon })
    }

    /// `(lat, lon)` tuple.
    pub fn as_pair(self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

#[derive(serde::Deserialize)]
struct RawCoordinates {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = FamapError;

    fn try_from(raw: RawCoordinates) -> FamapResult<Self> {
        Self::new(raw.lat, raw.lon)
    }
}

/// Opaque 8-bit sRGB color, serialized as `[r, g, b]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Fully opaque straight-alpha RGBA value.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(v: [u8; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        [c.r, c.g, c.b]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
