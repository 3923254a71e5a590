use std::path::{Path, PathBuf};

/// Convenience result alias used across the crate.
pub type FamapResult<T> = Result<T, FamapError>;

/// Error type shared by every stage of the map pipeline.
///
/// All variants are fatal to a run: the pipeline never skips a place or a pin.
#[derive(thiserror::Error, Debug)]
pub enum FamapError {
    /// Invalid input data, coordinates or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A place name could not be turned into coordinates.
    ///
    /// Covers both "no match" and transport failures of the geocoder.
    #[error("resolution error: could not geocode '{place}': {reason}")]
    Resolution {
        /// The place name exactly as it was looked up.
        place: String,
        /// Human readable cause.
        reason: String,
    },

    /// An existing source image could not be decoded as a raster image.
    #[error("decode error: '{}': {reason}", path.display())]
    Decode {
        /// Path of the offending image.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// Filesystem failure on a known path.
    #[error("io error: '{}': {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// (De)serialization failure of the dataset, config or cache file.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with the original source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FamapError {
    /// Build a [`FamapError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FamapError::Resolution`].
    pub fn resolution(place: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            place: place.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`FamapError::Decode`].
    pub fn decode(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Build a [`FamapError::Io`].
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build a [`FamapError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
