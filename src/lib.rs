//! famap renders a family travel map.
//!
//! The crate is built around two independent pieces:
//!
//! - [`GeocodeCache`]: a write-through, rate-limited memo that turns free-text place names into
//!   [`Coordinates`], calling the external [`Geocoder`] at most once per distinct name for as long
//!   as its [`CacheStore`] is carried forward.
//! - [`IconCompositor`]: turns an avatar (or an initials placeholder when the file is missing)
//!   into a 30×30 circular PNG pin with a per-person ring color from a [`BorderPalette`].
//!
//! [`build_map`] drives both over a [`FamilyDataset`], and [`write_html`] turns the result into a
//! single Leaflet page.
//!
//! Everything runs on the calling thread. The only blocking points are the rate limiter and the
//! HTTP lookup on a cache miss.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod family;
mod foundation;
mod geocode;
mod map;
mod pin;

/// Layered run configuration.
pub mod config;

pub use crate::config::{GeocoderConfig, MapConfig};
pub use crate::family::dataset::{Entity, FamilyDataset, Place};
pub use crate::foundation::core::{Coordinates, Rgb8};
pub use crate::foundation::error::{FamapError, FamapResult};
pub use crate::geocode::cache::GeocodeCache;
pub use crate::geocode::nominatim::{
    DEFAULT_NOMINATIM_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, Geocoder, NominatimGeocoder,
};
pub use crate::geocode::store::{
    CACHE_FORMAT_VERSION, CacheEntries, CacheStore, JsonFileStore, MemoryStore,
};
pub use crate::geocode::throttle::{DEFAULT_MIN_INTERVAL, RateLimiter};
pub use crate::map::builder::{FamilyMap, Layer, Marker, build_map};
pub use crate::map::html::{escape_html, render_html, write_html};
pub use crate::pin::compositor::IconCompositor;
pub use crate::pin::palette::BorderPalette;
pub use crate::pin::placeholder::{initials, placeholder_image};
pub use crate::pin::{PIN_SIZE, RING_WIDTH};
