use std::time::Duration;

use crate::foundation::core::Coordinates;
use crate::foundation::error::{FamapError, FamapResult};

/// Public OpenStreetMap Nominatim endpoint.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
/// `User-Agent` sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "family_map";
/// Upper bound for a single lookup.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// External forward-geocoding service.
pub trait Geocoder {
    /// Look up `query`.
    ///
    /// `Ok(None)` means the service answered without a match; `Err` is a transport or protocol
    /// failure.
    fn geocode(&self, query: &str) -> FamapResult<Option<Coordinates>>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn geocode(&self, query: &str) -> FamapResult<Option<Coordinates>> {
        (**self).geocode(query)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn geocode(&self, query: &str) -> FamapResult<Option<Coordinates>> {
        (**self).geocode(query)
    }
}

/// Blocking client for the Nominatim `/search` API.
#[derive(Debug)]
pub struct NominatimGeocoder {
    client: reqwest::blocking::Client,
    search_url: String,
}

impl NominatimGeocoder {
    /// Client for the Nominatim instance at `base_url`.
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> FamapResult<Self> {
        if user_agent.trim().is_empty() {
            return Err(FamapError::validation("geocoder user agent must be non-empty"));
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FamapError::Other(anyhow::Error::new(e).context("build http client")))?;
        Ok(Self {
            client,
            search_url: format!("{}/search", base_url.trim_end_matches('/')),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str) -> FamapResult<Option<Coordinates>> {
        let res = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| FamapError::resolution(query, format!("request failed: {e}")))?;

        let body = res
            .bytes()
            .map_err(|e| FamapError::resolution(query, format!("read response: {e}")))?;
        parse_search_response(query, &body)
    }
}

#[derive(serde::Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Decode a `format=jsonv2` search body, taking the first hit.
pub(crate) fn parse_search_response(query: &str, body: &[u8]) -> FamapResult<Option<Coordinates>> {
    let hits: Vec<SearchHit> = serde_json::from_slice(body)
        .map_err(|e| FamapError::resolution(query, format!("malformed response: {e}")))?;
    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let parse = |field: &str, v: &str| {
        v.trim().parse::<f64>().map_err(|e| {
            FamapError::resolution(query, format!("invalid {field} '{v}' in response: {e}"))
        })
    };
    let lat = parse("lat", &hit.lat)?;
    let lon = parse("lon", &hit.lon)?;
    Coordinates::new(lat, lon)
        .map(Some)
        .map_err(|e| FamapError::resolution(query, e.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/geocode/nominatim.rs"]
mod tests;
