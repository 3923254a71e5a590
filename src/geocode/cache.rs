use crate::foundation::core::Coordinates;
use crate::foundation::error::{FamapError, FamapResult};
use crate::geocode::nominatim::Geocoder;
use crate::geocode::store::{CacheEntries, CacheStore};
use crate::geocode::throttle::RateLimiter;

/// Write-through, rate-limited memo of place name to coordinates.
///
/// Keys are used verbatim: `"Paris"`, `"paris"` and `"Paris "` are three entries. Each distinct key
/// reaches the geocoder at most once for as long as the backing store is carried forward.
#[derive(Debug)]
pub struct GeocodeCache<G, S> {
    geocoder: G,
    store: S,
    limiter: RateLimiter,
    entries: CacheEntries,
    lookups: usize,
}

impl<G: Geocoder, S: CacheStore> GeocodeCache<G, S> {
    /// Hydrate a cache from `store`.
    pub fn load(geocoder: G, store: S, limiter: RateLimiter) -> FamapResult<Self> {
        let entries = store.load()?;
        tracing::debug!(entries = entries.len(), "loaded geocode cache");
        Ok(Self {
            geocoder,
            store,
            limiter,
            entries,
            lookups: 0,
        })
    }

    /// Coordinates for `place`, from memory or a single external lookup.
    ///
    /// A newly resolved entry is persisted before this returns. A failed lookup leaves both the
    /// mapping and the store untouched.
    #[tracing::instrument(skip(self))]
    pub fn resolve(&mut self, place: &str) -> FamapResult<Coordinates> {
        if let Some(hit) = self.entries.get(place) {
            tracing::debug!(lat = hit.lat, lon = hit.lon, "cache hit");
            return Ok(*hit);
        }

        self.limiter.wait();
        self.lookups += 1;
        let found = self
            .geocoder
            .geocode(place)
            .map_err(|e| match e {
                e @ FamapError::Resolution { .. } => e,
                other => FamapError::resolution(place, other.to_string()),
            })?
            .ok_or_else(|| FamapError::resolution(place, "no match"))?;

        tracing::info!(lat = found.lat, lon = found.lon, "geocoded");
        self.entries.insert(place.to_string(), found);
        if let Err(e) = self.store.save(&self.entries) {
            self.entries.remove(place);
            return Err(e);
        }
        Ok(found)
    }

    /// Persist the full mapping now.
    pub fn flush(&mut self) -> FamapResult<()> {
        self.store.save(&self.entries)
    }

    /// Cached coordinates for `place` without any lookup.
    pub fn get(&self, place: &str) -> Option<Coordinates> {
        self.entries.get(place).copied()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// External lookups issued by this instance.
    pub fn lookups(&self) -> usize {
        self.lookups
    }

    /// Borrow the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the store, e.g. to hand it to the next run in tests.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geocode/cache.rs"]
mod tests;
