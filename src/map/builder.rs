use std::path::PathBuf;

use crate::family::dataset::FamilyDataset;
use crate::foundation::core::Coordinates;
use crate::foundation::error::FamapResult;
use crate::geocode::cache::GeocodeCache;
use crate::geocode::nominatim::Geocoder;
use crate::geocode::store::CacheStore;
use crate::pin::compositor::IconCompositor;

/// One pinned visit.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    /// Place name as written in the dataset.
    pub place: String,
    /// Where the marker sits.
    pub coordinates: Coordinates,
    /// Optional popup link.
    pub url: Option<String>,
}

/// All markers of one family member, drawn with that member's pin.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Member name, used as the overlay label.
    pub name: String,
    /// Pin image written by the compositor.
    pub pin: PathBuf,
    /// Markers in dataset order.
    pub markers: Vec<Marker>,
}

/// Everything needed to render the map page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FamilyMap {
    /// One layer per member, in dataset order.
    pub layers: Vec<Layer>,
}

impl FamilyMap {
    /// Total markers over all layers.
    pub fn marker_count(&self) -> usize {
        self.layers.iter().map(|l| l.markers.len()).sum()
    }
}

/// Make every member's pin and resolve every place, in dataset order.
///
/// Stops at the first failure; no partial map is returned.
pub fn build_map<G: Geocoder, S: CacheStore>(
    dataset: &FamilyDataset,
    cache: &mut GeocodeCache<G, S>,
    compositor: &IconCompositor,
) -> FamapResult<FamilyMap> {
    let mut layers = Vec::with_capacity(dataset.entities().len());

    for entity in dataset.entities() {
        let pin = compositor.make_pin(&entity.image, &entity.name)?;

        let mut markers = Vec::with_capacity(entity.places.len());
        for place in &entity.places {
            let coordinates = match place.literal_coordinates() {
                Some(c) => c,
                None => cache.resolve(&place.name)?,
            };
            markers.push(Marker {
                place: place.name.clone(),
                coordinates,
                url: place.link().map(str::to_string),
            });
        }

        tracing::debug!(entity = %entity.name, markers = markers.len(), "layer ready");
        layers.push(Layer {
            name: entity.name.clone(),
            pin,
            markers,
        });
    }

    Ok(FamilyMap { layers })
}
