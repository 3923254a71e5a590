use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::core::Coordinates;
use crate::foundation::error::{FamapError, FamapResult};

/// One family member and the places they visited, in file order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Entity {
    /// Display name; also the key into the ring color table.
    pub name: String,
    /// Avatar image path. May point at a file that does not exist.
    pub image: PathBuf,
    /// Visits in display order.
    #[serde(default)]
    pub places: Vec<Place>,
}

/// A visit. Either both `lat`/`lon` are given, or the name is geocoded.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Place {
    /// Free-text place name, also the geocoding key.
    pub name: String,
    /// Literal latitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Literal longitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// Link shown in the marker popup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Place {
    /// Coordinates given inline, if any.
    ///
    /// Only meaningful on validated data; a half-specified pair reads as `None`.
    pub fn literal_coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
            _ => None,
        }
    }

    /// Popup link, ignoring empty strings.
    pub fn link(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// Validated, read-only list of family members.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FamilyDataset {
    entities: Vec<Entity>,
}

impl FamilyDataset {
    /// Parse a JSON array of entities from `r` and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> FamapResult<Self> {
        let entities: Vec<Entity> = serde_json::from_reader(r)
            .map_err(|e| FamapError::serde(format!("parse family JSON: {e}")))?;
        Self::new(entities)
    }

    /// Parse and validate a family JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> FamapResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| FamapError::io(path, e))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate already-built records.
    pub fn new(entities: Vec<Entity>) -> FamapResult<Self> {
        for (i, entity) in entities.iter().enumerate() {
            validate_entity(i, entity)?;
        }
        Ok(Self { entities })
    }

    /// Members in file order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Total number of places across all members.
    pub fn place_count(&self) -> usize {
        self.entities.iter().map(|e| e.places.len()).sum()
    }
}

fn validate_entity(idx: usize, entity: &Entity) -> FamapResult<()> {
    if entity.name.trim().is_empty() {
        return Err(FamapError::validation(format!(
            "family member #{idx} has an empty name"
        )));
    }
    if entity.image.as_os_str().is_empty() {
        return Err(FamapError::validation(format!(
            "family member '{}' has an empty image path",
            entity.name
        )));
    }

    for (j, place) in entity.places.iter().enumerate() {
        if place.name.is_empty() {
            return Err(FamapError::validation(format!(
                "place #{j} of '{}' has an empty name",
                entity.name
            )));
        }
        match (place.lat, place.lon) {
            (Some(lat), Some(lon)) => {
                Coordinates::new(lat, lon).map_err(|e| {
                    FamapError::validation(format!(
                        "place '{}' of '{}': {e}",
                        place.name, entity.name
                    ))
                })?;
            }
            (None, None) => {}
            _ => {
                return Err(FamapError::validation(format!(
                    "place '{}' of '{}' must give both lat and lon or neither",
                    place.name, entity.name
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/family/dataset.rs"]
mod tests;
