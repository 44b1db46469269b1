use serde::Serialize;

use super::Coordinates;
use crate::{
    errors::SurfaceError,
    surface::{MapSurface, MarkerHandle},
};

/// A marker placed on the map at the AI's request.
///
/// The marker owns its rendering handle; the only way to release the handle
/// is through [`MarkerList::clear`], which keeps list and map in lock-step.
#[derive(Debug, PartialEq)]
pub struct Marker {
    pub label: String,
    pub position: Coordinates,
    pub description: Option<String>,
    handle: MarkerHandle,
}

/// What the AI gets to see about a marker: no rendering handle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSummary {
    pub label: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl Marker {
    pub fn summary(&self) -> MarkerSummary {
        MarkerSummary {
            label: self.label.clone(),
            longitude: self.position.longitude,
            latitude: self.position.latitude,
        }
    }
}

/// The panel's markers, in insertion order.
///
/// Handles go back to the surface only through [`MarkerList::clear`]. A list
/// dropped without it leaves its markers drawn, so whoever owns the list
/// clears it before letting go of the surface.
#[derive(Debug, Default)]
pub struct MarkerList {
    markers: Vec<Marker>,
}

impl MarkerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a marker on the surface and records it.
    ///
    /// Nothing is recorded when the surface refuses the marker.
    pub fn add<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        position: Coordinates,
        label: &str,
        description: Option<&str>,
    ) -> Result<&Marker, SurfaceError> {
        if label.trim().is_empty() {
            return Err(SurfaceError::InvalidMarker("label must not be empty".to_string()));
        }

        let handle = surface.add_marker(position, label, description)?;
        self.markers.push(Marker {
            label: label.to_string(),
            position,
            description: description.map(str::to_string),
            handle,
        });

        let last = self.markers.len() - 1;
        Ok(&self.markers[last])
    }

    /// Removes every marker from the list and its handle from the surface.
    ///
    /// The list is always emptied. Returns how many markers were dropped and the
    /// surface errors for handles that could not be released.
    pub fn clear<S: MapSurface + ?Sized>(&mut self, surface: &mut S) -> (usize, Vec<SurfaceError>) {
        let removed = self.markers.len();
        let failures = self
            .markers
            .drain(..)
            .filter_map(|marker| surface.remove_marker(marker.handle).err())
            .collect();
        (removed, failures)
    }

    pub fn summaries(&self) -> Vec<MarkerSummary> {
        self.markers.iter().map(Marker::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::WalkersSurface;
    use crate::PanelConfig;

    fn surface() -> WalkersSurface {
        WalkersSurface::new(&PanelConfig::default()).unwrap()
    }

    #[test]
    fn add_keeps_list_and_surface_in_step() {
        let mut surface = surface();
        let mut markers = MarkerList::new();

        markers
            .add(&mut surface, Coordinates::new(-122.42, 37.77), "Ferry Building", None)
            .unwrap();
        markers
            .add(
                &mut surface,
                Coordinates::new(-73.98, 40.75),
                "Times Square",
                Some("Crossroads of the world"),
            )
            .unwrap();

        assert_eq!(markers.len(), 2);
        assert_eq!(surface.placed_markers().count(), 2);
        assert_eq!(
            markers.summaries()[1],
            MarkerSummary {
                label: "Times Square".to_string(),
                longitude: -73.98,
                latitude: 40.75,
            }
        );
    }

    #[test]
    fn rejected_marker_is_not_recorded() {
        let mut surface = surface();
        let mut markers = MarkerList::new();

        let result = markers.add(&mut surface, Coordinates::new(0.0, 0.0), "  ", None);

        assert!(matches!(result, Err(SurfaceError::InvalidMarker(_))));
        assert!(markers.is_empty());
        assert_eq!(surface.placed_markers().count(), 0);
    }

    #[test]
    fn clear_releases_every_handle() {
        let mut surface = surface();
        let mut markers = MarkerList::new();
        for i in 0..3 {
            markers
                .add(&mut surface, Coordinates::new(i as f64, 0.0), "m", None)
                .unwrap();
        }

        let (removed, failures) = markers.clear(&mut surface);

        assert_eq!(removed, 3);
        assert!(failures.is_empty());
        assert!(markers.is_empty());
        assert_eq!(surface.placed_markers().count(), 0);
    }
}
