use std::time::Duration;

use super::{MapSurface, MarkerHandle};
use crate::{
    config::PanelConfig,
    errors::SurfaceError,
    types::{BoundingBox, Coordinates},
};

/// Stand-in used when the real map could not be created.
///
/// Reads report the configured starting view; every change is refused, so
/// the session still gets an answer for each call.
#[derive(Debug, Clone)]
pub struct UnavailableSurface {
    center: Coordinates,
    zoom: f64,
}

impl UnavailableSurface {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            center: config.initial_center,
            zoom: config.initial_zoom,
        }
    }
}

impl MapSurface for UnavailableSurface {
    fn center(&self) -> Coordinates {
        self.center
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn bounds(&self) -> BoundingBox {
        BoundingBox {
            north: self.center.latitude,
            south: self.center.latitude,
            east: self.center.longitude,
            west: self.center.longitude,
        }
    }

    fn fly_to(&mut self, _: Coordinates, _: f64, _: Duration) -> Result<(), SurfaceError> {
        Err(SurfaceError::Unavailable)
    }

    fn add_marker(
        &mut self,
        _: Coordinates,
        _: &str,
        _: Option<&str>,
    ) -> Result<MarkerHandle, SurfaceError> {
        Err(SurfaceError::Unavailable)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) -> Result<(), SurfaceError> {
        Err(SurfaceError::UnknownMarker(handle.id()))
    }

    fn is_available(&self) -> bool {
        false
    }
}
