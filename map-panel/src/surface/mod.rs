use std::time::Duration;

use crate::{
    errors::SurfaceError,
    types::{BoundingBox, Coordinates, Viewport},
};

mod animation;
mod unavailable;
mod walkers;

pub use animation::FlyTo;
pub use unavailable::UnavailableSurface;
pub use walkers::{PlacedMarker, WalkersSurface};

/// Identifies one marker placed on a map surface.
///
/// Handles are neither `Clone` nor `Copy`: whoever holds one owns the marker,
/// and giving it back to [`MapSurface::remove_marker`] consumes it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// The rendering surface the panel drives.
///
/// Implemented by [`WalkersSurface`] for the real window and by fakes in tests.
pub trait MapSurface {
    fn center(&self) -> Coordinates;

    fn zoom(&self) -> f64;

    fn bounds(&self) -> BoundingBox;

    /// Starts an animated transition to `center` at `zoom` lasting `duration`.
    fn fly_to(
        &mut self,
        center: Coordinates,
        zoom: f64,
        duration: Duration,
    ) -> Result<(), SurfaceError>;

    fn add_marker(
        &mut self,
        position: Coordinates,
        label: &str,
        description: Option<&str>,
    ) -> Result<MarkerHandle, SurfaceError>;

    fn remove_marker(&mut self, handle: MarkerHandle) -> Result<(), SurfaceError>;

    /// False when there is no map behind this surface.
    fn is_available(&self) -> bool {
        true
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            center: self.center(),
            zoom: self.zoom(),
            bounds: self.bounds(),
        }
    }
}
