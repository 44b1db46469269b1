use std::{
    collections::BTreeMap,
    ops::RangeInclusive,
    time::{Duration, Instant},
};

use walkers::{MapMemory, Position};

use super::{FlyTo, MapSurface, MarkerHandle};
use crate::{
    config::PanelConfig,
    errors::SurfaceError,
    types::{BoundingBox, Coordinates},
};

const DEFAULT_VIEW_WIDTH_PX: f64 = 800.0;
const DEFAULT_VIEW_HEIGHT_PX: f64 = 600.0;

/// A marker as stored by the surface for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub id: u64,
    pub position: Coordinates,
    pub label: String,
    pub description: Option<String>,
}

/// Map surface backed by a `walkers` slippy map.
///
/// Owns the camera (`MapMemory`), the markers to draw and the current
/// fly-to animation. Tiles stay with the application, so the surface can be
/// built and driven without an egui context.
pub struct WalkersSurface {
    memory: MapMemory,
    home: Coordinates,
    markers: BTreeMap<u64, PlacedMarker>,
    next_marker_id: u64,
    flight: Option<FlyTo>,
    last_applied: Option<(Coordinates, f64)>,
    view_px: (f64, f64),
    zoom_range: RangeInclusive<f64>,
}

impl WalkersSurface {
    /// Creates the surface at the configured initial center and zoom.
    pub fn new(config: &PanelConfig) -> Result<Self, SurfaceError> {
        let home = Coordinates::validated(
            config.initial_center.longitude,
            config.initial_center.latitude,
        )?;

        let initial_zoom = config.initial_zoom;
        if !initial_zoom.is_finite()
            || !(config.min_zoom..=config.max_zoom).contains(&initial_zoom)
        {
            return Err(SurfaceError::InvalidZoom(initial_zoom));
        }

        let mut memory = MapMemory::default();
        memory
            .set_zoom(config.initial_zoom)
            .map_err(|_| SurfaceError::InvalidZoom(config.initial_zoom))?;

        Ok(Self {
            memory,
            home,
            markers: BTreeMap::new(),
            next_marker_id: 1,
            flight: None,
            last_applied: None,
            view_px: (DEFAULT_VIEW_WIDTH_PX, DEFAULT_VIEW_HEIGHT_PX),
            zoom_range: config.min_zoom..=config.max_zoom,
        })
    }

    /// Position the map falls back to while the camera is not detached.
    pub fn home_position(&self) -> Position {
        to_position(self.home)
    }

    /// Records the on-screen size of the map so bounds match what is visible.
    pub fn set_viewport_size(&mut self, width_px: f32, height_px: f32) {
        if width_px > 0.0 && height_px > 0.0 {
            self.view_px = (width_px as f64, height_px as f64);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    /// Advances the running fly-to animation, if any.
    ///
    /// Any camera change not made by the animation itself (a drag or a scroll)
    /// cancels the flight, leaving the camera where the user put it.
    pub fn tick(&mut self, now: Instant) {
        if let Some(applied) = self.last_applied {
            if !same_camera(applied, (self.center(), self.memory.zoom())) {
                self.flight = None;
                self.last_applied = None;
                return;
            }
        }

        let Some(flight) = self.flight.as_mut() else {
            return;
        };
        let (center, zoom, done) = flight.sample(now);
        self.memory.center_at(to_position(center));
        let _ = self.memory.set_zoom(zoom);
        self.last_applied = Some((self.center(), self.memory.zoom()));

        if done {
            self.flight = None;
            self.last_applied = None;
        }
    }

    /// Camera and markers, split so the map widget can borrow both at once.
    pub fn parts_mut(&mut self) -> (&mut MapMemory, Vec<&PlacedMarker>) {
        (&mut self.memory, self.markers.values().collect())
    }

    pub fn placed_markers(&self) -> impl Iterator<Item = &PlacedMarker> {
        self.markers.values()
    }

    fn check_zoom(&self, zoom: f64) -> Result<(), SurfaceError> {
        if zoom.is_finite() && self.zoom_range.contains(&zoom) {
            Ok(())
        } else {
            Err(SurfaceError::InvalidZoom(zoom))
        }
    }
}

impl MapSurface for WalkersSurface {
    fn center(&self) -> Coordinates {
        self.memory
            .detached()
            .map(|position| Coordinates::new(position.lon(), position.lat()))
            .unwrap_or(self.home)
    }

    fn zoom(&self) -> f64 {
        self.memory.zoom()
    }

    fn bounds(&self) -> BoundingBox {
        BoundingBox::from_view(self.center(), self.zoom(), self.view_px.0, self.view_px.1)
    }

    fn fly_to(
        &mut self,
        center: Coordinates,
        zoom: f64,
        duration: Duration,
    ) -> Result<(), SurfaceError> {
        let center = Coordinates::validated(center.longitude, center.latitude)?;
        self.check_zoom(zoom)?;

        self.flight = Some(FlyTo::new(
            self.center(),
            self.zoom(),
            center,
            zoom,
            duration,
        ));
        self.last_applied = None;
        Ok(())
    }

    fn add_marker(
        &mut self,
        position: Coordinates,
        label: &str,
        description: Option<&str>,
    ) -> Result<MarkerHandle, SurfaceError> {
        let position = Coordinates::validated(position.longitude, position.latitude)?;
        if label.trim().is_empty() {
            return Err(SurfaceError::InvalidMarker(
                "label must not be empty".to_string(),
            ));
        }

        let id = self.next_marker_id;
        self.next_marker_id += 1;
        self.markers.insert(
            id,
            PlacedMarker {
                id,
                position,
                label: label.to_string(),
                description: description.map(str::to_string),
            },
        );

        Ok(MarkerHandle::new(id))
    }

    fn remove_marker(&mut self, handle: MarkerHandle) -> Result<(), SurfaceError> {
        self.markers
            .remove(&handle.id())
            .map(|_| ())
            .ok_or(SurfaceError::UnknownMarker(handle.id()))
    }
}

fn to_position(coordinates: Coordinates) -> Position {
    Position::from_lat_lon(coordinates.latitude, coordinates.longitude)
}

fn same_camera(a: (Coordinates, f64), b: (Coordinates, f64)) -> bool {
    const EPSILON: f64 = 1e-9;
    (a.0.longitude - b.0.longitude).abs() < EPSILON
        && (a.0.latitude - b.0.latitude).abs() < EPSILON
        && (a.1 - b.1).abs() < EPSILON
}
