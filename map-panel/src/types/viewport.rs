use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

use crate::errors::SurfaceError;

const KM_PER_DEGREE: f64 = 111.0;
const TILE_SIZE_PX: f64 = 256.0;
const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_78;

/// A longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Builds coordinates that a map surface can actually place.
    pub fn validated(longitude: f64, latitude: f64) -> Result<Self, SurfaceError> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(SurfaceError::InvalidCoordinates(format!(
                "non-finite coordinates ({}, {})",
                longitude, latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(SurfaceError::InvalidCoordinates(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SurfaceError::InvalidCoordinates(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        Ok(Self::new(longitude, latitude))
    }
}

/// The geographic rectangle currently visible on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Computes the visible rectangle of a web-mercator view of `width_px` x `height_px`
    /// centered on `center` at slippy-map `zoom`.
    pub fn from_view(center: Coordinates, zoom: f64, width_px: f64, height_px: f64) -> Self {
        let world_px = TILE_SIZE_PX * 2f64.powf(zoom);
        let center_x = mercator_x(center.longitude) * world_px;
        let center_y = mercator_y(center.latitude) * world_px;

        let half_w = width_px / 2.0;
        let half_h = height_px / 2.0;

        let west = wrap_longitude(inverse_mercator_x((center_x - half_w) / world_px));
        let east = wrap_longitude(inverse_mercator_x((center_x + half_w) / world_px));
        let north = inverse_mercator_y((center_y - half_h) / world_px);
        let south = inverse_mercator_y((center_y + half_h) / world_px);

        let (west, east) = if width_px >= world_px {
            (-180.0, 180.0)
        } else {
            (west, east)
        };

        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Longitudinal extent in degrees, accounting for views that cross the antimeridian.
    pub fn width_degrees(&self) -> f64 {
        if self.east >= self.west {
            self.east - self.west
        } else {
            self.east - self.west + 360.0
        }
    }

    pub fn height_degrees(&self) -> f64 {
        self.north - self.south
    }

    pub fn contains(&self, position: Coordinates) -> bool {
        let within_lat = position.latitude >= self.south && position.latitude <= self.north;
        let within_lon = if self.east >= self.west {
            position.longitude >= self.west && position.longitude <= self.east
        } else {
            position.longitude >= self.west || position.longitude <= self.east
        };
        within_lat && within_lon
    }
}

/// Reduced-precision encoding of a viewport, used to detect "no meaningful change".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the map currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: f64,
    pub bounds: BoundingBox,
}

impl Viewport {
    /// Two decimals of longitude and latitude, one of zoom.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint(format!(
            "{:.2},{:.2},{:.1}",
            self.center.longitude, self.center.latitude, self.zoom
        ))
    }

    /// Flat-earth estimate of the visible area.
    ///
    /// Latitude degrees count 111 km each; longitude degrees are scaled by the
    /// cosine of the mean latitude of the view.
    pub fn area_km2(&self) -> f64 {
        let mean_lat = ((self.bounds.north + self.bounds.south) / 2.0).to_radians();
        let height_km = self.bounds.height_degrees() * KM_PER_DEGREE;
        let width_km = self.bounds.width_degrees() * KM_PER_DEGREE * mean_lat.cos();
        (width_km * height_km).abs()
    }

    /// The context line sent to the AI session when the view settles.
    pub fn describe(&self) -> String {
        format!(
            "Map view updated: center longitude {:.4}, latitude {:.4}, zoom {:.2}, visible area approximately {:.0} km².",
            self.center.longitude,
            self.center.latitude,
            self.zoom,
            self.area_km2()
        )
    }
}

fn mercator_x(lon_deg: f64) -> f64 {
    (lon_deg + 180.0) / 360.0
}

fn mercator_y(lat_deg: f64) -> f64 {
    let lat = lat_deg
        .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG)
        .to_radians();
    (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0
}

fn inverse_mercator_x(x: f64) -> f64 {
    x * 360.0 - 180.0
}

fn inverse_mercator_y(y: f64) -> f64 {
    let y = y.clamp(0.0, 1.0);
    let n = PI * (1.0 - 2.0 * y);
    n.sinh().atan().to_degrees()
}

fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
