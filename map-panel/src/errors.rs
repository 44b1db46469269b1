use thiserror::Error;

/// Failures reported by a map surface when asked to change what it shows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),
    #[error("invalid zoom: {0}")]
    InvalidZoom(f64),
    #[error("invalid marker: {0}")]
    InvalidMarker(String),
    #[error("unknown marker handle {0}")]
    UnknownMarker(u64),
    #[error("map unavailable")]
    Unavailable,
}

/// Failures of the panel itself.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("map initialization failed: {0}")]
    MapInit(#[from] SurfaceError),
}
