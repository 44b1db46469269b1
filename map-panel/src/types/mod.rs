mod viewport;
pub use viewport::{BoundingBox, Coordinates, Fingerprint, Viewport};

mod marker;
pub use marker::{Marker, MarkerList, MarkerSummary};

mod point;
pub use point::{PointOfInterest, SAMPLE_POINTS};
