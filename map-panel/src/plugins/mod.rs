mod markers;
mod points;

pub use markers::Markers;
pub use points::Points;
