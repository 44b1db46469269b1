mod controls;
mod point;
mod status;

pub use controls::zoom_controls;
pub use point::WidgetPoint;
pub use status::status_bar;
