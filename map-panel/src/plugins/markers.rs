use egui::{Align2, Color32, FontId, Rect, Response, Stroke, Vec2};
use walkers::{Plugin, Position, Projector};

use crate::surface::PlacedMarker;

const MARKER_RADIUS: f32 = 8.0;
const MARKER_FILL: Color32 = Color32::from_rgb(220, 53, 69);

/// Draws the markers placed by the AI, with the description on hover.
pub struct Markers<'a> {
    markers: Vec<&'a PlacedMarker>,
}

impl<'a> Markers<'a> {
    pub fn new(markers: Vec<&'a PlacedMarker>) -> Self {
        Self { markers }
    }
}

impl Plugin for Markers<'_> {
    fn run(self: Box<Self>, ui: &mut egui::Ui, _response: &Response, projector: &Projector) {
        for marker in self.markers {
            draw_marker(ui, projector, marker);
        }
    }
}

fn draw_marker(ui: &mut egui::Ui, projector: &Projector, marker: &PlacedMarker) {
    let position = Position::from_lat_lon(marker.position.latitude, marker.position.longitude);
    let center = projector.project(position).to_pos2();

    let area = Rect::from_center_size(center, Vec2::splat(MARKER_RADIUS * 2.0));
    let response = ui.allocate_rect(area, egui::Sense::hover());

    let stroke = if response.hovered() {
        Stroke::new(3.0, Color32::YELLOW)
    } else {
        Stroke::new(2.0, Color32::WHITE)
    };

    let painter = ui.painter();
    painter.circle(center, MARKER_RADIUS, MARKER_FILL, stroke);
    painter.text(
        center - Vec2::new(0.0, MARKER_RADIUS + 4.0),
        Align2::CENTER_BOTTOM,
        &marker.label,
        FontId::proportional(14.0),
        Color32::BLACK,
    );

    if let Some(description) = &marker.description {
        response.on_hover_text(description.as_str());
    }
}
