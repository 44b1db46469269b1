use std::{cell::RefCell, rc::Rc};

use egui::{include_image, Image, Rect, Response, Vec2};
use walkers::{Plugin, Position, Projector};

use crate::{state::SelectionState, types::PointOfInterest};

/// Draws the sample points as clickable pins.
pub struct Points<'a> {
    points: &'a [PointOfInterest],
    selection_state: Rc<RefCell<SelectionState>>,
}

impl<'a> Points<'a> {
    pub fn new(points: &'a [PointOfInterest], selection_state: Rc<RefCell<SelectionState>>) -> Self {
        Self {
            points,
            selection_state,
        }
    }
}

impl Plugin for Points<'_> {
    fn run(self: Box<Self>, ui: &mut egui::Ui, _response: &Response, projector: &Projector) {
        for point in self.points {
            point.draw(ui, projector, &mut self.selection_state.borrow_mut());
        }
    }
}

impl PointOfInterest {
    fn draw(&self, ui: &mut egui::Ui, projector: &Projector, selection_state: &mut SelectionState) {
        let position = Position::from_lat_lon(self.position.latitude, self.position.longitude);
        let screen_position = projector.project(position).to_pos2();

        let symbol_size = Vec2::new(30.0, 30.0);

        // The tip of the pin sits on the location.
        let rect = Rect::from_min_size(
            screen_position - Vec2::new(symbol_size.x / 2.0, symbol_size.y),
            symbol_size,
        );

        let response = ui
            .allocate_rect(rect, egui::Sense::click())
            .on_hover_text(self.name);

        let selected = selection_state
            .point
            .as_ref()
            .is_some_and(|point| point.id == self.id);

        let image = if response.hovered() || selected {
            Image::new(include_image!("../../assets/pin-selected.svg"))
        } else {
            Image::new(include_image!("../../assets/pin.svg"))
        }
        .fit_to_exact_size(symbol_size);

        ui.put(rect, image);

        if response.clicked() {
            selection_state.toggle_point_selection(self);
        }
    }
}
