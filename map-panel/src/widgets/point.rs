use egui::{Color32, RichText};

use crate::types::PointOfInterest;

/// A window with the details of the selected sample point.
pub struct WidgetPoint {
    pub selected_point: PointOfInterest,
}

impl WidgetPoint {
    pub fn new(selected_point: PointOfInterest) -> Self {
        Self { selected_point }
    }

    /// Shows the window. Returns `false` once the user closes it.
    pub fn show(&mut self, ctx: &egui::Context) -> bool {
        let mut open = true;

        egui::Window::new(self.selected_point.name)
            .resizable(false)
            .collapsible(true)
            .open(&mut open)
            .fixed_pos([20.0, 20.0])
            .show(ctx, |ui| {
                ui.visuals_mut().override_text_color = Some(Color32::WHITE);
                ui.visuals_mut().widgets.noninteractive.bg_fill = Color32::from_gray(30);

                ui.label(
                    RichText::new(self.selected_point.description)
                        .size(18.0)
                        .strong(),
                );
                ui.add_space(10.0);
                ui.label(
                    RichText::new(format!(
                        "Longitude: {:.4}   Latitude: {:.4}",
                        self.selected_point.position.longitude,
                        self.selected_point.position.latitude
                    ))
                    .size(14.0),
                );
            });

        open
    }
}
