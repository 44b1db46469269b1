use egui::{Color32, RichText};

use crate::panel::PanelStatus;

/// Status line with the camera, the marker count and whether a session is live.
pub fn status_bar(ui: &mut egui::Ui, status: &PanelStatus, session_active: bool) {
    ui.horizontal(|ui| {
        let (dot, text) = if session_active {
            (Color32::from_rgb(0, 200, 0), "Session active")
        } else {
            (Color32::from_gray(140), "No session")
        };
        ui.label(RichText::new("●").color(dot));
        ui.label(text);
        ui.separator();
        ui.label(RichText::new(status.to_string()).monospace());
    });
}
