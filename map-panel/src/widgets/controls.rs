use egui::{Align2, RichText, Window};
use walkers::MapMemory;

/// Zoom buttons in the top right corner of the map.
pub fn zoom_controls(ui: &egui::Ui, map_memory: &mut MapMemory) {
    Window::new("zoom")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::RIGHT_TOP, [-10.0, 10.0])
        .show(ui.ctx(), |ui| {
            ui.horizontal(|ui| {
                if ui.button(RichText::new("➕").heading()).clicked() {
                    let _ = map_memory.zoom_in();
                }

                if ui.button(RichText::new("➖").heading()).clicked() {
                    let _ = map_memory.zoom_out();
                }
            });
        });
}
