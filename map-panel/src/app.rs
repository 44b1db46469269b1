use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

use egui::{Context, RichText};
use egui_extras::install_image_loaders;
use logger::Color;
use relay::SessionRelay;
use session_protocol::{ClientEvent, EventSink};
use walkers::{HttpOptions, HttpTiles, Map, Tiles};

use crate::{
    config::PanelConfig,
    errors::PanelError,
    log::PanelLog,
    panel::MapPanel,
    plugins,
    state::{EventLog, SelectionState},
    surface::{MapSurface, UnavailableSurface, WalkersSurface},
    types::SAMPLE_POINTS,
    widgets::{status_bar, zoom_controls, WidgetPoint},
};

const UPDATE_TICK_MS: u64 = 100;

/// The eframe application hosting the map panel.
///
/// Each frame it pulls inbound events off the relay, advances the camera,
/// lets the [`MapPanel`] react, and draws the map with its sample points and
/// AI markers.
pub struct MapApp {
    tiles: Box<dyn Tiles>,
    surface: Option<WalkersSurface>,
    fallback: UnavailableSurface,
    panel: MapPanel,
    relay: Option<SessionRelay>,
    event_log: EventLog,
    selection_state: Rc<RefCell<SelectionState>>,
    point_widget: Option<WidgetPoint>,
    log: PanelLog,
}

impl MapApp {
    pub fn new(
        egui_ctx: Context,
        config: PanelConfig,
        relay: Option<SessionRelay>,
        log: PanelLog,
    ) -> Self {
        install_image_loaders(&egui_ctx);

        let surface = match WalkersSurface::new(&config).map_err(PanelError::from) {
            Ok(surface) => Some(surface),
            Err(e) => {
                log.error(&e.to_string());
                None
            }
        };

        if relay.is_none() {
            log.warn("Running without a session relay");
        }

        Self {
            tiles: Box::new(HttpTiles::with_options(
                walkers::sources::OpenStreetMap,
                HttpOptions::default(),
                egui_ctx.to_owned(),
            )),
            surface,
            fallback: UnavailableSurface::new(&config),
            panel: MapPanel::new(&config, log.clone()),
            relay,
            event_log: EventLog::new(),
            selection_state: Rc::new(RefCell::new(SelectionState::new())),
            point_widget: None,
            log,
        }
    }

    /// Moves whatever the relay received into the event log.
    fn pump_relay(&mut self) -> bool {
        let Some(relay) = &self.relay else {
            return false;
        };

        for event in relay.drain() {
            match event {
                Ok(event) => {
                    self.event_log.record(event);
                }
                Err(e) => self.log.warn(&format!("Skipping inbound event: {}", e)),
            }
        }

        relay.is_active()
    }

    // Runs even without a map, so calls in flight still get an answer.
    fn sync_panel(&mut self, session_active: bool, now: Instant) {
        let surface: &mut dyn MapSurface = match self.surface.as_mut() {
            Some(surface) => {
                surface.tick(now);
                surface
            }
            None => &mut self.fallback,
        };

        let mut offline: Vec<ClientEvent> = Vec::new();
        let sink: &mut dyn EventSink = match self.relay.as_mut() {
            Some(relay) => relay,
            None => &mut offline,
        };

        self.panel
            .sync(surface, session_active, self.event_log.events(), sink, now);
        self.panel.release_seen(&mut self.event_log);
    }

    fn show_point_widget(&mut self, ctx: &Context) {
        let selected_point = self.selection_state.borrow().point.clone();
        let Some(point) = selected_point else {
            self.point_widget = None;
            return;
        };

        let stale = self
            .point_widget
            .as_ref()
            .map_or(true, |widget| widget.selected_point.id != point.id);
        if stale {
            self.point_widget = Some(WidgetPoint::new(point));
        }

        if let Some(widget) = &mut self.point_widget {
            if !widget.show(ctx) {
                self.selection_state.borrow_mut().point = None;
                self.point_widget = None;
            }
        }
    }
}

impl eframe::App for MapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let session_active = self.pump_relay();
        self.sync_panel(session_active, now);

        match &self.surface {
            Some(surface) if surface.is_animating() => ctx.request_repaint(),
            _ => ctx.request_repaint_after(Duration::from_millis(UPDATE_TICK_MS)),
        }

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if let Some(surface) = &self.surface {
                status_bar(ui, &self.panel.status(surface), session_active);
            }
        });

        let rimless = egui::Frame {
            fill: ctx.style().visuals.panel_fill,
            ..Default::default()
        };

        egui::CentralPanel::default()
            .frame(rimless)
            .show(ctx, |ui| {
                let Some(surface) = self.surface.as_mut() else {
                    ui.centered_and_justified(|ui| {
                        ui.label(RichText::new("Map unavailable").size(24.0));
                    });
                    return;
                };

                let my_position = surface.home_position();
                let (map_memory, placed_markers) = surface.parts_mut();

                let points_plugin =
                    plugins::Points::new(&SAMPLE_POINTS, self.selection_state.clone());
                let markers_plugin = plugins::Markers::new(placed_markers);

                let map = Map::new(Some(self.tiles.as_mut()), map_memory, my_position)
                    .with_plugin(points_plugin)
                    .with_plugin(markers_plugin);

                let response = ui.add(map);
                zoom_controls(ui, map_memory);

                surface.set_viewport_size(response.rect.width(), response.rect.height());
            });

        self.show_point_widget(ctx);
    }
}

impl Drop for MapApp {
    fn drop(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            self.panel.clear_markers(surface);
        }
        self.log.info("Map panel closed", Color::Yellow);
    }
}
