use std::{
    collections::VecDeque,
    fmt,
    time::{Duration, Instant},
};

use logger::Color;
use session_protocol::{ClientEvent, EventSink, ServerEvent};

use crate::{
    config::PanelConfig,
    dispatcher::{Registration, ToolDispatcher, ToolRegistry},
    log::PanelLog,
    reporter::ViewportReporter,
    state::EventLog,
    surface::MapSurface,
    types::{Coordinates, MarkerList},
};

/// What the status bar shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelStatus {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub marker_count: usize,
}

impl fmt::Display for PanelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Longitude: {:.4} | Latitude: {:.4} | Zoom: {:.2} | Markers: {}",
            self.longitude, self.latitude, self.zoom, self.marker_count
        )
    }
}

/// State of the map panel and the bridge between the map and the AI session.
///
/// Everything here is touched from the UI thread only. Each frame the app
/// calls [`MapPanel::sync`] with the session state, the inbound event log
/// (newest first) and the outbound sink.
pub struct MapPanel {
    markers: MarkerList,
    reporter: ViewportReporter,
    dispatcher: ToolDispatcher,
    registry: ToolRegistry,
    continuations: VecDeque<Instant>,
    continue_delay: Duration,
    seen_events: usize,
    session_active: bool,
    last_camera: Option<(Coordinates, f64)>,
    log: PanelLog,
}

impl MapPanel {
    pub fn new(config: &PanelConfig, log: PanelLog) -> Self {
        Self {
            markers: MarkerList::new(),
            reporter: ViewportReporter::new(config.report_debounce),
            dispatcher: ToolDispatcher::new(config),
            registry: ToolRegistry::new(),
            continuations: VecDeque::new(),
            continue_delay: config.continue_delay,
            seen_events: 0,
            session_active: false,
            last_camera: None,
            log,
        }
    }

    /// Runs one frame of the panel.
    pub fn sync<S, K>(
        &mut self,
        surface: &mut S,
        session_active: bool,
        events: &[ServerEvent],
        sink: &mut K,
        now: Instant,
    ) where
        S: MapSurface + ?Sized,
        K: EventSink + ?Sized,
    {
        self.set_session_active(session_active);
        self.consume_events(surface, events, sink, now);
        self.observe_camera(surface, now);

        if let Some((viewport, event)) = self.reporter.poll(self.session_active, now) {
            self.log.info(
                &format!("Reporting viewport {}", viewport.fingerprint()),
                Color::Cyan,
            );
            self.send(sink, event);
        }

        self.flush_continuations(sink, now);
    }

    /// Feeds a map move to the viewport reporter.
    pub fn on_map_moved<S: MapSurface + ?Sized>(&mut self, surface: &S, now: Instant) -> bool {
        self.reporter.on_move(surface, self.session_active, now)
    }

    /// Reacts to one inbound session event.
    pub fn handle_event<S, K>(&mut self, surface: &mut S, event: &ServerEvent, sink: &mut K, now: Instant)
    where
        S: MapSurface + ?Sized,
        K: EventSink + ?Sized,
    {
        match event {
            ServerEvent::SessionCreated { .. } => {
                if let Some(update) = self.registry.on_session_created() {
                    self.log.info("Session created, registering map tools", Color::Green);
                    self.send(sink, update);
                }
            }
            ServerEvent::SessionUpdated { .. } => {
                self.log.info("Session configuration acknowledged", Color::Blue);
            }
            ServerEvent::ResponseDone { .. } => {
                for call in event.function_calls() {
                    let outcome = self.dispatcher.dispatch(call, surface, &mut self.markers);
                    if outcome.succeeded() {
                        self.log.info(
                            &format!("{} ({}) -> {}", outcome.action, call.call_id, outcome.output),
                            Color::Magenta,
                        );
                    } else {
                        self.log.warn(&format!(
                            "{} ({}) -> {}",
                            outcome.action, call.call_id, outcome.output
                        ));
                    }

                    self.send(sink, outcome.to_event());
                    self.continuations.push_back(now + self.continue_delay);
                }
            }
            ServerEvent::Error { error } => {
                self.log.warn(&format!("Session error: {}", error.message));
            }
            ServerEvent::Other => {}
        }
    }

    /// Drops the log entries this panel has already consumed.
    pub fn release_seen(&mut self, log: &mut EventLog) {
        let dropped = log.drop_oldest(self.seen_events);
        self.seen_events -= dropped;
    }

    /// Removes every AI marker from the surface, e.g. before the surface goes away.
    pub fn clear_markers<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        let (removed, failures) = self.markers.clear(surface);
        for failure in failures {
            self.log.warn(&format!("Could not remove marker: {}", failure));
        }
        if removed > 0 {
            self.log.info(&format!("Removed {} markers", removed), Color::Yellow);
        }
    }

    pub fn status<S: MapSurface + ?Sized>(&self, surface: &S) -> PanelStatus {
        let center = surface.center();
        PanelStatus {
            longitude: center.longitude,
            latitude: center.latitude,
            zoom: surface.zoom(),
            marker_count: self.markers.len(),
        }
    }

    pub fn markers(&self) -> &MarkerList {
        &self.markers
    }

    pub fn registration(&self) -> Registration {
        self.registry.state()
    }

    pub fn pending_continuations(&self) -> usize {
        self.continuations.len()
    }

    pub fn is_report_pending(&self) -> bool {
        self.reporter.is_pending()
    }

    fn set_session_active(&mut self, active: bool) {
        if self.session_active && !active {
            self.log.warn("Session inactive, map tools unregistered");
            self.registry.on_session_inactive();
            self.reporter.reset();
        } else if !self.session_active && active {
            self.log.info("Session active", Color::Green);
        }
        self.session_active = active;
    }

    // `events` is newest first; only the entries added since the last frame are new.
    fn consume_events<S, K>(&mut self, surface: &mut S, events: &[ServerEvent], sink: &mut K, now: Instant)
    where
        S: MapSurface + ?Sized,
        K: EventSink + ?Sized,
    {
        if events.len() < self.seen_events {
            self.seen_events = 0;
        }

        let fresh = events.len() - self.seen_events;
        self.seen_events = events.len();
        if !self.session_active {
            return;
        }

        for event in events[..fresh].iter().rev() {
            self.handle_event(surface, event, sink, now);
        }
    }

    fn observe_camera<S: MapSurface + ?Sized>(&mut self, surface: &S, now: Instant) {
        let camera = (surface.center(), surface.zoom());
        match self.last_camera {
            Some(previous) if previous == camera => {}
            Some(_) => {
                self.last_camera = Some(camera);
                self.on_map_moved(surface, now);
            }
            None => self.last_camera = Some(camera),
        }
    }

    fn flush_continuations<K: EventSink + ?Sized>(&mut self, sink: &mut K, now: Instant) {
        while let Some(due) = self.continuations.front() {
            if *due > now {
                break;
            }
            self.continuations.pop_front();
            self.send(sink, ClientEvent::ResponseCreate);
        }
    }

    fn send<K: EventSink + ?Sized>(&self, sink: &mut K, event: ClientEvent) {
        if let Err(e) = sink.send_event(event) {
            self.log.error(&format!("Could not send event to session: {}", e));
        }
    }
}
