use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use map_panel::{
    dispatcher::Registration,
    errors::SurfaceError,
    surface::{MapSurface, MarkerHandle, UnavailableSurface},
    types::{BoundingBox, Coordinates},
    EventLog, MapPanel, PanelConfig, PanelLog,
};
use serde_json::Value;
use session_protocol::{ClientEvent, FunctionCall, ServerEvent};

// Surface that applies every change at once and remembers what it was asked to do.
struct FakeSurface {
    center: Coordinates,
    zoom: f64,
    markers: BTreeMap<u64, String>,
    next_id: u64,
    flights: Vec<(Coordinates, f64, Duration)>,
}

impl FakeSurface {
    fn new() -> Self {
        Self {
            center: Coordinates::new(-100.0, 40.0),
            zoom: 3.0,
            markers: BTreeMap::new(),
            next_id: 1,
            flights: Vec::new(),
        }
    }

    fn pan_to(&mut self, longitude: f64, latitude: f64, zoom: f64) {
        self.center = Coordinates::new(longitude, latitude);
        self.zoom = zoom;
    }
}

impl MapSurface for FakeSurface {
    fn center(&self) -> Coordinates {
        self.center
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn bounds(&self) -> BoundingBox {
        BoundingBox::from_view(self.center, self.zoom, 800.0, 600.0)
    }

    fn fly_to(
        &mut self,
        center: Coordinates,
        zoom: f64,
        duration: Duration,
    ) -> Result<(), SurfaceError> {
        let center = Coordinates::validated(center.longitude, center.latitude)?;
        self.flights.push((center, zoom, duration));
        self.center = center;
        self.zoom = zoom;
        Ok(())
    }

    fn add_marker(
        &mut self,
        position: Coordinates,
        label: &str,
        _description: Option<&str>,
    ) -> Result<MarkerHandle, SurfaceError> {
        Coordinates::validated(position.longitude, position.latitude)?;
        if label.is_empty() {
            return Err(SurfaceError::InvalidMarker("empty label".to_string()));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.markers.insert(id, label.to_string());
        Ok(MarkerHandle::new(id))
    }

    fn remove_marker(&mut self, handle: MarkerHandle) -> Result<(), SurfaceError> {
        self.markers
            .remove(&handle.id())
            .map(|_| ())
            .ok_or(SurfaceError::UnknownMarker(handle.id()))
    }
}

struct Harness {
    panel: MapPanel,
    surface: FakeSurface,
    inbound: Vec<ServerEvent>,
    sent: Vec<ClientEvent>,
    t0: Instant,
}

impl Harness {
    fn new() -> Self {
        Self {
            panel: MapPanel::new(&PanelConfig::default(), PanelLog::default()),
            surface: FakeSurface::new(),
            inbound: Vec::new(),
            sent: Vec::new(),
            t0: Instant::now(),
        }
    }

    // The panel reads the log newest first.
    fn receive(&mut self, event: ServerEvent) {
        self.inbound.insert(0, event);
    }

    fn step(&mut self, active: bool, at_ms: u64) {
        let now = self.t0 + Duration::from_millis(at_ms);
        self.panel
            .sync(&mut self.surface, active, &self.inbound, &mut self.sent, now);
    }

    fn contexts(&self) -> Vec<&str> {
        self.sent
            .iter()
            .filter_map(|event| event.user_text_content())
            .collect()
    }

    fn session_updates(&self) -> usize {
        self.sent
            .iter()
            .filter(|event| matches!(event, ClientEvent::SessionUpdate { .. }))
            .count()
    }

    fn continues(&self) -> usize {
        self.sent
            .iter()
            .filter(|event| matches!(event, ClientEvent::ResponseCreate))
            .count()
    }

    fn outputs(&self) -> Vec<(String, Value)> {
        self.sent
            .iter()
            .filter_map(|event| event.function_output_parts())
            .map(|(call_id, output)| {
                (
                    call_id.to_string(),
                    serde_json::from_str(output).expect("output is JSON"),
                )
            })
            .collect()
    }
}

fn calls(calls: &[(&str, &str, &str)]) -> ServerEvent {
    ServerEvent::response_with_calls(
        calls
            .iter()
            .map(|(name, id, args)| FunctionCall::new(name, id, args))
            .collect(),
    )
}

#[test]
fn burst_of_moves_reports_only_the_final_view() {
    let mut h = Harness::new();
    h.step(true, 0);

    for (i, lon) in [-101.0, -102.0, -103.0].iter().enumerate() {
        h.surface.pan_to(*lon, 40.0, 4.0);
        h.step(true, 300 * i as u64);
    }

    h.step(true, 600 + 1999);
    assert!(h.contexts().is_empty());

    h.step(true, 600 + 2000);
    h.step(true, 10_000);
    let contexts = h.contexts();
    assert_eq!(contexts.len(), 1);
    assert!(contexts[0].starts_with("Map view updated: center longitude -103.0000, latitude 40.0000, zoom 4.00"));
}

#[test]
fn equal_fingerprints_are_reported_once() {
    let mut h = Harness::new();
    h.step(true, 0);

    h.surface.pan_to(-122.4194, 37.7749, 10.0);
    h.step(true, 100);
    h.step(true, 2100);
    assert_eq!(h.contexts().len(), 1);

    // Same view at two decimals and one decimal of zoom.
    h.surface.pan_to(-122.4191, 37.7712, 10.04);
    h.step(true, 3000);
    h.step(true, 6000);
    assert_eq!(h.contexts().len(), 1);
}

#[test]
fn repeated_session_created_registers_once() {
    let mut h = Harness::new();

    h.receive(ServerEvent::session_created());
    h.step(true, 0);
    h.receive(ServerEvent::session_created());
    h.step(true, 10);

    assert_eq!(h.session_updates(), 1);
    assert_eq!(h.panel.registration(), Registration::Registered);
}

#[test]
fn reactivated_session_registers_again() {
    let mut h = Harness::new();

    h.receive(ServerEvent::session_created());
    h.step(true, 0);
    h.step(false, 10);
    assert_eq!(h.panel.registration(), Registration::Unregistered);

    h.receive(ServerEvent::session_created());
    h.step(true, 20);
    h.step(true, 30);

    assert_eq!(h.session_updates(), 2);
}

#[test]
fn add_then_clear_leaves_no_markers() {
    let mut h = Harness::new();
    h.step(true, 0);

    h.receive(calls(&[
        ("add_marker", "a1", r#"{"longitude":-122.42,"latitude":37.77,"label":"SF"}"#),
        ("add_marker", "a2", r#"{"longitude":-73.99,"latitude":40.76,"label":"NYC"}"#),
    ]));
    h.step(true, 10);
    assert_eq!(h.panel.markers().len(), 2);
    assert_eq!(h.surface.markers.len(), 2);

    h.receive(calls(&[("clear_markers", "c1", "{}")]));
    h.step(true, 20);

    assert!(h.panel.markers().is_empty());
    assert!(h.surface.markers.is_empty());
    let outputs = h.outputs();
    assert_eq!(outputs.len(), 3);
    assert!(outputs.iter().all(|(_, output)| output["success"] == true));
    assert_eq!(outputs[2].1["removed"], 2);
}

#[test]
fn unknown_function_fails_and_still_continues() {
    let mut h = Harness::new();
    h.step(true, 0);

    h.receive(calls(&[("rotate_map", "call_9", "{}")]));
    h.step(true, 1000);

    let outputs = h.outputs();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].0, "call_9");
    assert_eq!(outputs[0].1["success"], false);
    assert_eq!(outputs[0].1["error"], "Unknown function: rotate_map");

    assert_eq!(h.continues(), 0);
    h.step(true, 1099);
    assert_eq!(h.continues(), 0);
    h.step(true, 1100);
    assert_eq!(h.continues(), 1);
}

#[test]
fn fly_to_location_animates_and_echoes_the_request() {
    let mut h = Harness::new();
    h.step(true, 0);

    h.receive(calls(&[(
        "fly_to_location",
        "f1",
        r#"{"longitude":-122.42,"latitude":37.77,"zoom":10}"#,
    )]));
    h.step(true, 10);

    assert_eq!(h.surface.flights.len(), 1);
    let (center, zoom, duration) = h.surface.flights[0];
    assert!((center.longitude + 122.42).abs() < 1e-9);
    assert!((center.latitude - 37.77).abs() < 1e-9);
    assert_eq!(zoom, 10.0);
    assert_eq!(duration, Duration::from_millis(2000));

    let (call_id, output) = &h.outputs()[0];
    assert_eq!(call_id, "f1");
    assert_eq!(output["success"], true);
    assert!((output["longitude"].as_f64().unwrap() + 122.42).abs() < 1e-9);
    assert!((output["latitude"].as_f64().unwrap() - 37.77).abs() < 1e-9);
    assert_eq!(output["zoom"].as_f64(), Some(10.0));
}

#[test]
fn get_map_view_lists_the_markers() {
    let mut h = Harness::new();
    h.step(true, 0);

    h.receive(calls(&[
        ("add_marker", "a1", r#"{"longitude":2.35,"latitude":48.85,"label":"Paris"}"#),
        ("add_marker", "a2", r#"{"longitude":-0.12,"latitude":51.5,"label":"London","description":"Big Ben"}"#),
        ("get_map_view", "v1", ""),
    ]));
    h.step(true, 10);

    let outputs = h.outputs();
    let view = &outputs[2].1;
    assert_eq!(view["success"], true);
    assert_eq!(view["zoom"], 3.0);
    assert_eq!(view["center"]["longitude"], -100.0);
    assert!(view["bounds"]["north"].as_f64().unwrap() > 40.0);

    let markers = view["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0]["label"], "Paris");
    assert_eq!(markers[1]["label"], "London");
    assert!((markers[1]["latitude"].as_f64().unwrap() - 51.5).abs() < 1e-9);
}

#[test]
fn malformed_arguments_fail_and_still_continue() {
    let mut h = Harness::new();
    h.step(true, 0);

    h.receive(calls(&[("fly_to_location", "f1", "{\"longitude\": -122.4,")]));
    h.step(true, 10);
    h.step(true, 200);

    let outputs = h.outputs();
    assert_eq!(outputs[0].1["success"], false);
    assert!(outputs[0].1["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid arguments for fly_to_location"));
    assert!(h.surface.flights.is_empty());
    assert_eq!(h.continues(), 1);
}

#[test]
fn inactive_session_is_never_told_anything() {
    let mut h = Harness::new();
    h.step(false, 0);

    h.surface.pan_to(10.0, 10.0, 5.0);
    h.step(false, 100);
    h.receive(ServerEvent::session_created());
    h.receive(calls(&[("clear_markers", "c1", "{}")]));
    h.step(false, 200);
    h.step(false, 5000);

    assert!(h.sent.is_empty());
    assert!(!h.panel.is_report_pending());
}

#[test]
fn deactivation_drops_a_pending_report() {
    let mut h = Harness::new();
    h.step(true, 0);

    h.surface.pan_to(10.0, 10.0, 5.0);
    h.step(true, 100);
    assert!(h.panel.is_report_pending());

    h.step(false, 500);
    h.step(true, 3000);
    assert!(h.contexts().is_empty());
}

#[test]
fn events_are_dispatched_once() {
    let mut h = Harness::new();
    h.step(true, 0);

    h.receive(calls(&[(
        "add_marker",
        "a1",
        r#"{"longitude":1.0,"latitude":1.0,"label":"once"}"#,
    )]));
    for at in [10, 20, 30, 400] {
        h.step(true, at);
    }

    assert_eq!(h.outputs().len(), 1);
    assert_eq!(h.panel.markers().len(), 1);
    assert_eq!(h.continues(), 1);
}

#[test]
fn rejected_marker_is_not_listed() {
    let mut h = Harness::new();
    h.step(true, 0);

    h.receive(calls(&[(
        "add_marker",
        "a1",
        r#"{"longitude":1.0,"latitude":100.0,"label":"nowhere"}"#,
    )]));
    h.step(true, 10);

    assert_eq!(h.outputs()[0].1["success"], false);
    assert!(h.panel.markers().is_empty());
    assert!(h.surface.markers.is_empty());
}

#[test]
fn status_reflects_camera_and_markers() {
    let mut h = Harness::new();
    h.step(true, 0);
    h.receive(calls(&[(
        "add_marker",
        "a1",
        r#"{"longitude":1.0,"latitude":1.0,"label":"one"}"#,
    )]));
    h.step(true, 10);

    assert_eq!(
        h.panel.status(&h.surface).to_string(),
        "Longitude: -100.0000 | Latitude: 40.0000 | Zoom: 3.00 | Markers: 1"
    );
}

#[test]
fn missing_map_still_registers_and_answers_calls() {
    let config = PanelConfig::default();
    let mut panel = MapPanel::new(&config, PanelLog::default());
    let mut surface = UnavailableSurface::new(&config);
    let mut sent: Vec<ClientEvent> = Vec::new();
    let t0 = Instant::now();
    let log = vec![
        calls(&[(
            "fly_to_location",
            "f1",
            r#"{"longitude":-122.42,"latitude":37.77}"#,
        )]),
        ServerEvent::session_created(),
    ];

    panel.sync(&mut surface, true, &log, &mut sent, t0);
    panel.sync(&mut surface, true, &log, &mut sent, t0 + Duration::from_millis(100));

    assert!(matches!(sent[0], ClientEvent::SessionUpdate { .. }));
    let (call_id, output) = sent[1].function_output_parts().unwrap();
    assert_eq!(call_id, "f1");
    let output: Value = serde_json::from_str(output).unwrap();
    assert_eq!(output["success"], false);
    assert_eq!(output["error"], "map unavailable");
    assert_eq!(sent[2], ClientEvent::ResponseCreate);
}

#[test]
fn released_log_entries_are_neither_kept_nor_replayed() {
    let mut panel = MapPanel::new(&PanelConfig::default(), PanelLog::default());
    let mut surface = FakeSurface::new();
    let mut sent: Vec<ClientEvent> = Vec::new();
    let mut log = EventLog::new();
    let t0 = Instant::now();

    log.record(ServerEvent::session_created());
    for _ in 0..1000 {
        log.record(ServerEvent::Other);
    }
    panel.sync(&mut surface, true, log.events(), &mut sent, t0);
    panel.release_seen(&mut log);
    assert!(log.is_empty());

    log.record(calls(&[(
        "add_marker",
        "a1",
        r#"{"longitude":1.0,"latitude":1.0,"label":"one"}"#,
    )]));
    panel.sync(&mut surface, true, log.events(), &mut sent, t0);
    panel.release_seen(&mut log);
    panel.sync(&mut surface, true, log.events(), &mut sent, t0);

    log.record(calls(&[("clear_markers", "c1", "{}")]));
    panel.sync(&mut surface, true, log.events(), &mut sent, t0);
    panel.release_seen(&mut log);

    let outputs: Vec<&str> = sent
        .iter()
        .filter_map(|event| event.function_output_parts())
        .map(|(call_id, _)| call_id)
        .collect();
    assert_eq!(outputs, vec!["a1", "c1"]);
    assert!(log.is_empty());
    assert!(surface.markers.is_empty());
}

#[test]
fn clearing_the_panel_releases_surface_markers() {
    let mut h = Harness::new();
    h.step(true, 0);
    h.receive(calls(&[
        ("add_marker", "a1", r#"{"longitude":1.0,"latitude":1.0,"label":"one"}"#),
        ("add_marker", "a2", r#"{"longitude":2.0,"latitude":2.0,"label":"two"}"#),
    ]));
    h.step(true, 10);
    assert_eq!(h.surface.markers.len(), 2);

    h.panel.clear_markers(&mut h.surface);

    assert!(h.panel.markers().is_empty());
    assert!(h.surface.markers.is_empty());
}
