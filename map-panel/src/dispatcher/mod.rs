use serde_json::{json, Value};
use session_protocol::{ClientEvent, FunctionCall};
use thiserror::Error;

use crate::{
    config::PanelConfig,
    errors::SurfaceError,
    surface::MapSurface,
    types::{Coordinates, MarkerList},
};

mod action;
mod registration;

pub use action::{parse_args, AddMarkerArgs, FlyToArgs, MapAction};
pub use registration::{tool_declarations, Registration, ToolRegistry, INSTRUCTIONS};

/// Why a function call could not be carried out.
///
/// None of these escape the dispatcher: each becomes an error result sent back
/// to the session under the call's correlation id.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    #[error("map unavailable")]
    MapUnavailable,
    #[error("Invalid arguments for {name}: {detail}")]
    InvalidArguments { name: String, detail: String },
    #[error("{action} failed: {source}")]
    Surface {
        action: String,
        source: SurfaceError,
    },
}

/// The result of one function call, ready to be sent back.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub call_id: String,
    pub action: MapAction,
    pub output: Value,
}

impl DispatchOutcome {
    pub fn succeeded(&self) -> bool {
        self.output["success"] == Value::Bool(true)
    }

    /// The correlated `function_call_output` for this outcome.
    pub fn to_event(&self) -> ClientEvent {
        ClientEvent::function_output(&self.call_id, self.output.to_string())
    }
}

/// Runs AI function calls against the map.
#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    config: PanelConfig,
}

impl ToolDispatcher {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Executes `call` and always produces an outcome; failures become error payloads.
    pub fn dispatch<S: MapSurface + ?Sized>(
        &self,
        call: &FunctionCall,
        surface: &mut S,
        markers: &mut MarkerList,
    ) -> DispatchOutcome {
        let action = call
            .name
            .parse::<MapAction>()
            .unwrap_or_else(|never| match never {});

        let output = match self.execute(&action, &call.arguments, surface, markers) {
            Ok(output) => output,
            Err(e) => json!({ "success": false, "error": e.to_string() }),
        };

        DispatchOutcome {
            call_id: call.call_id.clone(),
            action,
            output,
        }
    }

    fn execute<S: MapSurface + ?Sized>(
        &self,
        action: &MapAction,
        arguments: &str,
        surface: &mut S,
        markers: &mut MarkerList,
    ) -> Result<Value, DispatchError> {
        let surface_error = |source: SurfaceError| DispatchError::Surface {
            action: action.to_string(),
            source,
        };

        if !matches!(action, MapAction::Unknown(_)) && !surface.is_available() {
            return Err(DispatchError::MapUnavailable);
        }

        match action {
            MapAction::GetMapView => {
                let viewport = surface.viewport();
                Ok(json!({
                    "success": true,
                    "center": viewport.center,
                    "zoom": viewport.zoom,
                    "bounds": viewport.bounds,
                    "markers": markers.summaries(),
                }))
            }
            MapAction::FlyToLocation => {
                let args: FlyToArgs = parse_args(action, arguments)?;
                let center =
                    Coordinates::validated(args.longitude, args.latitude).map_err(surface_error)?;
                let zoom = self
                    .config
                    .clamp_zoom(args.zoom.unwrap_or(self.config.default_fly_zoom));

                surface
                    .fly_to(center, zoom, self.config.fly_duration)
                    .map_err(surface_error)?;

                Ok(json!({
                    "success": true,
                    "message": format!("Flying to {}, {} at zoom {}", center.latitude, center.longitude, zoom),
                    "longitude": center.longitude,
                    "latitude": center.latitude,
                    "zoom": zoom,
                }))
            }
            MapAction::AddMarker => {
                let args: AddMarkerArgs = parse_args(action, arguments)?;
                let position =
                    Coordinates::validated(args.longitude, args.latitude).map_err(surface_error)?;

                let marker = markers
                    .add(surface, position, &args.label, args.description.as_deref())
                    .map_err(surface_error)?;

                Ok(json!({
                    "success": true,
                    "message": format!("Added marker '{}'", marker.label),
                    "label": marker.label,
                    "longitude": marker.position.longitude,
                    "latitude": marker.position.latitude,
                }))
            }
            MapAction::ClearMarkers => {
                let (removed, failures) = markers.clear(surface);
                if failures.is_empty() {
                    return Ok(json!({
                        "success": true,
                        "message": format!("Cleared {} markers", removed),
                        "removed": removed,
                    }));
                }

                let detail: Vec<String> = failures.iter().map(|e| e.to_string()).collect();
                Ok(json!({
                    "success": false,
                    "error": format!("Cleared {} markers with errors: {}", removed, detail.join("; ")),
                    "removed": removed,
                }))
            }
            MapAction::Unknown(name) => Err(DispatchError::UnknownFunction(name.clone())),
        }
    }
}
