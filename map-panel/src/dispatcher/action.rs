use std::{convert::Infallible, fmt, str::FromStr};

use serde::{de::DeserializeOwned, Deserialize};

use super::DispatchError;

pub const GET_MAP_VIEW: &str = "get_map_view";
pub const FLY_TO_LOCATION: &str = "fly_to_location";
pub const ADD_MARKER: &str = "add_marker";
pub const CLEAR_MARKERS: &str = "clear_markers";

/// The closed set of map actions the AI can invoke, plus whatever else it asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum MapAction {
    GetMapView,
    FlyToLocation,
    AddMarker,
    ClearMarkers,
    Unknown(String),
}

impl FromStr for MapAction {
    type Err = Infallible;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(match name {
            GET_MAP_VIEW => MapAction::GetMapView,
            FLY_TO_LOCATION => MapAction::FlyToLocation,
            ADD_MARKER => MapAction::AddMarker,
            CLEAR_MARKERS => MapAction::ClearMarkers,
            other => MapAction::Unknown(other.to_string()),
        })
    }
}

impl fmt::Display for MapAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MapAction::GetMapView => GET_MAP_VIEW,
            MapAction::FlyToLocation => FLY_TO_LOCATION,
            MapAction::AddMarker => ADD_MARKER,
            MapAction::ClearMarkers => CLEAR_MARKERS,
            MapAction::Unknown(name) => name,
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlyToArgs {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default)]
    pub zoom: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddMarkerArgs {
    pub longitude: f64,
    pub latitude: f64,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Decodes the JSON-encoded argument blob of a call. A blank blob counts as `{}`.
pub fn parse_args<T: DeserializeOwned>(action: &MapAction, raw: &str) -> Result<T, DispatchError> {
    let raw = if raw.trim().is_empty() { "{}" } else { raw };
    serde_json::from_str(raw).map_err(|e| DispatchError::InvalidArguments {
        name: action.to_string(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names_and_keeps_unknown_ones() {
        assert_eq!("get_map_view".parse::<MapAction>(), Ok(MapAction::GetMapView));
        assert_eq!("fly_to_location".parse::<MapAction>(), Ok(MapAction::FlyToLocation));
        assert_eq!("add_marker".parse::<MapAction>(), Ok(MapAction::AddMarker));
        assert_eq!("clear_markers".parse::<MapAction>(), Ok(MapAction::ClearMarkers));
        assert_eq!(
            "rotate_map".parse::<MapAction>(),
            Ok(MapAction::Unknown("rotate_map".to_string()))
        );
    }

    #[test]
    fn fly_to_zoom_is_optional() {
        let args: FlyToArgs = parse_args(
            &MapAction::FlyToLocation,
            r#"{"longitude":-122.42,"latitude":37.77}"#,
        )
        .unwrap();

        assert_eq!(args.zoom, None);
        assert_eq!(args.longitude, -122.42);
    }

    #[test]
    fn missing_required_field_is_reported_with_the_action_name() {
        let err = parse_args::<AddMarkerArgs>(
            &MapAction::AddMarker,
            r#"{"longitude":1.0,"latitude":2.0}"#,
        )
        .unwrap_err();

        match err {
            DispatchError::InvalidArguments { name, detail } => {
                assert_eq!(name, "add_marker");
                assert!(detail.contains("label"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn malformed_json_is_an_argument_error() {
        assert!(matches!(
            parse_args::<FlyToArgs>(&MapAction::FlyToLocation, "{longitude:"),
            Err(DispatchError::InvalidArguments { .. })
        ));
    }
}
