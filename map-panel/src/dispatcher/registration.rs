use session_protocol::{ClientEvent, Param, ToolDeclaration};

use super::action::{ADD_MARKER, CLEAR_MARKERS, FLY_TO_LOCATION, GET_MAP_VIEW};

pub const INSTRUCTIONS: &str = "You are a map assistant with control over an interactive map. \
Use get_map_view to learn what the user is looking at before answering questions about it. \
Use fly_to_location to move the map to a place (zoom 1 shows the world, 20 a single building; default 12). \
Use add_marker to point out places and clear_markers to remove every marker you added. \
The user's view changes are reported to you as short context messages; use them but do not read them aloud.";

/// Whether the tool set has been declared to the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Registration {
    #[default]
    Unregistered,
    Registered,
}

/// Declares the map tools once per session lifetime.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    state: Registration,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Registration {
        self.state
    }

    /// Returns the `session.update` to send when a session is created.
    ///
    /// While already registered this returns `None`.
    pub fn on_session_created(&mut self) -> Option<ClientEvent> {
        match self.state {
            Registration::Registered => None,
            Registration::Unregistered => {
                self.state = Registration::Registered;
                Some(ClientEvent::session_update(INSTRUCTIONS, tool_declarations()))
            }
        }
    }

    pub fn on_session_inactive(&mut self) {
        self.state = Registration::Unregistered;
    }
}

/// The four map tools as declared to the session.
pub fn tool_declarations() -> Vec<ToolDeclaration> {
    vec![
        ToolDeclaration::function(
            GET_MAP_VIEW,
            "Get the current map view: center, zoom, visible bounds and the markers on the map.",
            &[],
        ),
        ToolDeclaration::function(
            FLY_TO_LOCATION,
            "Animate the map to a location.",
            &[
                Param::required("longitude", "number", "Longitude of the new center"),
                Param::required("latitude", "number", "Latitude of the new center"),
                Param::optional("zoom", "number", "Zoom level from 1 to 20, 12 if omitted"),
            ],
        ),
        ToolDeclaration::function(
            ADD_MARKER,
            "Place a labelled marker on the map.",
            &[
                Param::required("longitude", "number", "Longitude of the marker"),
                Param::required("latitude", "number", "Latitude of the marker"),
                Param::required("label", "string", "Short name shown with the marker"),
                Param::optional("description", "string", "Longer text shown on hover"),
            ],
        ),
        ToolDeclaration::function(
            CLEAR_MARKERS,
            "Remove every marker previously added with add_marker.",
            &[],
        ),
    ]
}
