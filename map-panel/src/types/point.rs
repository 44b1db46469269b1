use super::Coordinates;

/// A fixed sample location drawn on the map at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    pub id: u32,
    pub position: Coordinates,
    pub name: &'static str,
    pub description: &'static str,
}

pub static SAMPLE_POINTS: [PointOfInterest; 5] = [
    PointOfInterest {
        id: 1,
        position: Coordinates {
            longitude: -122.4194,
            latitude: 37.7749,
        },
        name: "San Francisco",
        description: "Golden Gate Bridge",
    },
    PointOfInterest {
        id: 2,
        position: Coordinates {
            longitude: -122.3321,
            latitude: 47.6062,
        },
        name: "Seattle",
        description: "Space Needle",
    },
    PointOfInterest {
        id: 3,
        position: Coordinates {
            longitude: -118.2437,
            latitude: 34.0522,
        },
        name: "Los Angeles",
        description: "Hollywood Sign",
    },
    PointOfInterest {
        id: 4,
        position: Coordinates {
            longitude: -73.9857,
            latitude: 40.7580,
        },
        name: "New York",
        description: "Times Square",
    },
    PointOfInterest {
        id: 5,
        position: Coordinates {
            longitude: -87.6298,
            latitude: 41.8781,
        },
        name: "Chicago",
        description: "Willis Tower",
    },
];
