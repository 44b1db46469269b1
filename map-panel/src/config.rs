use std::{
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use crate::types::Coordinates;

const INITIAL_LON: f64 = -100.0;
const INITIAL_LAT: f64 = 40.0;
const INITIAL_ZOOM: f64 = 3.0;
const REPORT_DEBOUNCE_MS: u64 = 2000;
const FLY_DURATION_MS: u64 = 2000;
const CONTINUE_DELAY_MS: u64 = 100;
const DEFAULT_FLY_ZOOM: f64 = 12.0;
const MIN_ZOOM: f64 = 1.0;
const MAX_ZOOM: f64 = 20.0;
const RELAY_PORT: u16 = 7878;

/// Settings of one map panel instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    /// Names the instance in logs and in the log file name.
    pub name: String,
    pub initial_center: Coordinates,
    pub initial_zoom: f64,
    /// Quiet period before a moved viewport is reported.
    pub report_debounce: Duration,
    /// Length of the animated transition requested by `fly_to_location`.
    pub fly_duration: Duration,
    /// Delay between a function result and the `response.create` that follows it.
    pub continue_delay: Duration,
    pub default_fly_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub relay_addr: SocketAddr,
    pub log_dir: PathBuf,
    pub console_log: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            name: "main".to_string(),
            initial_center: Coordinates::new(INITIAL_LON, INITIAL_LAT),
            initial_zoom: INITIAL_ZOOM,
            report_debounce: Duration::from_millis(REPORT_DEBOUNCE_MS),
            fly_duration: Duration::from_millis(FLY_DURATION_MS),
            continue_delay: Duration::from_millis(CONTINUE_DELAY_MS),
            default_fly_zoom: DEFAULT_FLY_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            relay_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, RELAY_PORT)),
            log_dir: std::env::temp_dir(),
            console_log: true,
        }
    }
}

impl PanelConfig {
    /// Clamps a requested zoom into the range the panel accepts.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
