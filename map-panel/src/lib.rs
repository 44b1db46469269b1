mod app;
pub mod config;
mod debounce;
pub mod dispatcher;
pub mod errors;
mod log;
pub mod panel;
mod plugins;
pub mod reporter;
mod state;
pub mod surface;
pub mod types;
mod widgets;

use app::MapApp;
use logger::Logger;
use relay::SessionRelay;

pub use config::PanelConfig;
pub use debounce::Debouncer;
pub use log::PanelLog;
pub use panel::{MapPanel, PanelStatus};
pub use state::{EventLog, SelectionState};

/// Opens the map window and blocks until it is closed.
pub fn run(
    config: PanelConfig,
    relay: Option<SessionRelay>,
    logger: Option<Logger>,
) -> Result<(), eframe::Error> {
    let log = PanelLog::new(logger);

    eframe::run_native(
        "Map Panel",
        Default::default(),
        Box::new(|cc| {
            Ok(Box::new(MapApp::new(
                cc.egui_ctx.clone(),
                config,
                relay,
                log,
            )))
        }),
    )
}
