use logger::{Color, Logger};

/// Optional logger shared by the panel and the app.
///
/// Logging never interrupts the panel: write failures are dropped and a
/// panel built without a logger stays silent.
#[derive(Debug, Clone, Default)]
pub struct PanelLog {
    logger: Option<Logger>,
}

impl PanelLog {
    pub fn new(logger: Option<Logger>) -> Self {
        Self { logger }
    }

    pub fn info(&self, message: &str, color: Color) {
        if let Some(logger) = &self.logger {
            let _ = logger.info(message, color);
        }
    }

    pub fn warn(&self, message: &str) {
        if let Some(logger) = &self.logger {
            let _ = logger.warn(message);
        }
    }

    pub fn error(&self, message: &str) {
        if let Some(logger) = &self.logger {
            let _ = logger.error(message);
        }
    }
}
