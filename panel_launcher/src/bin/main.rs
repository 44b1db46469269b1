use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use logger::{Color, Logger};
use map_panel::PanelConfig;
use relay::SessionRelay;

/// Opens the map panel and connects it to a local session bridge.
///
/// # Usage
///
/// ```sh
/// cargo run --bin main -- <relay_addr> [log_dir]
/// ```
///
/// # Example Execution
///
/// ```sh
/// cargo run --bin main -- 127.0.0.1:7878 /tmp/panel-logs
/// ```
///
/// `RELAY_ADDR`, when set, takes precedence over `<relay_addr>`.
///
/// # Errors
///
/// The program returns an error if:
/// - The number of arguments is incorrect.
/// - The relay address is not a valid socket address.
/// - The log directory cannot be created or the log file cannot be opened.
/// - The window cannot be opened.
///
/// A bridge that cannot be reached is not an error: the panel runs without a session.
fn main() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        return Err("Usage: program <relay_addr> [log_dir]".to_string());
    }

    let relay_addr =
        SocketAddr::from_str(&args[1]).map_err(|_| "Invalid relay address".to_string())?;

    let mut config = PanelConfig {
        relay_addr,
        ..PanelConfig::default()
    };

    if args.len() == 3 {
        let log_dir = PathBuf::from(&args[2]);
        if !log_dir.exists() {
            fs::create_dir_all(&log_dir)
                .map_err(|_| format!("Failed to create directory at {}", log_dir.display()))?;
        }
        config.log_dir = log_dir;
    }

    let logger = Logger::new(&config.log_dir, &config.name)
        .map_err(|e| e.to_string())?
        .with_console(config.console_log);

    let relay = match SessionRelay::connect(config.relay_addr) {
        Ok(relay) => {
            let _ = logger.info(
                &format!("Connected to session bridge at {}", config.relay_addr),
                Color::Green,
            );
            Some(relay)
        }
        Err(e) => {
            let _ = logger.warn(&format!("{}; starting without a session", e));
            None
        }
    };

    map_panel::run(config, relay, Some(logger)).map_err(|e| e.to_string())
}
