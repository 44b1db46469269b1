use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq)]
enum LogLevel {
    Info(Color),
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info(_) => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
}

impl Color {
    fn to_ansi_code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Blue => "\x1b[34m",
            Color::Yellow => "\x1b[33m",
            Color::Cyan => "\x1b[36m",
            Color::Magenta => "\x1b[35m",
            Color::White => "\x1b[37m",
        }
    }
}

/// Leveled logger that appends to `panel_<name>.log` and optionally mirrors to stdout.
#[derive(Debug, Clone)]
pub struct Logger {
    log_file: PathBuf,
    console: bool,
}

impl Logger {
    /// Creates a new `Logger` writing into `log_dir`.
    ///
    /// # Parameters
    /// - `log_dir`: Existing directory where the log file is created.
    /// - `name`: Panel instance name, used in the file name.
    ///
    /// The file is truncated on creation, so each panel run starts a fresh log.
    pub fn new(log_dir: &Path, name: &str) -> Result<Self, LoggerError> {
        if !log_dir.is_dir() {
            return Err(LoggerError::InvalidPath(format!(
                "{} is not a directory",
                log_dir.display()
            )));
        }

        let log_file = log_dir.join(format!("panel_{}.log", sanitize(name)));

        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&log_file)?;

        Ok(Logger {
            log_file,
            console: false,
        })
    }

    /// Mirrors every entry to stdout with ANSI colors.
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    pub fn path(&self) -> &Path {
        &self.log_file
    }

    fn log(&self, level: LogLevel, message: &str) -> Result<(), LoggerError> {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let line = format!("[{}] [{}]: {}\n", level, timestamp, message);

        if self.console {
            let colored = match level {
                LogLevel::Info(color) => format!("{}{}\x1b[0m", color.to_ansi_code(), line),
                LogLevel::Warn => format!("\x1b[93m{}\x1b[0m", line),
                LogLevel::Error => format!("\x1b[91m{}\x1b[0m", line),
            };
            let mut stdout = io::stdout();
            stdout.write_all(colored.as_bytes())?;
            stdout.flush()?;
        }

        let mut file = OpenOptions::new().append(true).open(&self.log_file)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Logs an informational message; `color` only affects console output.
    pub fn info(&self, message: &str, color: Color) -> Result<(), LoggerError> {
        self.log(LogLevel::Info(color), message)
    }

    pub fn warn(&self, message: &str) -> Result<(), LoggerError> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> Result<(), LoggerError> {
        self.log(LogLevel::Error, message)
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

#[derive(Debug)]
pub enum LoggerError {
    IoError(std::io::Error),
    InvalidPath(String),
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerError::IoError(e) => write!(f, "I/O Error: {}", e),
            LoggerError::InvalidPath(msg) => write!(f, "Invalid Path: {}", msg),
        }
    }
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggerError::IoError(e) => Some(e),
            LoggerError::InvalidPath(_) => None,
        }
    }
}

impl From<std::io::Error> for LoggerError {
    fn from(err: std::io::Error) -> Self {
        LoggerError::IoError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("panel_logger_{}_{}", tag, std::process::id()));
        fs::create_dir_all(&dir).expect("Failed to create test directory");
        dir
    }

    #[test]
    fn test_logger_writes_leveled_lines() {
        let dir = scratch_dir("levels");
        let logger = Logger::new(&dir, "main").expect("Failed to create logger");

        logger.info("tools registered", Color::Green).unwrap();
        logger.warn("unknown function").unwrap();
        logger.error("relay closed").unwrap();

        let contents = fs::read_to_string(logger.path()).expect("Failed to read log file");
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("[INFO]") && lines[0].ends_with("tools registered"));
        assert!(lines[1].starts_with("[WARN]"));
        assert!(lines[2].starts_with("[ERROR]"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_name_is_sanitized() {
        let dir = scratch_dir("names");
        let logger = Logger::new(&dir, "127.0.0.1:7000").unwrap();

        assert_eq!(
            logger.path().file_name().unwrap().to_str().unwrap(),
            "panel_127_0_0_1_7000.log"
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_invalid_path() {
        let result = Logger::new(Path::new("/definitely/not/a/dir"), "main");
        assert!(matches!(result, Err(LoggerError::InvalidPath(_))));
    }
}
