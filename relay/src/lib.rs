use std::{
    env,
    io::{BufRead, BufReader, Write},
    net::{Shutdown, SocketAddr, TcpStream},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{channel, Receiver, TryRecvError},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};
pub mod server;

use session_protocol::{
    errors::ProtocolError, ClientEvent, EventSink, Serializable, ServerEvent,
};
use thiserror::Error;

const WRITE_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("could not connect to session bridge: {0}")]
    ConnectionError(String),
    #[error("invalid RELAY_ADDR: {0}")]
    AddrError(String),
    #[error("could not configure socket timeouts")]
    TimeoutError,
    #[error("relay I/O error: {0}")]
    IOError(String),
    #[error("relay is closed")]
    Closed,
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Panel-side connection to a local session bridge.
///
/// Events travel as one JSON object per line in both directions. Inbound
/// lines are decoded on a background reader thread and queued until the UI
/// thread drains them with [`SessionRelay::drain`].
pub struct SessionRelay {
    stream: TcpStream,
    inbound: Receiver<Result<ServerEvent, RelayError>>,
    active: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl SessionRelay {
    /// Connects to the bridge at `addr`, or at `RELAY_ADDR` when that variable is set.
    pub fn connect(addr: SocketAddr) -> Result<Self, RelayError> {
        let addr = if let Ok(var) = env::var("RELAY_ADDR") {
            var.parse()
                .map_err(|_| RelayError::AddrError(var.to_string()))?
        } else {
            addr
        };

        let stream =
            TcpStream::connect(addr).map_err(|e| RelayError::ConnectionError(e.to_string()))?;
        Self::from_stream(stream)
    }

    /// Wraps an already connected stream.
    pub fn from_stream(stream: TcpStream) -> Result<Self, RelayError> {
        stream
            .set_write_timeout(Some(Duration::from_secs(WRITE_TIMEOUT_SECS)))
            .map_err(|_| RelayError::TimeoutError)?;
        let read_half = stream
            .try_clone()
            .map_err(|e| RelayError::IOError(e.to_string()))?;

        let active = Arc::new(AtomicBool::new(true));
        let (tx, inbound) = channel();
        let reader_active = Arc::clone(&active);

        let reader = thread::Builder::new()
            .name("relay-reader".to_string())
            .spawn(move || {
                let reader = BufReader::new(read_half);
                for line in reader.lines() {
                    let line = match line {
                        Ok(line) => line,
                        Err(_) => break,
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    let event = ServerEvent::from_bytes(line.as_bytes()).map_err(RelayError::from);
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                reader_active.store(false, Ordering::SeqCst);
            })
            .map_err(|e| RelayError::IOError(e.to_string()))?;

        Ok(Self {
            stream,
            inbound,
            active,
            reader: Some(reader),
        })
    }

    /// True until the bridge closes the connection.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Writes one event as a newline-terminated JSON line.
    pub fn send(&mut self, event: &ClientEvent) -> Result<(), RelayError> {
        if !self.is_active() {
            return Err(RelayError::Closed);
        }

        let mut line = event.to_bytes()?;
        line.push(b'\n');
        self.stream
            .write_all(&line)
            .map_err(|e| RelayError::IOError(e.to_string()))?;
        self.stream
            .flush()
            .map_err(|e| RelayError::IOError(e.to_string()))
    }

    /// Returns every inbound event received since the last call, oldest first.
    pub fn drain(&self) -> Vec<Result<ServerEvent, RelayError>> {
        let mut events = Vec::new();
        loop {
            match self.inbound.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}

impl EventSink for SessionRelay {
    fn send_event(&mut self, event: ClientEvent) -> Result<(), ProtocolError> {
        self.send(&event)
            .map_err(|e| ProtocolError::SinkClosed(e.to_string()))
    }
}

impl Drop for SessionRelay {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }
}
