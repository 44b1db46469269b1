use std::sync::mpsc::Sender;

use crate::{errors::ProtocolError, ClientEvent};

/// Destination for events the panel sends to the AI session.
pub trait EventSink {
    fn send_event(&mut self, event: ClientEvent) -> Result<(), ProtocolError>;
}

impl EventSink for Vec<ClientEvent> {
    fn send_event(&mut self, event: ClientEvent) -> Result<(), ProtocolError> {
        self.push(event);
        Ok(())
    }
}

impl EventSink for Sender<ClientEvent> {
    fn send_event(&mut self, event: ClientEvent) -> Result<(), ProtocolError> {
        self.send(event)
            .map_err(|_| ProtocolError::SinkClosed("receiver dropped".to_string()))
    }
}
