use session_protocol::{ClientEvent, Serializable, ServerEvent};
use thiserror::Error;

/// Errors raised on the bridge side of the relay.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid client event: {0}")]
    InvalidEvent(String),
    #[error("could not encode server event: {0}")]
    InvalidConversion(String),
}

/// Decodes one line sent by the panel.
pub fn handle_client_event(bytes: &[u8]) -> Result<ClientEvent, RequestError> {
    ClientEvent::from_bytes(bytes).map_err(|e| RequestError::InvalidEvent(e.to_string()))
}

/// Encodes a server event as a single newline-terminated line for the panel.
pub fn encode_server_event(event: &ServerEvent) -> Result<Vec<u8>, RequestError> {
    let mut line = event
        .to_bytes()
        .map_err(|e| RequestError::InvalidConversion(e.to_string()))?;
    line.push(b'\n');
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_continue_signal() {
        let event = handle_client_event(b"{\"type\":\"response.create\"}\n").unwrap();
        assert_eq!(event, ClientEvent::ResponseCreate);
    }

    #[test]
    fn rejects_unknown_client_event() {
        assert!(matches!(
            handle_client_event(b"{\"type\":\"input_audio_buffer.append\"}"),
            Err(RequestError::InvalidEvent(_))
        ));
    }

    #[test]
    fn server_events_are_line_terminated() {
        let line = encode_server_event(&ServerEvent::session_created()).unwrap();

        assert_eq!(line.last(), Some(&b'\n'));
        assert_eq!(line.iter().filter(|b| **b == b'\n').count(), 1);
    }
}
