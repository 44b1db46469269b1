use std::collections::VecDeque;

use session_protocol::ServerEvent;

use crate::types::PointOfInterest;

/// Tracks which sample point the user clicked.
#[derive(Debug, Default)]
pub struct SelectionState {
    pub point: Option<PointOfInterest>,
}

impl SelectionState {
    pub fn new() -> SelectionState {
        Self { point: None }
    }

    /// If the provided point is already selected, it will be deselected.
    /// Otherwise, it will be selected.
    pub fn toggle_point_selection(&mut self, point: &PointOfInterest) {
        match &self.point {
            Some(selected) if selected.id == point.id => self.point = None,
            _ => self.point = Some(point.clone()),
        }
    }
}

/// Inbound session events, newest first.
///
/// The panel tells new entries from old ones by length. Entries are only
/// removed from the old end, through [`crate::MapPanel::release_seen`], so
/// that count stays consistent.
#[derive(Debug, Default)]
pub struct EventLog {
    events: VecDeque<ServerEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps `event` unless it is traffic the panel never reacts to.
    pub fn record(&mut self, event: ServerEvent) -> bool {
        if matches!(event, ServerEvent::Other) {
            return false;
        }
        self.events.push_front(event);
        true
    }

    pub fn events(&mut self) -> &[ServerEvent] {
        self.events.make_contiguous()
    }

    /// Drops up to `count` of the oldest entries. Returns how many were dropped.
    pub fn drop_oldest(&mut self, count: usize) -> usize {
        let count = count.min(self.events.len());
        self.events.truncate(self.events.len() - count);
        count
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SAMPLE_POINTS;

    #[test]
    fn clicking_a_point_twice_deselects_it() {
        let mut selection = SelectionState::new();

        selection.toggle_point_selection(&SAMPLE_POINTS[0]);
        assert_eq!(selection.point.as_ref().map(|p| p.id), Some(1));

        selection.toggle_point_selection(&SAMPLE_POINTS[1]);
        assert_eq!(selection.point.as_ref().map(|p| p.id), Some(2));

        selection.toggle_point_selection(&SAMPLE_POINTS[1]);
        assert!(selection.point.is_none());
    }

    #[test]
    fn log_keeps_newest_first() {
        let mut log = EventLog::new();
        log.record(ServerEvent::session_created());
        log.record(ServerEvent::response_with_calls(vec![]));

        assert_eq!(log.events()[0], ServerEvent::response_with_calls(vec![]));
        assert_eq!(log.len(), 2);
        assert!(!log.is_empty());
    }

    #[test]
    fn ignored_traffic_is_not_kept() {
        let mut log = EventLog::new();

        for _ in 0..100_000 {
            assert!(!log.record(ServerEvent::Other));
        }

        assert!(log.is_empty());
    }

    #[test]
    fn drop_oldest_keeps_the_newest_entries() {
        let mut log = EventLog::new();
        log.record(ServerEvent::session_created());
        log.record(ServerEvent::response_with_calls(vec![]));

        assert_eq!(log.drop_oldest(1), 1);
        assert_eq!(log.events(), &[ServerEvent::response_with_calls(vec![])]);
        assert_eq!(log.drop_oldest(5), 1);
        assert!(log.is_empty());
    }
}
