use std::time::{Duration, Instant};

use session_protocol::ClientEvent;

use crate::{
    debounce::Debouncer,
    surface::MapSurface,
    types::{Fingerprint, Viewport},
};

/// Reports settled viewports to the AI session.
///
/// Moves are debounced on the trailing edge and deduplicated against the
/// fingerprint of the last viewport actually sent.
#[derive(Debug)]
pub struct ViewportReporter {
    debouncer: Debouncer<Viewport>,
    last_sent: Option<Fingerprint>,
}

impl ViewportReporter {
    pub fn new(delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
            last_sent: None,
        }
    }

    /// Handles a map move. Returns whether a report is now pending.
    ///
    /// With the session inactive nothing is computed and any pending report is dropped.
    pub fn on_move<S: MapSurface + ?Sized>(
        &mut self,
        surface: &S,
        session_active: bool,
        now: Instant,
    ) -> bool {
        if !session_active {
            self.debouncer.cancel();
            return false;
        }

        let viewport = surface.viewport();
        if self.last_sent.as_ref() == Some(&viewport.fingerprint()) {
            // Back where we last reported: nothing new to say.
            self.debouncer.cancel();
            return false;
        }

        self.debouncer.schedule(now, viewport);
        true
    }

    /// Emits the context message once the map has been quiet long enough.
    pub fn poll(&mut self, session_active: bool, now: Instant) -> Option<(Viewport, ClientEvent)> {
        if !session_active {
            self.debouncer.cancel();
            return None;
        }

        let viewport = self.debouncer.poll(now)?;
        self.last_sent = Some(viewport.fingerprint());
        Some((viewport, ClientEvent::user_text(&viewport.describe())))
    }

    /// Forgets everything tied to the session that just ended.
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.last_sent = None;
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn last_sent(&self) -> Option<&Fingerprint> {
        self.last_sent.as_ref()
    }
}
