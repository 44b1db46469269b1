use std::time::{Duration, Instant};

use crate::types::Coordinates;

/// An in-flight camera transition.
///
/// The clock starts on the first [`FlyTo::sample`], so a transition requested
/// between frames begins on the next frame rather than mid-way.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyTo {
    from: Coordinates,
    from_zoom: f64,
    to: Coordinates,
    to_zoom: f64,
    duration: Duration,
    started: Option<Instant>,
}

impl FlyTo {
    pub fn new(
        from: Coordinates,
        from_zoom: f64,
        to: Coordinates,
        to_zoom: f64,
        duration: Duration,
    ) -> Self {
        Self {
            from,
            from_zoom,
            to,
            to_zoom,
            duration,
            started: None,
        }
    }

    /// Camera position at `now` and whether the transition has finished.
    pub fn sample(&mut self, now: Instant) -> (Coordinates, f64, bool) {
        let started = *self.started.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);

        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, self.to_zoom, true);
        }

        let t = ease_in_out(elapsed.as_secs_f64() / self.duration.as_secs_f64());
        let center = Coordinates::new(
            lerp(self.from.longitude, self.shortest_target_longitude(), t),
            lerp(self.from.latitude, self.to.latitude, t),
        );
        let center = Coordinates::new(wrap(center.longitude), center.latitude);

        (center, lerp(self.from_zoom, self.to_zoom, t), false)
    }

    // Travel the short way round when the target is across the antimeridian.
    fn shortest_target_longitude(&self) -> f64 {
        let delta = self.to.longitude - self.from.longitude;
        if delta > 180.0 {
            self.to.longitude - 360.0
        } else if delta < -180.0 {
            self.to.longitude + 360.0
        } else {
            self.to.longitude
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn wrap(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
