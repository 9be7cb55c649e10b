use std::time::{Duration, Instant};

/// Elapsed-time bookkeeping for a track that can be paused and resumed.
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct PlayClock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl PlayClock {
    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(super) fn resume_at(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub(super) fn pause_at(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(st);
        }
    }

    pub(super) fn elapsed_at(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| now.saturating_duration_since(st))
    }

    pub(super) fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    pub(super) fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub(super) fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }
}
